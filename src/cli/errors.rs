use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid size parameter: {size}. Must be an integer between 1 and 99999")]
    InvalidSize { size: String },

    #[error("Invalid outer padding: {pad}. Must be an integer between 0 and 99999")]
    InvalidPadding { pad: String },

    #[error("Directory does not exist: {path}")]
    MissingDirectory { path: String },

    #[error("Directory does not contain any recognized image files: {path}")]
    NoImages { path: String },

    #[error("Cannot create directory {path}: {source}")]
    CreateDirectory {
        path: String,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Library(#[from] crate::error::Error),
}

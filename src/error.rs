//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, codec, and resize errors, and provides semantic variants
//! for argument validation and processing failures.
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Resize error: {0}")]
    Resize(String),

    #[error("Failed to load face model {path:?}: {source} (pass --model or set JUSTCROP_MODEL)")]
    Model {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("Unsupported border: {0}. Use replicate, reflect, average or inpaint")]
    UnsupportedBorder(String),

    #[error("Input folder does not contain any image files: {dir:?}")]
    NoInputImages { dir: PathBuf },

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Report serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<fast_image_resize::ResizeError> for Error {
    fn from(e: fast_image_resize::ResizeError) -> Self {
        Error::Resize(e.to_string())
    }
}

impl From<fast_image_resize::ImageBufferError> for Error {
    fn from(e: fast_image_resize::ImageBufferError) -> Self {
        Error::Resize(e.to_string())
    }
}

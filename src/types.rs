//! Shared types and enums used across the crop and denoise tools.
//! Includes `BorderMode`, the per-file `Rejection` reasons, and the list of
//! recognized image extensions.
use std::path::Path;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Extensions (lowercase, without the dot) accepted as input images.
pub const IMAGE_EXTENSIONS: [&str; 14] = [
    "jpg", "jpeg", "bmp", "dib", "jp2", "png", "webp", "pbm", "pgm", "ppm", "sr", "ras", "tiff",
    "tif",
];

/// Returns true when `path` carries one of [`IMAGE_EXTENSIONS`], ignoring case.
pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// How the area between the resized crop and the output frame is filled.
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BorderMode {
    /// Extend the outermost pixels.
    #[default]
    Replicate,
    /// Mirror the pixels next to the edge, without repeating the edge itself.
    Reflect,
    /// Constant fill with the mean color of a small corner patch.
    Average,
    /// Average fill, then inpaint the padded band from the image content.
    Inpaint,
}

impl std::fmt::Display for BorderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BorderMode::Replicate => "replicate",
            BorderMode::Reflect => "reflect",
            BorderMode::Average => "average",
            BorderMode::Inpaint => "inpaint",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for BorderMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "replicate" => Ok(BorderMode::Replicate),
            "reflect" => Ok(BorderMode::Reflect),
            "average" => Ok(BorderMode::Average),
            "inpaint" => Ok(BorderMode::Inpaint),
            _ => Err(Error::UnsupportedBorder(s.to_string())),
        }
    }
}

/// Why a file was counted as rejected by the batch driver.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Rejection {
    Unreadable,
    NoFace,
    EmptyCrop,
    TransformFailed,
    WriteFailed,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::Unreadable => write!(f, "unreadable image"),
            Rejection::NoFace => write!(f, "no face detected"),
            Rejection::EmptyCrop => write!(f, "empty crop"),
            Rejection::TransformFailed => write!(f, "transform failed"),
            Rejection::WriteFailed => write!(f, "write failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_match_case_insensitively() {
        assert!(has_image_extension(Path::new("a/b/photo.JPG")));
        assert!(has_image_extension(Path::new("scan.Tif")));
        assert!(has_image_extension(Path::new("x.ras")));
        assert!(!has_image_extension(Path::new("notes.txt")));
        assert!(!has_image_extension(Path::new("jpg")));
    }

    #[test]
    fn border_parses_known_values_only() {
        assert_eq!("reflect".parse::<BorderMode>().unwrap(), BorderMode::Reflect);
        assert_eq!("INPAINT".parse::<BorderMode>().unwrap(), BorderMode::Inpaint);
        let err = "wrap".parse::<BorderMode>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedBorder(ref s) if s == "wrap"));
    }

    #[test]
    fn border_display_round_trips_through_from_str() {
        for mode in [
            BorderMode::Replicate,
            BorderMode::Reflect,
            BorderMode::Average,
            BorderMode::Inpaint,
        ] {
            assert_eq!(mode.to_string().parse::<BorderMode>().unwrap(), mode);
        }
    }
}

use std::fs;
use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::core::params::{
    CropParams, DEFAULT_FACE_PERCENT, DEFAULT_PAD_WEIGHT, DenoiseParams, MAX_DIMENSION, PadWeights,
};
use crate::detect::default_model_path;
use crate::io::list_input_images;
use crate::types::BorderMode;

use super::errors::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "justcrop",
    version,
    about = "Crop every image in a folder around its most prominent face",
    disable_version_flag = true
)]
pub struct CropArgs {
    /// Folder where images to crop are located
    #[arg(short, long, default_value = ".", value_parser = parse_input_dir)]
    pub input: PathBuf,

    /// Folder where cropped images will be written (defaults to the input folder)
    #[arg(short, long, visible_alias = "path", short_alias = 'p', value_parser = parse_output_dir)]
    pub output: Option<PathBuf>,

    /// Folder where images that cannot be cropped are copied
    #[arg(short, long, value_parser = parse_output_dir)]
    pub reject: Option<PathBuf>,

    /// Width of cropped files in px
    #[arg(short, long, default_value_t = 500, value_parser = parse_size)]
    pub width: u32,

    /// Height of cropped files in px
    #[arg(short = 'H', long, default_value_t = 500, value_parser = parse_size)]
    pub height: u32,

    /// Pixels left between the resized crop and the output edge
    #[arg(long = "outerPad", default_value_t = 0, value_parser = parse_outer_pad)]
    pub outer_pad: u32,

    /// How to fill the border around the resized crop
    #[arg(long, value_enum, default_value_t = BorderMode::Replicate)]
    pub border: BorderMode,

    /// Face height as a percentage of the crop height
    #[arg(long = "facePercent", default_value_t = DEFAULT_FACE_PERCENT)]
    pub face_percent: f64,

    /// Relative share of the free space above the face
    #[arg(long = "padUp", default_value_t = DEFAULT_PAD_WEIGHT, allow_negative_numbers = true)]
    pub pad_up: f64,

    /// Relative share of the free space below the face
    #[arg(long = "padDown", default_value_t = DEFAULT_PAD_WEIGHT, allow_negative_numbers = true)]
    pub pad_down: f64,

    /// Relative share of the free space left of the face
    #[arg(long = "padLeft", default_value_t = DEFAULT_PAD_WEIGHT, allow_negative_numbers = true)]
    pub pad_left: f64,

    /// Relative share of the free space right of the face
    #[arg(long = "padRight", default_value_t = DEFAULT_PAD_WEIGHT, allow_negative_numbers = true)]
    pub pad_right: f64,

    /// SeetaFace frontal detection model [default: $JUSTCROP_MODEL, then
    /// model/seeta_fd_frontal_v1.0.bin next to the executable or in the working directory]
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Keep crops as they are, even when they look underexposed
    #[arg(long, default_value_t = false)]
    pub no_fix_exposure: bool,

    /// Bypass the overwrite confirmation prompt
    #[arg(long, default_value_t = false)]
    pub no_confirm: bool,

    /// Write a JSON batch report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    pub log: bool,

    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    pub version: Option<bool>,
}

impl CropArgs {
    pub fn params(&self) -> CropParams {
        CropParams {
            width: self.width,
            height: self.height,
            outer_pad: self.outer_pad,
            border: self.border,
            face_percent: self.face_percent,
            pad: PadWeights {
                up: Some(self.pad_up),
                down: Some(self.pad_down),
                left: Some(self.pad_left),
                right: Some(self.pad_right),
            },
            fix_exposure: !self.no_fix_exposure,
            model: self.model.clone().unwrap_or_else(default_model_path),
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "denoise",
    version,
    about = "Remove noise from every image in a folder",
    disable_version_flag = true
)]
pub struct DenoiseArgs {
    /// Folder where images to denoise are located
    #[arg(short, long, default_value = ".", value_parser = parse_input_dir)]
    pub input: PathBuf,

    /// Folder where denoised images will be written (defaults to the input folder)
    #[arg(short, long, visible_alias = "path", short_alias = 'p', value_parser = parse_output_dir)]
    pub output: Option<PathBuf>,

    /// Filter strength; higher removes more noise and more detail
    #[arg(short, long, default_value_t = 10.0)]
    pub lum: f32,

    /// Write a JSON batch report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    pub log: bool,

    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    pub version: Option<bool>,
}

impl DenoiseArgs {
    pub fn params(&self) -> DenoiseParams {
        DenoiseParams::with_lum(self.lum)
    }
}

/// Existing directory holding at least one recognized image.
pub fn parse_input_dir(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if !path.is_dir() {
        return Err(AppError::MissingDirectory {
            path: value.to_string(),
        }
        .to_string());
    }
    match list_input_images(&path) {
        Ok(files) if !files.is_empty() => Ok(path),
        Ok(_) => Err(AppError::NoImages {
            path: value.to_string(),
        }
        .to_string()),
        Err(e) => Err(e.to_string()),
    }
}

/// Directory that is created when missing.
pub fn parse_output_dir(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if !path.is_dir() {
        fs::create_dir_all(&path).map_err(|source| {
            AppError::CreateDirectory {
                path: value.to_string(),
                source,
            }
            .to_string()
        })?;
    }
    Ok(path)
}

pub fn parse_size(value: &str) -> Result<u32, String> {
    match value.trim().parse::<u32>() {
        Ok(n) if n > 0 && n < MAX_DIMENSION => Ok(n),
        _ => Err(AppError::InvalidSize {
            size: value.to_string(),
        }
        .to_string()),
    }
}

pub fn parse_outer_pad(value: &str) -> Result<u32, String> {
    match value.trim().parse::<u32>() {
        Ok(n) if n < MAX_DIMENSION => Ok(n),
        _ => Err(AppError::InvalidPadding {
            pad: value.to_string(),
        }
        .to_string()),
    }
}

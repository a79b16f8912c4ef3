//! High-level library API: the shared batch driver used by both tools, plus
//! the two transforms it runs (face crop and denoise). Prefer these entrypoints
//! over the low-level processing modules when embedding the tools.
use std::fs;
use std::path::{Path, PathBuf};

use image::RgbImage;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::params::{CropParams, DenoiseParams};
use crate::core::processing::denoise::denoise_colored;
use crate::core::processing::pipeline::{CropOutcome, crop_face};
use crate::detect::{FaceDetector, SeetaDetector};
use crate::error::{Error, Result};
use crate::io::writers::image::write_rgb_image;
use crate::io::{list_input_images, load_rgb_image};
use crate::types::Rejection;

/// Per-image step run by [`process_directory`].
pub trait BatchTransform {
    /// Verb used in the per-file log line, e.g. `Cropping`.
    fn action(&self) -> &'static str;

    /// What a processed file counts as in the summary, e.g. `faces cropped`.
    fn outcome(&self) -> &'static str;

    fn apply(&mut self, image: &RgbImage) -> std::result::Result<RgbImage, Rejection>;
}

/// Detect the most prominent face and frame it.
pub struct CropTransform<D> {
    detector: D,
    params: CropParams,
}

impl<D: FaceDetector> CropTransform<D> {
    pub fn new(detector: D, params: CropParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { detector, params })
    }

    pub fn params(&self) -> &CropParams {
        &self.params
    }
}

impl CropTransform<SeetaDetector> {
    /// Crop transform backed by the SeetaFace model named in `params.model`.
    pub fn with_model(params: CropParams) -> Result<Self> {
        let detector = SeetaDetector::from_path(&params.model)?;
        Self::new(detector, params)
    }
}

impl<D: FaceDetector> BatchTransform for CropTransform<D> {
    fn action(&self) -> &'static str {
        "Cropping"
    }

    fn outcome(&self) -> &'static str {
        "faces cropped"
    }

    fn apply(&mut self, image: &RgbImage) -> std::result::Result<RgbImage, Rejection> {
        match crop_face(image, &mut self.detector, &self.params) {
            Ok(CropOutcome::Cropped(out)) => Ok(out),
            Ok(CropOutcome::NoFace) => Err(Rejection::NoFace),
            Ok(CropOutcome::EmptyCrop) => Err(Rejection::EmptyCrop),
            Err(e) => {
                debug!("Crop failed: {}", e);
                Err(Rejection::TransformFailed)
            }
        }
    }
}

/// Colored non-local means denoising.
pub struct DenoiseTransform {
    params: DenoiseParams,
}

impl DenoiseTransform {
    pub fn new(params: DenoiseParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }
}

impl BatchTransform for DenoiseTransform {
    fn action(&self) -> &'static str {
        "Denoising"
    }

    fn outcome(&self) -> &'static str {
        "images denoised"
    }

    fn apply(&mut self, image: &RgbImage) -> std::result::Result<RgbImage, Rejection> {
        denoise_colored(image, &self.params).map_err(|e| {
            debug!("Denoise failed: {}", e);
            Rejection::TransformFailed
        })
    }
}

/// A file that did not make it to the output directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedFile {
    pub path: PathBuf,
    pub reason: Rejection,
}

/// Batch processing report
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    /// Recognized image files found in the input directory
    pub input: usize,
    pub processed: usize,
    pub rejected: usize,
    pub rejected_files: Vec<RejectedFile>,
}

impl BatchReport {
    /// One-line summary, e.g. `3 input files, 2 faces cropped, 1 rejected`.
    pub fn summary(&self, outcome: &str) -> String {
        format!(
            "{} input files, {} {}, {} rejected",
            self.input, self.processed, outcome, self.rejected
        )
    }

    fn reject(&mut self, path: &Path, reason: Rejection) {
        warn!("Skipping: {} ({})", path.display(), reason);
        self.rejected += 1;
        self.rejected_files.push(RejectedFile {
            path: path.to_path_buf(),
            reason,
        });
    }
}

/// Run `transform` over every recognized image in `input_dir`.
///
/// Results are written under `output_dir` (default: `input_dir`) with the
/// input file name. Rejected inputs are left in place, and are also copied to
/// `reject_dir` when one is given that is not the input directory itself. Per-file
/// failures are counted and never stop the batch; an input directory without
/// images is an error.
pub fn process_directory<T: BatchTransform + ?Sized>(
    input_dir: &Path,
    output_dir: Option<&Path>,
    reject_dir: Option<&Path>,
    transform: &mut T,
) -> Result<BatchReport> {
    let files = list_input_images(input_dir)?;
    if files.is_empty() {
        return Err(Error::NoInputImages {
            dir: input_dir.to_path_buf(),
        });
    }

    let output_dir = output_dir.unwrap_or(input_dir);
    fs::create_dir_all(output_dir)?;
    let reject_dir = reject_dir.filter(|dir| !same_dir(dir, input_dir));
    if let Some(dir) = reject_dir {
        fs::create_dir_all(dir)?;
    }

    info!("Starting batch processing from directory: {:?}", input_dir);
    info!("Output directory: {:?}", output_dir);

    let mut report = BatchReport {
        input: files.len(),
        ..BatchReport::default()
    };

    for path in &files {
        info!("{}: {}", transform.action(), path.display());
        match process_file(path, output_dir, transform) {
            Ok(()) => report.processed += 1,
            Err(reason) => {
                report.reject(path, reason);
                if let Some(dir) = reject_dir {
                    copy_rejected(path, dir);
                }
            }
        }
    }

    info!("Batch processing complete!");
    Ok(report)
}

fn process_file<T: BatchTransform + ?Sized>(
    path: &Path,
    output_dir: &Path,
    transform: &mut T,
) -> std::result::Result<(), Rejection> {
    let (image, format) = load_rgb_image(path).map_err(|e| {
        debug!("Cannot read {:?}: {}", path, e);
        Rejection::Unreadable
    })?;
    let out = transform.apply(&image)?;

    let Some(name) = path.file_name() else {
        return Err(Rejection::WriteFailed);
    };
    write_rgb_image(&output_dir.join(name), &out, format).map_err(|e| {
        warn!("Cannot write {:?}: {}", name, e);
        Rejection::WriteFailed
    })
}

fn copy_rejected(path: &Path, reject_dir: &Path) {
    if let Some(name) = path.file_name() {
        if let Err(e) = fs::copy(path, reject_dir.join(name)) {
            warn!("Cannot copy {:?} to {:?}: {}", path, reject_dir, e);
        }
    }
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Crop every image in `input_dir` with the SeetaFace model from `params`.
pub fn crop_directory(
    input_dir: &Path,
    output_dir: Option<&Path>,
    reject_dir: Option<&Path>,
    params: &CropParams,
) -> Result<BatchReport> {
    let mut transform = CropTransform::with_model(params.clone())?;
    process_directory(input_dir, output_dir, reject_dir, &mut transform)
}

/// Denoise every image in `input_dir`.
pub fn denoise_directory(
    input_dir: &Path,
    output_dir: Option<&Path>,
    params: &DenoiseParams,
) -> Result<BatchReport> {
    let mut transform = DenoiseTransform::new(params.clone())?;
    process_directory(input_dir, output_dir, None, &mut transform)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_line_format() {
        let report = BatchReport {
            input: 5,
            processed: 3,
            rejected: 2,
            rejected_files: Vec::new(),
        };
        assert_eq!(
            report.summary("faces cropped"),
            "5 input files, 3 faces cropped, 2 rejected"
        );
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut transform = DenoiseTransform::new(DenoiseParams::default()).unwrap();
        let err = process_directory(dir.path(), None, None, &mut transform).unwrap_err();
        assert!(matches!(err, Error::NoInputImages { .. }));
    }

    #[test]
    fn invalid_params_fail_before_processing() {
        assert!(DenoiseTransform::new(DenoiseParams::with_lum(0.0)).is_err());
    }
}

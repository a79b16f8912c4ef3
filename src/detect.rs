//! Face detection seam.
//!
//! The crop pipeline only needs bounding boxes from a grayscale image, so the
//! detector is a trait: [`SeetaDetector`] wraps the `rustface` SeetaFace engine
//! for real runs, and tests can plug in anything that returns boxes.
use std::ffi::OsString;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use image::GrayImage;
use tracing::debug;

use crate::core::params::DEFAULT_MODEL_PATH;
use crate::core::processing::geometry::FaceBox;
use crate::error::{Error, Result};

/// Environment variable naming the SeetaFace model file.
pub const MODEL_ENV_VAR: &str = "JUSTCROP_MODEL";

/// Smallest face size handed to the detector, in pixels.
pub const MIN_FACE_SIZE: u32 = 20;
/// Image diagonal divided by this ratio gives the minimum face size.
pub const MIN_FACE_RATIO: f64 = 8.0;

/// Pluggable face detection backend.
pub trait FaceDetector {
    /// Detect faces in a grayscale image.
    fn detect(&mut self, gray: &GrayImage) -> Vec<FaceBox>;
}

impl<D: FaceDetector + ?Sized> FaceDetector for Box<D> {
    fn detect(&mut self, gray: &GrayImage) -> Vec<FaceBox> {
        (**self).detect(gray)
    }
}

/// The largest face, ties broken by detector score.
pub fn most_prominent(faces: &[FaceBox]) -> Option<FaceBox> {
    faces.iter().copied().max_by(|a, b| {
        a.area()
            .partial_cmp(&b.area())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(
                a.score
                    .partial_cmp(&b.score)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
    })
}

/// Minimum face size for an image: its diagonal over [`MIN_FACE_RATIO`],
/// never below [`MIN_FACE_SIZE`].
pub fn min_face_size(width: u32, height: u32) -> u32 {
    let diagonal = ((width as f64).powi(2) + (height as f64).powi(2)).sqrt();
    ((diagonal / MIN_FACE_RATIO) as u32).max(MIN_FACE_SIZE)
}

/// Places to look for the model when none is given on the command line.
///
/// A set `JUSTCROP_MODEL` wins outright. Otherwise the model is looked up
/// under `model/` next to the executable, then under `model/` in the working
/// directory.
pub fn model_search_paths(env_value: Option<OsString>, exe_dir: Option<&Path>) -> Vec<PathBuf> {
    if let Some(value) = env_value.filter(|v| !v.is_empty()) {
        return vec![PathBuf::from(value)];
    }
    let mut paths = Vec::with_capacity(2);
    if let Some(dir) = exe_dir {
        paths.push(dir.join(DEFAULT_MODEL_PATH));
    }
    paths.push(PathBuf::from(DEFAULT_MODEL_PATH));
    paths
}

/// First existing candidate, or the last one so load errors name a path.
pub fn first_existing(candidates: Vec<PathBuf>) -> PathBuf {
    let fallback = candidates
        .last()
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH));
    candidates
        .into_iter()
        .find(|p| p.is_file())
        .unwrap_or(fallback)
}

/// Default model location for this process.
pub fn default_model_path() -> PathBuf {
    let exe = std::env::current_exe().ok();
    let exe_dir = exe.as_deref().and_then(Path::parent);
    first_existing(model_search_paths(std::env::var_os(MODEL_ENV_VAR), exe_dir))
}

/// Face detector backed by the `rustface` crate (SeetaFace frontal model).
pub struct SeetaDetector {
    model: rustface::Model,
}

impl SeetaDetector {
    /// Load the SeetaFace model from `path`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::Model {
            path: path.to_path_buf(),
            source,
        })?;
        let model = rustface::read_model(BufReader::new(file)).map_err(|source| Error::Model {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { model })
    }
}

impl FaceDetector for SeetaDetector {
    fn detect(&mut self, gray: &GrayImage) -> Vec<FaceBox> {
        let (width, height) = gray.dimensions();
        if width.min(height) < MIN_FACE_SIZE {
            return Vec::new();
        }
        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(min_face_size(width, height));
        detector.set_score_thresh(2.0);
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);

        let faces = detector.detect(&rustface::ImageData::new(gray.as_raw(), width, height));
        debug!("Detected {} face(s)", faces.len());

        faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                FaceBox {
                    x: bbox.x() as f64,
                    y: bbox.y() as f64,
                    width: bbox.width() as f64,
                    height: bbox.height() as f64,
                    score: face.score(),
                }
            })
            .collect()
    }
}

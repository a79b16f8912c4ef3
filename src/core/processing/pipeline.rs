use image::RgbImage;
use tracing::debug;

use crate::core::params::CropParams;
use crate::core::processing::border::fill_border;
use crate::core::processing::color::fix_exposure;
use crate::core::processing::geometry::{CropGeometry, CropRect, crop_positions};
use crate::core::processing::resize::resize_to_fit;
use crate::detect::{FaceDetector, most_prominent};
use crate::error::Result;

/// Result of running the crop pipeline on one image.
#[derive(Debug, Clone, PartialEq)]
pub enum CropOutcome {
    Cropped(RgbImage),
    NoFace,
    EmptyCrop,
}

impl CropOutcome {
    pub fn into_image(self) -> Option<RgbImage> {
        match self {
            CropOutcome::Cropped(image) => Some(image),
            CropOutcome::NoFace | CropOutcome::EmptyCrop => None,
        }
    }
}

/// Cut `rect` out of `image`, intersected with the image bounds.
/// Returns `None` when nothing is left.
pub fn extract_region(image: &RgbImage, rect: &CropRect) -> Option<RgbImage> {
    let (w, h) = image.dimensions();
    let left = rect.left.clamp(0, w as i64) as u32;
    let right = rect.right.clamp(0, w as i64) as u32;
    let top = rect.top.clamp(0, h as i64) as u32;
    let bottom = rect.bottom.clamp(0, h as i64) as u32;
    if right <= left || bottom <= top {
        return None;
    }
    Some(image::imageops::crop_imm(image, left, top, right - left, bottom - top).to_image())
}

/// Resize a crop into the output frame and fill the border around it.
pub fn frame_crop(crop: &RgbImage, params: &CropParams) -> Result<RgbImage> {
    let resized = resize_to_fit(crop, params.width, params.height, params.outer_pad)?;
    let framed = fill_border(&resized, params.width, params.height, params.border)?;
    Ok(if params.fix_exposure {
        fix_exposure(framed)
    } else {
        framed
    })
}

/// Detect the most prominent face in `image` and produce the framed crop around it.
pub fn crop_face<D: FaceDetector + ?Sized>(
    image: &RgbImage,
    detector: &mut D,
    params: &CropParams,
) -> Result<CropOutcome> {
    let gray = image::imageops::grayscale(image);
    let faces = detector.detect(&gray);
    let Some(face) = most_prominent(&faces) else {
        return Ok(CropOutcome::NoFace);
    };

    let (w, h) = image.dimensions();
    let geometry = CropGeometry {
        target_width: params.width,
        target_height: params.height,
        face_percent: params.face_percent,
        pad: params.pad,
    };
    let rect = crop_positions(w, h, &face, &geometry);
    debug!(
        "Face at ({}, {}) {}x{} -> crop top={} bottom={} left={} right={}",
        face.x, face.y, face.width, face.height, rect.top, rect.bottom, rect.left, rect.right
    );
    if rect.is_empty() {
        return Ok(CropOutcome::EmptyCrop);
    }

    let Some(region) = extract_region(image, &rect) else {
        return Ok(CropOutcome::EmptyCrop);
    };
    frame_crop(&region, params).map(CropOutcome::Cropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::processing::geometry::FaceBox;
    use crate::types::BorderMode;
    use image::{GrayImage, Rgb};

    struct FixedFaces(Vec<FaceBox>);

    impl FaceDetector for FixedFaces {
        fn detect(&mut self, _gray: &GrayImage) -> Vec<FaceBox> {
            self.0.clone()
        }
    }

    fn params(border: BorderMode) -> CropParams {
        CropParams {
            width: 120,
            height: 90,
            border,
            fix_exposure: false,
            ..CropParams::default()
        }
    }

    #[test]
    fn no_face_is_reported() {
        let img = RgbImage::from_pixel(200, 200, Rgb([50, 60, 70]));
        let outcome = crop_face(&img, &mut FixedFaces(vec![]), &params(BorderMode::Replicate)).unwrap();
        assert_eq!(outcome, CropOutcome::NoFace);
        assert!(outcome.into_image().is_none());
    }

    #[test]
    fn every_border_mode_returns_target_size() {
        let img = RgbImage::from_fn(320, 240, |x, y| Rgb([x as u8, y as u8, 128]));
        let face = FaceBox::new(140.0, 100.0, 40.0, 50.0);
        for mode in [
            BorderMode::Replicate,
            BorderMode::Reflect,
            BorderMode::Average,
            BorderMode::Inpaint,
        ] {
            let outcome = crop_face(&img, &mut FixedFaces(vec![face]), &params(mode)).unwrap();
            let out = outcome.into_image().expect("cropped");
            assert_eq!(out.dimensions(), (120, 90), "mode {}", mode);
        }
    }

    #[test]
    fn degenerate_face_gives_empty_crop() {
        let img = RgbImage::from_pixel(100, 100, Rgb([0, 0, 0]));
        let face = FaceBox::new(10.0, 10.0, 0.0, 0.0);
        let outcome = crop_face(&img, &mut FixedFaces(vec![face]), &params(BorderMode::Average)).unwrap();
        assert_eq!(outcome, CropOutcome::EmptyCrop);
    }

    #[test]
    fn extract_region_clips_to_image() {
        let img = RgbImage::from_pixel(10, 10, Rgb([1, 1, 1]));
        let rect = CropRect { top: -3, bottom: 4, left: 6, right: 20 };
        assert_eq!(extract_region(&img, &rect).unwrap().dimensions(), (4, 4));
        let outside = CropRect { top: 12, bottom: 15, left: 0, right: 5 };
        assert!(extract_region(&img, &outside).is_none());
    }
}

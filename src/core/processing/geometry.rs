//! Crop rectangle computation around a detected face.
//!
//! The crop height is sized so the face covers a configured percentage of the
//! output frame, the width follows the target aspect ratio, and the free space
//! around the face is split between opposing sides according to directional
//! weights. Rectangles that spill over the image are walked back inside one
//! pixel at a time: the top/left edges by shifting, the bottom/right edges by
//! shrinking along the aspect ratio. The shrink is approximate, so clamped
//! rectangles may drift slightly from the target ratio.
use serde::{Deserialize, Serialize};

use crate::core::params::{DEFAULT_FACE_PERCENT, PadWeights};

/// Axis-aligned face bounding box in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Detector confidence, larger is better.
    pub score: f64,
}

impl FaceBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            score: 0.0,
        }
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }
}

/// Integer crop bounds; `bottom` and `right` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub top: i64,
    pub bottom: i64,
    pub left: i64,
    pub right: i64,
}

impl CropRect {
    pub fn width(&self) -> i64 {
        self.right - self.left
    }

    pub fn height(&self) -> i64 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Width over height, `None` for empty rectangles.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(self.width() as f64 / self.height() as f64)
        }
    }

    /// True when the rectangle lies in `[0, img_w] x [0, img_h]` with exclusive ends.
    pub fn fits_within(&self, img_w: u32, img_h: u32) -> bool {
        self.left >= 0
            && self.top >= 0
            && self.right <= img_w as i64
            && self.bottom <= img_h as i64
    }
}

/// Inputs to [`crop_positions`] besides the image and face dimensions.
#[derive(Debug, Clone, Copy)]
pub struct CropGeometry {
    pub target_width: u32,
    pub target_height: u32,
    pub face_percent: f64,
    pub pad: PadWeights,
}

/// Clamp the face percentage into `(0, 100]`; non-positive values use the default.
pub fn normalize_face_percent(face_percent: f64) -> f64 {
    if face_percent > 100.0 {
        100.0
    } else if face_percent <= 0.0 || face_percent.is_nan() {
        DEFAULT_FACE_PERCENT
    } else {
        face_percent
    }
}

// Fraction of `total` assigned to the `near` side; an all-zero pair splits evenly.
fn share(total: f64, near: f64, far: f64) -> f64 {
    let sum = near + far;
    if sum <= 0.0 {
        total / 2.0
    } else {
        total * near / sum
    }
}

/// Compute the crop rectangle for `face` inside an `img_w` x `img_h` image.
///
/// # Examples
///
/// ```rust
/// use justcrop::core::params::PadWeights;
/// use justcrop::core::processing::geometry::{crop_positions, CropGeometry, FaceBox};
///
/// let rect = crop_positions(
///     1000,
///     1000,
///     &FaceBox::new(400.0, 400.0, 100.0, 100.0),
///     &CropGeometry {
///         target_width: 500,
///         target_height: 500,
///         face_percent: 50.0,
///         pad: PadWeights::default(),
///     },
/// );
/// assert_eq!((rect.top, rect.bottom, rect.left, rect.right), (350, 550, 350, 550));
/// ```
pub fn crop_positions(img_w: u32, img_h: u32, face: &FaceBox, geometry: &CropGeometry) -> CropRect {
    let (pad_up, pad_down, pad_left, pad_right) = geometry.pad.resolved();
    let face_percent = normalize_face_percent(geometry.face_percent);
    let img_w = img_w as f64;
    let img_h = img_h as f64;

    let height_crop = (face.height * 100.0 / face_percent).min(img_h);
    let aspect_ratio = geometry.target_width as f64 / geometry.target_height as f64;
    let width_crop = aspect_ratio * height_crop;

    // Free space around the face, split between opposing sides by weight
    let xpad = width_crop - face.width;
    let ypad = height_crop - face.height;

    let mut h1 = face.x - share(xpad, pad_left, pad_right);
    let mut h2 = face.x + face.width + share(xpad, pad_right, pad_left);
    let mut v1 = face.y - share(ypad, pad_up, pad_down);
    let mut v2 = face.y + face.height + share(ypad, pad_down, pad_up);

    while h1 < 0.0 {
        h1 += 1.0;
        h2 += 1.0;
    }
    while v1 < 0.0 {
        v1 += 1.0;
        v2 += 1.0;
    }
    while v2 > img_h {
        v2 -= 1.0;
        h2 -= aspect_ratio;
    }
    while h2 > img_w {
        h2 -= 1.0;
        v2 -= 1.0 / aspect_ratio;
    }

    // `as` truncates toward zero, matching integer pixel indexing
    CropRect {
        top: v1 as i64,
        bottom: v2 as i64,
        left: h1 as i64,
        right: h2 as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(w: u32, h: u32, face_percent: f64) -> CropGeometry {
        CropGeometry {
            target_width: w,
            target_height: h,
            face_percent,
            pad: PadWeights::default(),
        }
    }

    #[test]
    fn interior_face_keeps_exact_aspect_ratio() {
        let rect = crop_positions(
            2000,
            2000,
            &FaceBox::new(800.0, 900.0, 120.0, 160.0),
            &geometry(600, 400, 40.0),
        );
        // height 400, width 600, centered on the face
        assert_eq!(rect.height(), 400);
        assert_eq!(rect.width(), 600);
        assert_eq!(rect.aspect_ratio(), Some(1.5));
        assert!(rect.fits_within(2000, 2000));
        assert_eq!(rect.left, 800 - 240);
        assert_eq!(rect.top, 900 - 120);
    }

    #[test]
    fn interior_face_stays_inside_image() {
        let rect = crop_positions(
            640,
            480,
            &FaceBox::new(280.0, 200.0, 60.0, 60.0),
            &geometry(500, 500, 50.0),
        );
        assert!(rect.fits_within(640, 480));
        assert!(!rect.is_empty());
    }

    #[test]
    fn full_face_percent_never_exceeds_image_height() {
        let rect = crop_positions(
            300,
            200,
            &FaceBox::new(50.0, 0.0, 180.0, 260.0),
            &geometry(100, 100, 100.0),
        );
        assert!(rect.height() <= 200);
        assert!(rect.fits_within(300, 200));
    }

    #[test]
    fn face_percent_is_clamped() {
        assert_eq!(normalize_face_percent(150.0), 100.0);
        assert_eq!(normalize_face_percent(0.0), 50.0);
        assert_eq!(normalize_face_percent(-3.0), 50.0);
        assert_eq!(normalize_face_percent(25.0), 25.0);
    }

    #[test]
    fn directional_weights_shift_the_face() {
        let face = FaceBox::new(400.0, 400.0, 100.0, 100.0);
        let mut geo = geometry(500, 500, 50.0);
        geo.pad = PadWeights {
            up: Some(25.0),
            down: Some(75.0),
            left: Some(0.0),
            right: Some(100.0),
        };
        let rect = crop_positions(1000, 1000, &face, &geo);
        // 100 px of slack per axis: 25/75 vertically, 0/100 horizontally
        assert_eq!(rect.top, 375);
        assert_eq!(rect.bottom, 575);
        assert_eq!(rect.left, 400);
        assert_eq!(rect.right, 600);
    }

    #[test]
    fn zero_weight_pair_splits_evenly() {
        let face = FaceBox::new(400.0, 400.0, 100.0, 100.0);
        let mut geo = geometry(500, 500, 50.0);
        geo.pad.left = Some(0.0);
        geo.pad.right = Some(0.0);
        let rect = crop_positions(1000, 1000, &face, &geo);
        assert_eq!((rect.left, rect.right), (350, 550));
    }

    #[test]
    fn top_left_overflow_is_shifted_inward() {
        let rect = crop_positions(
            1000,
            1000,
            &FaceBox::new(10.0, 20.0, 100.0, 100.0),
            &geometry(500, 500, 50.0),
        );
        assert_eq!(rect.left, 0);
        assert_eq!(rect.top, 0);
        assert_eq!(rect.width(), 200);
        assert_eq!(rect.height(), 200);
    }

    #[test]
    fn bottom_right_overflow_shrinks_inside() {
        let rect = crop_positions(
            500,
            400,
            &FaceBox::new(420.0, 330.0, 60.0, 60.0),
            &geometry(300, 300, 40.0),
        );
        assert!(rect.fits_within(500, 400));
        assert!(!rect.is_empty());
    }
}

//! Color space helpers: sRGB <-> CIELAB (8-bit scaled, D65 white) for the
//! denoiser, and the highlight-based exposure fix applied to crops.
use image::{GrayImage, Rgb, RgbImage};
use ndarray::Array3;

// D65 reference white
const WHITE_X: f32 = 0.950456;
const WHITE_Z: f32 = 1.088754;
const EPSILON: f32 = 0.008856;
const KAPPA: f32 = 903.3;

/// Gamma applied to crops with almost no highlights.
pub const EXPOSURE_GAMMA: f32 = 0.90;
/// Fraction of pixels that must reach the highlight band to skip the fix.
pub const EXPOSURE_THRESHOLD: f64 = 0.001;
/// Number of top intensity levels counted as highlights.
pub const HIGHLIGHT_LEVELS: usize = 26;

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn lab_f(t: f32) -> f32 {
    if t > EPSILON {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

fn lab_f_inv(t: f32) -> f32 {
    let t3 = t * t * t;
    if t3 > EPSILON {
        t3
    } else {
        (t - 16.0 / 116.0) / 7.787
    }
}

/// Convert one RGB8 pixel to Lab with L scaled to 0..255 and a/b offset by 128.
pub fn rgb_to_lab_pixel(p: Rgb<u8>) -> [f32; 3] {
    let r = srgb_to_linear(p[0] as f32 / 255.0);
    let g = srgb_to_linear(p[1] as f32 / 255.0);
    let b = srgb_to_linear(p[2] as f32 / 255.0);

    let x = (0.412_453 * r + 0.357_580 * g + 0.180_423 * b) / WHITE_X;
    let y = 0.212_671 * r + 0.715_160 * g + 0.072_169 * b;
    let z = (0.019_334 * r + 0.119_193 * g + 0.950_227 * b) / WHITE_Z;

    let (fx, fy, fz) = (lab_f(x), lab_f(y), lab_f(z));
    let l = if y > EPSILON { 116.0 * fy - 16.0 } else { KAPPA * y };
    [
        l * 255.0 / 100.0,
        500.0 * (fx - fy) + 128.0,
        200.0 * (fy - fz) + 128.0,
    ]
}

/// Inverse of [`rgb_to_lab_pixel`], saturating to 8 bits.
pub fn lab_to_rgb_pixel(lab: [f32; 3]) -> Rgb<u8> {
    let l = lab[0] * 100.0 / 255.0;
    let a = lab[1] - 128.0;
    let b = lab[2] - 128.0;

    let fy = (l + 16.0) / 116.0;
    let fx = fy + a / 500.0;
    let fz = fy - b / 200.0;
    let y = if l > KAPPA * EPSILON { fy * fy * fy } else { l / KAPPA };
    let x = lab_f_inv(fx) * WHITE_X;
    let z = lab_f_inv(fz) * WHITE_Z;

    let r = 3.240_479 * x - 1.537_150 * y - 0.498_535 * z;
    let g = -0.969_256 * x + 1.875_991 * y + 0.041_556 * z;
    let bl = 0.055_648 * x - 0.204_043 * y + 1.057_311 * z;

    let to_u8 = |c: f32| (linear_to_srgb(c.clamp(0.0, 1.0)) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb([to_u8(r), to_u8(g), to_u8(bl)])
}

/// Convert an RGB8 image into a `(rows, cols, 3)` Lab array.
pub fn rgb_to_lab(image: &RgbImage) -> Array3<f32> {
    let (w, h) = image.dimensions();
    let mut lab = Array3::zeros((h as usize, w as usize, 3));
    for (x, y, p) in image.enumerate_pixels() {
        let v = rgb_to_lab_pixel(*p);
        for (c, value) in v.into_iter().enumerate() {
            lab[[y as usize, x as usize, c]] = value;
        }
    }
    lab
}

pub fn lab_to_rgb(lab: &Array3<f32>) -> RgbImage {
    let (h, w, _) = lab.dim();
    RgbImage::from_fn(w as u32, h as u32, |x, y| {
        let (y, x) = (y as usize, x as usize);
        lab_to_rgb_pixel([lab[[y, x, 0]], lab[[y, x, 1]], lab[[y, x, 2]]])
    })
}

/// `out = 255 * (in / 255) ^ correction` for every channel.
pub fn apply_gamma(image: &RgbImage, correction: f32) -> RgbImage {
    let mut lut = [0u8; 256];
    for (v, slot) in lut.iter_mut().enumerate() {
        *slot = ((v as f32 / 255.0).powf(correction) * 255.0) as u8;
    }
    let mut out = image.clone();
    for p in out.pixels_mut() {
        for c in p.0.iter_mut() {
            *c = lut[*c as usize];
        }
    }
    out
}

/// True when fewer than [`EXPOSURE_THRESHOLD`] of the pixels sit in the top
/// [`HIGHLIGHT_LEVELS`] gray levels.
pub fn is_underexposed(gray: &GrayImage) -> bool {
    let total = gray.pixels().len();
    if total == 0 {
        return false;
    }
    let floor = (256 - HIGHLIGHT_LEVELS) as u8;
    let highlights = gray.pixels().filter(|p| p[0] >= floor).count();
    (highlights as f64) < EXPOSURE_THRESHOLD * total as f64
}

/// Brighten `image` with [`EXPOSURE_GAMMA`] if it is underexposed.
pub fn fix_exposure(image: RgbImage) -> RgbImage {
    let gray = image::imageops::grayscale(&image);
    if is_underexposed(&gray) {
        apply_gamma(&image, EXPOSURE_GAMMA)
    } else {
        image
    }
}

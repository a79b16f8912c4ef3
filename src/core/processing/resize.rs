use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image};
use image::RgbImage;
use tracing::{info, warn};

use crate::error::{Error, Result};

/// Dimensions of `src_w` x `src_h` scaled to fit inside `target_w` x `target_h`
/// (aspect ratio kept), then shrunk by `outer_pad` on each axis.
/// Every returned dimension is at least one pixel.
pub fn calculate_fit_dimensions(
    src_w: u32,
    src_h: u32,
    target_w: u32,
    target_h: u32,
    outer_pad: u32,
) -> (u32, u32) {
    let scale = (target_w as f64 / src_w as f64).min(target_h as f64 / src_h as f64);
    let fit_w = ((src_w as f64 * scale).round() as u32).clamp(1, target_w);
    let fit_h = ((src_h as f64 * scale).round() as u32).clamp(1, target_h);

    let new_w = fit_w.saturating_sub(outer_pad).max(1);
    let new_h = fit_h.saturating_sub(outer_pad).max(1);
    if new_w == 1 || new_h == 1 {
        warn!(
            "Outer padding {} leaves a degenerate {}x{} image",
            outer_pad, new_w, new_h
        );
    }
    (new_w, new_h)
}

/// Resample an RGB8 image to exactly `target_w` x `target_h`.
///
/// Uses a box convolution, which averages source pixels when shrinking.
pub fn resize_rgb_image(src: &RgbImage, target_w: u32, target_h: u32) -> Result<RgbImage> {
    let (w, h) = src.dimensions();
    if w == 0 || h == 0 || target_w == 0 || target_h == 0 {
        return Err(Error::Processing(format!(
            "cannot resize {}x{} to {}x{}",
            w, h, target_w, target_h
        )));
    }
    if (w, h) == (target_w, target_h) {
        return Ok(src.clone());
    }

    let resize_options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Box));
    let mut resizer = Resizer::new();

    let src_image = Image::from_vec_u8(w, h, src.as_raw().clone(), PixelType::U8x3)?;
    let mut dst_image = Image::new(target_w, target_h, PixelType::U8x3);
    resizer.resize(&src_image, &mut dst_image, &resize_options)?;

    RgbImage::from_raw(target_w, target_h, dst_image.into_vec())
        .ok_or_else(|| Error::Resize("resized buffer has unexpected length".to_string()))
}

/// Fit `src` inside the target frame minus `outer_pad`.
pub fn resize_to_fit(
    src: &RgbImage,
    target_w: u32,
    target_h: u32,
    outer_pad: u32,
) -> Result<RgbImage> {
    let (w, h) = src.dimensions();
    let (new_w, new_h) = calculate_fit_dimensions(w, h, target_w, target_h, outer_pad);
    info!(
        "Original size: {}x{}, New size: {}x{}",
        w, h, new_w, new_h
    );
    resize_rgb_image(src, new_w, new_h)
}

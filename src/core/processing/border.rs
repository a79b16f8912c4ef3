use image::{Rgb, RgbImage};
use tracing::{debug, info};

use crate::core::processing::inpaint::{blend_weighted, inpaint};
use crate::error::{Error, Result};
use crate::types::BorderMode;

/// Rows and columns averaged for the `average` fill color.
const FILL_ZONE: std::ops::Range<u32> = 2..6;

/// Neighborhood radius used when inpainting the padded band.
pub const INPAINT_RADIUS: u32 = 8;

/// Pixels added on each side of an image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Padding {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl Padding {
    pub fn symmetric(vertical: u32, horizontal: u32) -> Self {
        Self {
            top: vertical,
            bottom: vertical,
            left: horizontal,
            right: horizontal,
        }
    }
}

/// Map an out-of-range coordinate back into `[0, len)` by clamping to the edge.
pub fn replicate_index(i: i64, len: u32) -> u32 {
    i.clamp(0, len as i64 - 1) as u32
}

/// Map an out-of-range coordinate back into `[0, len)` by mirroring around the
/// edge pixel without repeating it (`gfedcb|abcdefgh|gfedcba`).
pub fn reflect_101_index(i: i64, len: u32) -> u32 {
    let n = len as i64;
    if n == 1 {
        return 0;
    }
    let period = 2 * (n - 1);
    let mut k = i.rem_euclid(period);
    if k >= n {
        k = period - k;
    }
    k as u32
}

/// Pad `src` by sampling outside pixels through `map_index`.
fn pad_mapped(src: &RgbImage, pad: Padding, map_index: fn(i64, u32) -> u32) -> RgbImage {
    let (w, h) = src.dimensions();
    let out_w = w + pad.left + pad.right;
    let out_h = h + pad.top + pad.bottom;
    RgbImage::from_fn(out_w, out_h, |x, y| {
        let sx = map_index(x as i64 - pad.left as i64, w);
        let sy = map_index(y as i64 - pad.top as i64, h);
        *src.get_pixel(sx, sy)
    })
}

/// Pad `src` with a constant color.
pub fn pad_constant(src: &RgbImage, pad: Padding, color: Rgb<u8>) -> RgbImage {
    let (w, h) = src.dimensions();
    let mut padded = RgbImage::from_pixel(w + pad.left + pad.right, h + pad.top + pad.bottom, color);
    // Copy per row using slice copies to minimize per-pixel indexing
    let src_row = (w * 3) as usize;
    let dst_row = (padded.width() * 3) as usize;
    let src_raw = src.as_raw();
    let dst_raw: &mut [u8] = &mut padded;
    for row in 0..h as usize {
        let src_offset = row * src_row;
        let dst_offset = (row + pad.top as usize) * dst_row + pad.left as usize * 3;
        dst_raw[dst_offset..dst_offset + src_row]
            .copy_from_slice(&src_raw[src_offset..src_offset + src_row]);
    }
    padded
}

pub fn pad_replicate(src: &RgbImage, pad: Padding) -> RgbImage {
    pad_mapped(src, pad, replicate_index)
}

pub fn pad_reflect(src: &RgbImage, pad: Padding) -> RgbImage {
    pad_mapped(src, pad, reflect_101_index)
}

/// Per-channel rounded mean of rows/cols 2..6, clamped to the image.
/// Falls back to the whole image when that zone is empty.
pub fn corner_fill_color(src: &RgbImage) -> Rgb<u8> {
    let (w, h) = src.dimensions();
    if w == 0 || h == 0 {
        return Rgb([0, 0, 0]);
    }
    let zone = |len: u32| {
        let start = FILL_ZONE.start.min(len);
        let end = FILL_ZONE.end.min(len);
        if start < end { start..end } else { 0..len }
    };
    let (xs, ys) = (zone(w), zone(h));

    let mut sum = [0u64; 3];
    let mut count = 0u64;
    for y in ys {
        for x in xs.clone() {
            let p = src.get_pixel(x, y);
            for c in 0..3 {
                sum[c] += p[c] as u64;
            }
            count += 1;
        }
    }
    let mean = |s: u64| ((s as f64 / count as f64).round()).clamp(0.0, 255.0) as u8;
    Rgb([mean(sum[0]), mean(sum[1]), mean(sum[2])])
}

/// Place `src` (already resized) into a `target_w` x `target_h` frame using `mode`.
///
/// The image is padded by `floor(diff / 2)` on both sides of each axis; any
/// leftover row or column is added in a second pass (top/left for `average`,
/// bottom/right otherwise) so the result is always exactly the target size.
pub fn fill_border(src: &RgbImage, target_w: u32, target_h: u32, mode: BorderMode) -> Result<RgbImage> {
    let (w, h) = src.dimensions();
    if w == 0 || h == 0 {
        return Err(Error::Processing("cannot pad an empty image".to_string()));
    }
    if w > target_w || h > target_h {
        return Err(Error::Processing(format!(
            "image {}x{} does not fit in {}x{}",
            w, h, target_w, target_h
        )));
    }

    let y_pad = (target_h - h) / 2;
    let x_pad = (target_w - w) / 2;
    let y_extra = target_h - h - 2 * y_pad;
    let x_extra = target_w - w - 2 * x_pad;
    let base = Padding::symmetric(y_pad, x_pad);
    let residual = Padding {
        top: 0,
        bottom: y_extra,
        left: 0,
        right: x_extra,
    };

    info!(
        "Adding border: mode={}, size={}x{}, pad_x={}, pad_y={}",
        mode, w, h, x_pad, y_pad
    );

    let framed = match mode {
        BorderMode::Replicate => pad_replicate(&pad_replicate(src, base), residual),
        BorderMode::Reflect => pad_reflect(&pad_reflect(src, base), residual),
        BorderMode::Average => {
            let color = corner_fill_color(src);
            let padded = pad_constant(src, base, color);
            // The leftover goes on the top/left edge for the average fill
            let residual = Padding {
                top: y_extra,
                bottom: 0,
                left: x_extra,
                right: 0,
            };
            pad_constant(&padded, residual, color)
        }
        BorderMode::Inpaint => {
            let color = corner_fill_color(src);
            let padded = pad_constant(&pad_constant(src, base, color), residual, color);
            let mask = padded_region_mask(target_w, target_h, x_pad, y_pad, w, h);
            debug!(
                "Inpainting {} border pixels",
                mask.iter().filter(|&&m| m).count()
            );
            let restored = inpaint(&padded, &mask, INPAINT_RADIUS);
            blend_weighted(&padded, 0.0, &restored, 1.0)?
        }
    };

    debug_assert_eq!(framed.dimensions(), (target_w, target_h));
    Ok(framed)
}

/// Row-major mask of the pixels to inpaint: everything outside the placed
/// image, plus its first row and first column.
fn padded_region_mask(
    frame_w: u32,
    frame_h: u32,
    x_pad: u32,
    y_pad: u32,
    w: u32,
    h: u32,
) -> Vec<bool> {
    let mut mask = vec![true; (frame_w * frame_h) as usize];
    for y in (y_pad + 1)..(y_pad + h) {
        let row = (y * frame_w) as usize;
        for x in (x_pad + 1)..(x_pad + w) {
            mask[row + x as usize] = false;
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| Rgb([(x * 10) as u8, (y * 10) as u8, 7]))
    }

    #[test]
    fn reflect_101_mirrors_without_edge_repeat() {
        let idx: Vec<u32> = (-3..8).map(|i| reflect_101_index(i, 5)).collect();
        assert_eq!(idx, vec![3, 2, 1, 0, 1, 2, 3, 4, 3, 2, 1]);
        assert_eq!(reflect_101_index(-4, 1), 0);
    }

    #[test]
    fn replicate_clamps_to_edge() {
        assert_eq!(replicate_index(-5, 4), 0);
        assert_eq!(replicate_index(9, 4), 3);
        assert_eq!(replicate_index(2, 4), 2);
    }

    #[test]
    fn replicate_and_reflect_fill_the_frame() {
        let src = gradient(5, 3);
        let rep = fill_border(&src, 9, 8, BorderMode::Replicate).unwrap();
        assert_eq!(rep.dimensions(), (9, 8));
        // top-left corner copies the source corner
        assert_eq!(rep.get_pixel(0, 0), src.get_pixel(0, 0));

        let refl = fill_border(&src, 9, 8, BorderMode::Reflect).unwrap();
        assert_eq!(refl.dimensions(), (9, 8));
        // x_pad = 2, y_pad = 2: pixel (0, 2) mirrors source column 2
        assert_eq!(refl.get_pixel(0, 2), src.get_pixel(2, 0));
    }

    #[test]
    fn average_uses_corner_zone_and_exact_size() {
        let mut src = RgbImage::from_pixel(10, 10, Rgb([0, 0, 0]));
        for y in 2..6 {
            for x in 2..6 {
                src.put_pixel(x, y, Rgb([100, 50, 25]));
            }
        }
        assert_eq!(corner_fill_color(&src), Rgb([100, 50, 25]));

        let out = fill_border(&src, 15, 13, BorderMode::Average).unwrap();
        assert_eq!(out.dimensions(), (15, 13));
        assert_eq!(*out.get_pixel(0, 0), Rgb([100, 50, 25]));
        assert_eq!(*out.get_pixel(14, 12), Rgb([100, 50, 25]));
    }

    #[test]
    fn tiny_images_average_what_exists() {
        let src = RgbImage::from_pixel(2, 2, Rgb([9, 8, 7]));
        assert_eq!(corner_fill_color(&src), Rgb([9, 8, 7]));
    }

    #[test]
    fn inpaint_returns_exact_target_size() {
        let src = gradient(6, 4);
        let out = fill_border(&src, 11, 9, BorderMode::Inpaint).unwrap();
        assert_eq!(out.dimensions(), (11, 9));
    }

    #[test]
    fn mask_keeps_image_interior_only() {
        let mask = padded_region_mask(6, 6, 1, 1, 4, 4);
        let known: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter(|(_, m)| !**m)
            .map(|(i, _)| i)
            .collect();
        // interior rows/cols 2..5
        assert_eq!(known, vec![14, 15, 16, 20, 21, 22, 26, 27, 28]);
    }

    #[test]
    fn oversized_image_is_rejected() {
        let src = gradient(6, 4);
        assert!(fill_border(&src, 5, 9, BorderMode::Replicate).is_err());
    }
}

//! Content-aware filling of masked pixels.
//!
//! Masked pixels are restored layer by layer from the known region inward
//! ("onion peel"): each pass fills every unknown pixel that touches a known
//! one, using a distance-weighted mean of the known pixels within `radius`.
//! Pixels filled in a pass only become known once the whole pass is done.
use image::RgbImage;
use ndarray::{Array2, Array3, Zip};
use tracing::debug;

use crate::core::processing::array::{array_to_rgb, rgb_to_array};
use crate::error::{Error, Result};

const NEIGHBORS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Fill the pixels where `mask` is true (row-major, one entry per pixel).
///
/// Returns a copy of `image` unchanged if the mask has the wrong length, is
/// empty, or covers every pixel.
pub fn inpaint(image: &RgbImage, mask: &[bool], radius: u32) -> RgbImage {
    let (w, h) = image.dimensions();
    let (rows, cols) = (h as usize, w as usize);
    if mask.len() != rows * cols {
        return image.clone();
    }

    let mut known = Array2::from_shape_fn((rows, cols), |(y, x)| !mask[y * cols + x]);
    if known.iter().all(|&k| k) || !known.iter().any(|&k| k) {
        return image.clone();
    }

    let mut values = rgb_to_array(image);
    let r = radius.max(1) as i64;
    let mut passes = 0usize;

    // Once a pixel is queued it stays queued, so each pixel is visited once.
    let mut frontier = frontier(&known);
    let mut queued = known.clone();
    for &(y, x) in &frontier {
        queued[[y, x]] = true;
    }

    while !frontier.is_empty() {
        let filled: Vec<[f32; 3]> = frontier
            .iter()
            .map(|&(y, x)| weighted_mean(&values, &known, y, x, r))
            .collect();
        for (&(y, x), value) in frontier.iter().zip(filled) {
            for (c, v) in value.into_iter().enumerate() {
                values[[y, x, c]] = v;
            }
            known[[y, x]] = true;
        }

        let mut next = Vec::new();
        for &(y, x) in &frontier {
            for (ny, nx) in neighbors(y, x, rows, cols) {
                if !queued[[ny, nx]] {
                    queued[[ny, nx]] = true;
                    next.push((ny, nx));
                }
            }
        }
        frontier = next;
        passes += 1;
    }

    debug!("Inpainting finished after {} passes", passes);
    array_to_rgb(&values)
}

fn neighbors(y: usize, x: usize, rows: usize, cols: usize) -> impl Iterator<Item = (usize, usize)> {
    NEIGHBORS.iter().filter_map(move |&(dy, dx)| {
        let ny = y as i64 + dy;
        let nx = x as i64 + dx;
        (ny >= 0 && nx >= 0 && (ny as usize) < rows && (nx as usize) < cols)
            .then_some((ny as usize, nx as usize))
    })
}

/// Unknown pixels with at least one known 8-neighbor.
fn frontier(known: &Array2<bool>) -> Vec<(usize, usize)> {
    let (rows, cols) = known.dim();
    known
        .indexed_iter()
        .filter(|&((y, x), &k)| !k && neighbors(y, x, rows, cols).any(|n| known[n]))
        .map(|((y, x), _)| (y, x))
        .collect()
}

fn weighted_mean(
    values: &Array3<f32>,
    known: &Array2<bool>,
    y: usize,
    x: usize,
    r: i64,
) -> [f32; 3] {
    let (rows, cols) = known.dim();
    let y0 = (y as i64 - r).max(0) as usize;
    let y1 = ((y as i64 + r) as usize).min(rows - 1);
    let x0 = (x as i64 - r).max(0) as usize;
    let x1 = ((x as i64 + r) as usize).min(cols - 1);
    let r2 = (r * r) as f32;

    let mut acc = [0f32; 3];
    let mut total = 0f32;
    for ny in y0..=y1 {
        for nx in x0..=x1 {
            if !known[[ny, nx]] {
                continue;
            }
            let dy = ny as f32 - y as f32;
            let dx = nx as f32 - x as f32;
            let d2 = dy * dy + dx * dx;
            if d2 > r2 {
                continue;
            }
            let weight = 1.0 / (1.0 + d2);
            for (c, slot) in acc.iter_mut().enumerate() {
                *slot += weight * values[[ny, nx, c]];
            }
            total += weight;
        }
    }
    if total > 0.0 {
        acc.map(|v| v / total)
    } else {
        acc
    }
}

/// `alpha * a + beta * b`, saturated to 8 bits. Both images must share dimensions.
pub fn blend_weighted(a: &RgbImage, alpha: f32, b: &RgbImage, beta: f32) -> Result<RgbImage> {
    if a.dimensions() != b.dimensions() {
        return Err(Error::Processing(format!(
            "cannot blend {:?} with {:?}",
            a.dimensions(),
            b.dimensions()
        )));
    }
    let mut out = rgb_to_array(a);
    let other = rgb_to_array(b);
    Zip::from(&mut out)
        .and(&other)
        .for_each(|o, &v| *o = alpha * *o + beta * v);
    Ok(array_to_rgb(&out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn flat_surroundings_fill_a_hole_with_the_same_color() {
        let mut img = RgbImage::from_pixel(9, 9, Rgb([80, 120, 160]));
        let mut mask = vec![false; 81];
        for y in 3..6 {
            for x in 3..6 {
                img.put_pixel(x, y, Rgb([255, 0, 0]));
                mask[(y * 9 + x) as usize] = true;
            }
        }
        let out = inpaint(&img, &mask, 8);
        assert_eq!(*out.get_pixel(4, 4), Rgb([80, 120, 160]));
        assert_eq!(*out.get_pixel(3, 5), Rgb([80, 120, 160]));
    }

    #[test]
    fn unmasked_pixels_are_untouched() {
        let img = RgbImage::from_fn(6, 5, |x, y| Rgb([x as u8 * 40, y as u8 * 50, 3]));
        let mut mask = vec![false; 30];
        mask[0] = true;
        mask[29] = true;
        let out = inpaint(&img, &mask, 3);
        for (x, y, p) in img.enumerate_pixels() {
            let i = (y * 6 + x) as usize;
            if !mask[i] {
                assert_eq!(out.get_pixel(x, y), p);
            }
        }
    }

    #[test]
    fn band_fill_blends_between_sides() {
        // left half dark, right half bright, a vertical band masked in between
        let img = RgbImage::from_fn(12, 4, |x, _| if x < 6 { Rgb([0, 0, 0]) } else { Rgb([200, 200, 200]) });
        let mask: Vec<bool> = (0..48).map(|i| matches!(i % 12, 5 | 6)).collect();
        let out = inpaint(&img, &mask, 4);
        let left = out.get_pixel(5, 1)[0];
        let right = out.get_pixel(6, 1)[0];
        assert!(left > 0 && left < 200);
        assert!(right > left);
    }

    #[test]
    fn wide_masked_area_is_filled_to_the_far_edge() {
        // only the first column is known, so filling takes one pass per column
        let (w, h) = (120u32, 7u32);
        let img = RgbImage::from_fn(w, h, |x, _| {
            if x == 0 { Rgb([30, 60, 90]) } else { Rgb([255, 0, 0]) }
        });
        let mask: Vec<bool> = (0..w * h).map(|i| i % w != 0).collect();
        let out = inpaint(&img, &mask, 8);
        assert!(out.pixels().all(|p| *p == Rgb([30, 60, 90])));
    }

    #[test]
    fn frontier_only_holds_unknown_pixels_next_to_known_ones() {
        let known = Array2::from_shape_fn((3, 4), |(_, x)| x == 0);
        let front = frontier(&known);
        assert_eq!(front, vec![(0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn fully_masked_image_is_returned_as_is() {
        let img = RgbImage::from_pixel(3, 3, Rgb([1, 2, 3]));
        assert_eq!(inpaint(&img, &[true; 9], 8), img);
    }

    #[test]
    fn zero_one_blend_returns_second_image() {
        let a = RgbImage::from_pixel(4, 4, Rgb([10, 20, 30]));
        let b = RgbImage::from_pixel(4, 4, Rgb([200, 100, 50]));
        assert_eq!(blend_weighted(&a, 0.0, &b, 1.0).unwrap(), b);
        assert!(blend_weighted(&a, 0.5, &RgbImage::new(2, 2), 0.5).is_err());
    }
}

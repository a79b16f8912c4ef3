//! Non-local means denoising.
//!
//! For every pixel the filter averages candidates inside a square search
//! window, weighting each by how similar the template patch around it is to
//! the patch around the pixel being restored. Patch distances are computed
//! once per search offset through an integral image of squared differences,
//! so the cost does not depend on the template size. Borders are handled by
//! reflect-101 padding.
//!
//! The colored variant works in CIELAB: lightness is filtered with `h` and the
//! two chroma channels jointly with `h_color`.
use image::RgbImage;
use ndarray::{Array2, Array3, ArrayView3, Axis, Zip, s};
use tracing::debug;

use crate::core::params::DenoiseParams;
use crate::core::processing::border::reflect_101_index;
use crate::core::processing::color::{lab_to_rgb, rgb_to_lab};
use crate::error::Result;

/// Denoise an RGB8 image with the colored non-local means filter.
pub fn denoise_colored(image: &RgbImage, params: &DenoiseParams) -> Result<RgbImage> {
    params.validate()?;
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return Ok(image.clone());
    }
    debug!(
        "Denoising {}x{} with h={}, h_color={}, template={}, search={}",
        w, h, params.h, params.h_color, params.template_window, params.search_window
    );

    let mut lab = rgb_to_lab(image);
    let lightness = lab.slice(s![.., .., 0..1]).to_owned();
    let chroma = lab.slice(s![.., .., 1..3]).to_owned();

    let lightness = nl_means(
        &lightness,
        params.h,
        params.template_window,
        params.search_window,
    );
    let chroma = nl_means(
        &chroma,
        params.h_color,
        params.template_window,
        params.search_window,
    );

    lab.slice_mut(s![.., .., 0..1]).assign(&lightness);
    lab.slice_mut(s![.., .., 1..3]).assign(&chroma);
    Ok(lab_to_rgb(&lab))
}

/// Non-local means over a `(rows, cols, channels)` array.
///
/// `template_window` and `search_window` are odd side lengths. The weight of a
/// candidate is `exp(-d / h^2)`, where `d` is the mean squared difference
/// between the two template patches over all channels.
pub fn nl_means(
    src: &Array3<f32>,
    h: f32,
    template_window: usize,
    search_window: usize,
) -> Array3<f32> {
    let (rows, cols, channels) = src.dim();
    if rows == 0 || cols == 0 || channels == 0 || h <= 0.0 {
        return src.clone();
    }

    let tr = template_window / 2;
    let sr = search_window / 2;
    let t = 2 * tr + 1;
    let border = tr + sr;
    let padded = pad_reflect_101(src.view(), border);

    let inv_h2 = 1.0 / (h * h);
    let norm = 1.0 / (t * t * channels) as f64;

    // Region covering every template of every output pixel, at offset (sr, sr)
    let (drows, dcols) = (rows + 2 * tr, cols + 2 * tr);
    let base = padded.slice(s![sr..sr + drows, sr..sr + dcols, ..]);

    let mut weight_sum = Array2::<f32>::zeros((rows, cols));
    let mut value_sum = Array3::<f32>::zeros((rows, cols, channels));
    let mut diff = Array2::<f32>::zeros((drows, dcols));
    let mut integral = Array2::<f64>::zeros((drows + 1, dcols + 1));

    for oy in 0..=2 * sr {
        for ox in 0..=2 * sr {
            let shifted = padded.slice(s![oy..oy + drows, ox..ox + dcols, ..]);
            Zip::from(&mut diff)
                .and(base.lanes(Axis(2)))
                .and(shifted.lanes(Axis(2)))
                .par_for_each(|d, a, b| {
                    *d = a
                        .iter()
                        .zip(b.iter())
                        .map(|(p, q)| (p - q) * (p - q))
                        .sum();
                });
            integral_image_into(&diff, &mut integral);

            // Candidate pixel values for this offset
            let candidates =
                padded.slice(s![oy + tr..oy + tr + rows, ox + tr..ox + tr + cols, ..]);

            Zip::indexed(&mut weight_sum)
                .and(value_sum.lanes_mut(Axis(2)))
                .and(candidates.lanes(Axis(2)))
                .par_for_each(|(y, x), ws, mut vs, cv| {
                    let ssd = integral[[y + t, x + t]] - integral[[y, x + t]]
                        - integral[[y + t, x]]
                        + integral[[y, x]];
                    let dist = (ssd * norm).max(0.0) as f32;
                    let weight = (-dist * inv_h2).exp();
                    *ws += weight;
                    vs.scaled_add(weight, &cv);
                });
        }
    }

    Zip::from(value_sum.lanes_mut(Axis(2)))
        .and(&weight_sum)
        .for_each(|mut v, &w| {
            if w > 0.0 {
                v.mapv_inplace(|p| p / w);
            }
        });
    value_sum
}

/// Fill `out`, shaped `(rows + 1, cols + 1)`, with the summed-area table of
/// `src`. The leading row and column are never written and must stay zero.
fn integral_image_into(src: &Array2<f32>, out: &mut Array2<f64>) {
    let (rows, cols) = src.dim();
    debug_assert_eq!(out.dim(), (rows + 1, cols + 1));
    for y in 0..rows {
        let mut row_sum = 0f64;
        for x in 0..cols {
            row_sum += src[[y, x]] as f64;
            out[[y + 1, x + 1]] = out[[y, x + 1]] + row_sum;
        }
    }
}

fn pad_reflect_101(src: ArrayView3<f32>, border: usize) -> Array3<f32> {
    let (rows, cols, channels) = src.dim();
    let b = border as i64;
    Array3::from_shape_fn(
        (rows + 2 * border, cols + 2 * border, channels),
        |(y, x, c)| {
            let sy = reflect_101_index(y as i64 - b, rows as u32) as usize;
            let sx = reflect_101_index(x as i64 - b, cols as u32) as usize;
            src[[sy, sx, c]]
        },
    )
}

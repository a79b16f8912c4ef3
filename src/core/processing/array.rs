use image::RgbImage;
use ndarray::Array3;

/// Copy an RGB8 image into a `(rows, cols, 3)` float array.
pub fn rgb_to_array(image: &RgbImage) -> Array3<f32> {
    let (w, h) = image.dimensions();
    Array3::from_shape_fn((h as usize, w as usize, 3), |(y, x, c)| {
        image.get_pixel(x as u32, y as u32)[c] as f32
    })
}

/// Round and saturate a `(rows, cols, 3)` float array back into an RGB8 image.
pub fn array_to_rgb(array: &Array3<f32>) -> RgbImage {
    let (h, w, _) = array.dim();
    RgbImage::from_fn(w as u32, h as u32, |x, y| {
        let px = |c: usize| array[[y as usize, x as usize, c]].round().clamp(0.0, 255.0) as u8;
        image::Rgb([px(0), px(1), px(2)])
    })
}

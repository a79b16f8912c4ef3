use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, ImageReader, RgbImage};
use tracing::debug;

use crate::error::Result;
use crate::types::has_image_extension;

/// Regular files directly inside `dir` with a recognized image extension,
/// sorted by path.
pub fn list_input_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_image_extension(&path) {
            files.push(path);
        }
    }
    files.sort();
    debug!("Found {} image file(s) in {:?}", files.len(), dir);
    Ok(files)
}

/// Decode `path` into RGB8, sniffing the format from the file content.
///
/// Returns the detected container format alongside the pixels so the output
/// can fall back to it when the file extension is not encodable.
pub fn load_rgb_image(path: &Path) -> Result<(RgbImage, Option<ImageFormat>)> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let format = reader.format();
    let image = reader.decode()?;
    Ok((image.into_rgb8(), format))
}

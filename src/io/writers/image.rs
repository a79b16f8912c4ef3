use std::path::Path;

use image::{ImageFormat, RgbImage};
use tracing::debug;

use crate::error::{Error, Result};

/// Encode `image` to `output`, choosing the format from the output extension
/// and falling back to `fallback` (usually the decoded input format).
pub fn write_rgb_image(output: &Path, image: &RgbImage, fallback: Option<ImageFormat>) -> Result<()> {
    let format = ImageFormat::from_path(output)
        .ok()
        .filter(|f| f.can_write())
        .or(fallback)
        .ok_or_else(|| {
            Error::Processing(format!("no encoder available for {:?}", output))
        })?;
    debug!("Writing {:?} as {:?}", output, format);
    image.save_with_format(output, format)?;
    Ok(())
}

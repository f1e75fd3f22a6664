//! Upload validation and decoding

use std::io::Cursor;

use image::RgbImage;

use crate::types::{Result, StencilError};

/// Whether a declared MIME type (parameters allowed) names an image
pub fn is_image_content_type(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or("").trim();
    essence
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
        && essence.len() > 6
}

/// Reject uploads that are empty or not declared as images, without decoding
pub(crate) fn check_upload(bytes: &[u8], content_type: &str) -> Result<()> {
    if !is_image_content_type(content_type) {
        return Err(StencilError::InvalidInput(format!(
            "Expected an image upload, got content type '{}'",
            content_type
        )));
    }
    if bytes.is_empty() {
        return Err(StencilError::InvalidInput("Uploaded file is empty".to_string()));
    }
    Ok(())
}

/// Decode an uploaded image into 8-bit RGB at its original size.
///
/// Alpha is dropped and grayscale or palette images are expanded, so every
/// later stage works on exactly three channels.
pub fn normalize_image(bytes: &[u8], content_type: &str) -> Result<RgbImage> {
    check_upload(bytes, content_type)?;

    let decoded = image::load_from_memory(bytes)
        .map_err(|e| StencilError::InvalidInput(format!("Could not decode image: {}", e)))?;

    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(StencilError::InvalidInput("Image has no pixels".to_string()));
    }

    log::debug!(
        "Decoded {}x{} {:?} upload",
        decoded.width(),
        decoded.height(),
        decoded.color()
    );

    Ok(decoded.to_rgb8())
}

/// Read the pixel size of an upload from its header only
pub fn image_dimensions(bytes: &[u8], content_type: &str) -> Result<(u32, u32)> {
    check_upload(bytes, content_type)?;

    let (width, height) = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_dimensions()
        .map_err(|e| StencilError::InvalidInput(format!("Could not read image header: {}", e)))?;

    if width == 0 || height == 0 {
        return Err(StencilError::InvalidInput("Image has no pixels".to_string()));
    }
    Ok((width, height))
}

/// Height in cm that keeps the image's aspect ratio at `width_cm`
pub fn height_for_aspect(width_cm: f64, (width_px, height_px): (u32, u32)) -> f64 {
    width_cm * height_px as f64 / width_px as f64
}

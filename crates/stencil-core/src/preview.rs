//! Preview rendering
//!
//! Red page-boundary overlay and JPEG encoding for the single-image preview.

use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};

use crate::constants::GRID_COLOR;
use crate::layout::{LayoutPlan, PixelRect};
use crate::mural::fill_rect;
use crate::types::Result;

/// Draw red lines on every page boundary inside the mural.
///
/// Lines are centered on the boundary; the outer edge of the mural gets no line.
pub fn draw_grid_lines(mural: &mut RgbImage, plan: &LayoutPlan, line_width: u32) {
    if line_width == 0 {
        return;
    }
    let color = Rgb(GRID_COLOR);
    let (canvas_w, canvas_h) = (mural.width(), mural.height());
    let half = line_width / 2;

    for x in plan.vertical_boundaries() {
        let left = x.saturating_sub(half);
        fill_rect(mural, PixelRect::new(left, 0, line_width, canvas_h), color);
    }
    for y in plan.horizontal_boundaries() {
        let top = y.saturating_sub(half);
        fill_rect(mural, PixelRect::new(0, top, canvas_w, line_width), color);
    }
}

/// Encode an RGB image as baseline JPEG
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
        encoder.encode_image(image)?;
    }
    Ok(bytes)
}

//! Page tile emission
//!
//! Walks the page grid in reading order, cuts each tile from the mural and
//! pads it to a full page before handing it to a [`TileSink`].

use image::{Rgb, RgbImage, imageops};

use crate::constants::BACKGROUND;
use crate::layout::{GridPosition, LayoutPlan};
use crate::types::Result;

/// Destination for page-sized tiles
pub trait TileSink {
    /// Receive the page at `pos`; pages arrive row by row, left to right
    fn emit(&mut self, pos: GridPosition, page: &RgbImage) -> Result<()>;
}

/// Crop the tile at `pos` and paste it onto a blank page of exactly `plan.page_px`.
///
/// Partial tiles at the right and bottom edges keep their content in the
/// top-left corner; the rest of the page is background.
pub fn extract_tile(mural: &RgbImage, plan: &LayoutPlan, pos: GridPosition) -> RgbImage {
    let (page_w, page_h) = plan.page_px;
    let mut page = RgbImage::from_pixel(page_w, page_h, Rgb(BACKGROUND));

    let bounds = plan.tile_bounds(pos);
    if !bounds.is_empty() {
        let crop = imageops::crop_imm(mural, bounds.x, bounds.y, bounds.width, bounds.height);
        imageops::replace(&mut page, &crop.to_image(), 0, 0);
    }

    page
}

/// Emit every page of the grid into `sink`, returning the page count
pub fn emit_tiles<S: TileSink>(mural: &RgbImage, plan: &LayoutPlan, sink: &mut S) -> Result<usize> {
    let mut emitted = 0;
    for pos in plan.tiles() {
        let page = extract_tile(mural, plan, pos);
        sink.emit(pos, &page)?;
        emitted += 1;
    }

    log::debug!("Emitted {} pages ({} × {})", emitted, plan.cols, plan.rows);
    Ok(emitted)
}

/// Sink that keeps every page in memory
#[derive(Debug, Default)]
pub struct TileCollector {
    pub pages: Vec<(GridPosition, RgbImage)>,
}

impl TileCollector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TileSink for TileCollector {
    fn emit(&mut self, pos: GridPosition, page: &RgbImage) -> Result<()> {
        self.pages.push((pos, page.clone()));
        Ok(())
    }
}

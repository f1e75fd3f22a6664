//! Image-to-stencil pipeline.
//!
//! Scales a raster image to a physical size, optionally frames it with
//! margins and registration lines, then slices the result into printable
//! page tiles (a multi-page PDF) or renders a single gridded preview.

pub mod constants;
mod filter;
mod input;
pub mod layout;
mod mural;
mod options;
mod pipeline;
mod preview;
pub mod render;
mod stats;
mod tiles;
mod types;

pub use filter::apply_filter;
pub use input::{height_for_aspect, image_dimensions, is_image_content_type, normalize_image};
pub use layout::{GridPosition, LayoutPlan, PixelRect, plan_layout};
pub use mural::compose_mural;
pub use options::*;
pub use pipeline::{
    RenderedPdf, generate_pdf, generate_preview, render_pdf, render_preview, stencil_filename,
};
pub use preview::{draw_grid_lines, encode_jpeg};
pub use render::PdfSink;
pub use stats::summarize;
pub use tiles::{TileCollector, TileSink, emit_tiles, extract_tile};
pub use types::*;

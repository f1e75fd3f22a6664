//! Stencil rendering pipeline
//!
//! This module orchestrates a render:
//! 1. Check the upload and plan the layout (cheap, fails fast)
//! 2. Decode and filter the source image
//! 3. Compose the mural
//! 4. Emit page tiles to a PDF, or grid the mural for a preview

use chrono::NaiveDateTime;
use image::RgbImage;

use crate::filter::apply_filter;
use crate::input::{check_upload, normalize_image};
use crate::layout::{LayoutPlan, plan_layout};
use crate::mural::compose_mural;
use crate::options::{RenderLimits, RenderProfile, StencilOptions};
use crate::preview::{draw_grid_lines, encode_jpeg};
use crate::render::PdfSink;
use crate::stats::summarize;
use crate::tiles::emit_tiles;
use crate::types::*;

/// A finished multi-page stencil
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    /// Serialized PDF document
    pub bytes: Vec<u8>,
    /// Suggested download name
    pub filename: String,
    pub stats: StencilStatistics,
}

/// Download name for a stencil generated at `timestamp`
pub fn stencil_filename(timestamp: NaiveDateTime) -> String {
    format!("stencil_{}.pdf", timestamp.format("%Y%m%d_%H%M%S"))
}

/// Render the printable PDF (300 DPI, one page per tile)
pub fn render_pdf(
    bytes: &[u8],
    content_type: &str,
    options: &StencilOptions,
    limits: &RenderLimits,
) -> Result<RenderedPdf> {
    let profile = RenderProfile::FINAL;
    let (plan, mural) = build_mural(bytes, content_type, options, &profile, limits)?;

    let mut sink = PdfSink::new(&plan, profile.jpeg_quality);
    emit_tiles(&mural, &plan, &mut sink)?;
    drop(mural);
    let pdf = sink.finish()?;

    log::info!(
        "Rendered {} page stencil ({} bytes) for {} × {} cm, filter {}",
        plan.page_count(),
        pdf.len(),
        plan.target_cm.0,
        plan.target_cm.1,
        options.filter.name()
    );

    Ok(RenderedPdf {
        bytes: pdf,
        filename: stencil_filename(chrono::Local::now().naive_local()),
        stats: summarize(&plan),
    })
}

/// Render the gridded preview JPEG (150 DPI, single image)
pub fn render_preview(
    bytes: &[u8],
    content_type: &str,
    options: &StencilOptions,
    limits: &RenderLimits,
) -> Result<Vec<u8>> {
    let profile = RenderProfile::PREVIEW;
    let (plan, mut mural) = build_mural(bytes, content_type, options, &profile, limits)?;

    if let Some(width) = profile.grid_line_width_px {
        draw_grid_lines(&mut mural, &plan, width);
    }
    let jpeg = encode_jpeg(&mural, profile.jpeg_quality)?;

    log::info!(
        "Rendered {}x{} px preview ({} pages, filter {})",
        plan.canvas_px.0,
        plan.canvas_px.1,
        plan.page_count(),
        options.filter.name()
    );

    Ok(jpeg)
}

/// Stages shared by both outputs, parameterized only by `profile`
fn build_mural(
    bytes: &[u8],
    content_type: &str,
    options: &StencilOptions,
    profile: &RenderProfile,
    limits: &RenderLimits,
) -> Result<(LayoutPlan, RgbImage)> {
    check_upload(bytes, content_type)?;
    let plan = plan_layout(options, profile.dpi, limits)?;

    let source = normalize_image(bytes, content_type)?;
    let filtered = apply_filter(source, options.filter);
    let mural = compose_mural(&filtered, &plan, profile);

    Ok((plan, mural))
}

/// Render the PDF on the blocking thread pool
pub async fn generate_pdf(
    bytes: Vec<u8>,
    content_type: String,
    options: StencilOptions,
    limits: RenderLimits,
) -> Result<RenderedPdf> {
    tokio::task::spawn_blocking(move || render_pdf(&bytes, &content_type, &options, &limits))
        .await?
}

/// Render the preview on the blocking thread pool
pub async fn generate_preview(
    bytes: Vec<u8>,
    content_type: String,
    options: StencilOptions,
    limits: RenderLimits,
) -> Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || render_preview(&bytes, &content_type, &options, &limits))
        .await?
}

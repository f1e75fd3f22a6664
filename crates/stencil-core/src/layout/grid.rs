//! Layout planning
//!
//! Maps a physical target size to mural, content and page pixel sizes
//! and sizes the page grid so it fully covers the requested area.

use crate::constants::{MIN_INNER_CM, cm_to_px, tiles_to_cover};
use crate::options::{RenderLimits, StencilOptions};
use crate::types::{MarginSpec, Result, StencilError};

use super::{LayoutPlan, MarginLayout};

// =============================================================================
// Plan Creation
// =============================================================================

/// Compute the layout of a stencil at the given DPI.
///
/// # Arguments
/// * `options` - Target size, orientation and margins
/// * `dpi` - Render density (pixels per inch)
/// * `limits` - Ceilings on the mural pixel area and the page count
///
/// # Errors
/// `InvalidDimension` for non-positive targets, negative margins or a target
/// too small to produce a single pixel; `PayloadTooLarge` when the mural would
/// exceed `limits.max_canvas_pixels`; `TooManyPages` when the grid would
/// exceed `limits.max_pages`.
pub fn plan_layout(
    options: &StencilOptions,
    dpi: u32,
    limits: &RenderLimits,
) -> Result<LayoutPlan> {
    options.validate()?;
    if dpi == 0 {
        return Err(StencilError::Config("DPI must be greater than 0".to_string()));
    }

    let target_cm = (options.target_width_cm, options.target_height_cm);
    let page_cm = options.orientation.page_size_cm();

    let full_px = (cm_to_px(target_cm.0, dpi), cm_to_px(target_cm.1, dpi));
    if full_px.0 == 0 || full_px.1 == 0 {
        return Err(StencilError::InvalidDimension(format!(
            "{} × {} cm is smaller than one pixel at {} DPI",
            target_cm.0, target_cm.1, dpi
        )));
    }

    let cols = tiles_to_cover(target_cm.0, page_cm.0);
    let rows = tiles_to_cover(target_cm.1, page_cm.1);
    let pages = (cols as u64).saturating_mul(rows as u64);
    if pages > limits.max_pages {
        return Err(StencilError::TooManyPages {
            pages,
            limit: limits.max_pages,
        });
    }

    // Pages are truncated one by one, so the grid can end a few pixels
    // short of the whole-target mural; the mural never outgrows the grid
    let page_px = (cm_to_px(page_cm.0, dpi), cm_to_px(page_cm.1, dpi));
    let canvas_px = (
        fit_to_grid(full_px.0, cols, page_px.0),
        fit_to_grid(full_px.1, rows, page_px.1),
    );

    let pixels = canvas_px.0 as u64 * canvas_px.1 as u64;
    if pixels > limits.max_canvas_pixels {
        return Err(StencilError::PayloadTooLarge {
            pixels,
            limit: limits.max_canvas_pixels,
        });
    }

    let margins = options
        .margins
        .map(|margin| plan_margins(&margin, target_cm, canvas_px, dpi));

    let plan = LayoutPlan {
        dpi,
        target_cm,
        page_cm,
        page_px,
        canvas_px,
        margins,
        cols,
        rows,
    };

    log::debug!(
        "Planned {}x{} px mural at {} DPI: {} cols × {} rows of {}x{} px pages",
        plan.canvas_px.0,
        plan.canvas_px.1,
        dpi,
        plan.cols,
        plan.rows,
        plan.page_px.0,
        plan.page_px.1
    );

    Ok(plan)
}

/// Mural length along one axis, capped at the span of `count` pages
fn fit_to_grid(length_px: u32, count: usize, page_px: u32) -> u32 {
    let span = (count as u64).saturating_mul(page_px as u64);
    (length_px as u64).min(span) as u32
}

// =============================================================================
// Margin Placement
// =============================================================================

/// Placement of the content along one axis
struct AxisFit {
    inner_px: u32,
    offset_px: u32,
    clamped: bool,
}

fn plan_margins(
    margin: &MarginSpec,
    target_cm: (f64, f64),
    canvas_px: (u32, u32),
    dpi: u32,
) -> MarginLayout {
    let x = fit_axis(target_cm.0, margin.x_cm, canvas_px.0, dpi);
    let y = fit_axis(target_cm.1, margin.y_cm, canvas_px.1, dpi);

    let inner_clamped = x.clamped || y.clamped;
    if inner_clamped {
        log::warn!(
            "Margins {} × {} cm leave no room in a {} × {} cm target; content shrunk to {} cm and centered",
            margin.x_cm,
            margin.y_cm,
            target_cm.0,
            target_cm.1,
            MIN_INNER_CM
        );
    }

    MarginLayout {
        inner_px: (x.inner_px, y.inner_px),
        offset_px: (x.offset_px, y.offset_px),
        inner_clamped,
    }
}

fn fit_axis(target_cm: f64, margin_cm: f64, canvas_px: u32, dpi: u32) -> AxisFit {
    let inner_cm = target_cm - 2.0 * margin_cm;
    let clamped = inner_cm < MIN_INNER_CM;
    let inner_px = cm_to_px(inner_cm.max(MIN_INNER_CM), dpi).clamp(1, canvas_px);

    if clamped {
        // Margins no longer fit: center the minimum-size content instead
        return AxisFit {
            inner_px,
            offset_px: (canvas_px - inner_px) / 2,
            clamped,
        };
    }

    // The canvas may be capped to the page grid, so both parts are re-fitted
    let offset_px = cm_to_px(margin_cm, dpi).min((canvas_px - 1) / 2);
    let inner_px = inner_px.min(canvas_px - 2 * offset_px);

    AxisFit {
        inner_px,
        offset_px,
        clamped,
    }
}

// =============================================================================
// Tests
// =============================================================================

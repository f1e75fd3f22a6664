//! Shared constants and unit conversion
//!
//! Every centimeter to pixel or point conversion in the crate goes through
//! [`cm_to_units`], so the final and preview renders cannot drift apart.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Centimeters per inch
pub const CM_PER_INCH: f64 = 2.54;

/// PDF points per inch
pub const POINTS_PER_INCH: f64 = 72.0;

/// Convert centimeters to a per-inch unit (pixels at `per_inch` DPI, or points at 72)
#[inline]
pub fn cm_to_units(cm: f64, per_inch: f64) -> f64 {
    cm * (1.0 / CM_PER_INCH) * per_inch
}

/// Convert centimeters to whole pixels at the given DPI (truncating)
#[inline]
pub fn cm_to_px(cm: f64, dpi: u32) -> u32 {
    let px = cm_to_units(cm, dpi as f64);
    if px <= 0.0 { 0 } else { px as u32 }
}

/// Convert centimeters to PDF points
#[inline]
pub fn cm_to_pt(cm: f64) -> f64 {
    cm_to_units(cm, POINTS_PER_INCH)
}

/// Tolerance for grid counts, so exact multiples do not gain a page from float noise
const CEIL_EPSILON: f64 = 1e-9;

/// Number of `step` sized pieces needed to fully cover `length`
#[inline]
pub fn tiles_to_cover(length: f64, step: f64) -> usize {
    let count = (length / step - CEIL_EPSILON).ceil();
    if count < 1.0 { 1 } else { count as usize }
}

// =============================================================================
// Page Dimensions
// =============================================================================

/// Short edge of an A4 sheet in centimeters
pub const A4_SHORT_CM: f64 = 21.0;

/// Long edge of an A4 sheet in centimeters
pub const A4_LONG_CM: f64 = 29.7;

// =============================================================================
// Layout Limits
// =============================================================================

/// Smallest inner content size once margins are subtracted (cm)
pub const MIN_INNER_CM: f64 = 0.1;

/// Default ceiling on mural pixel area (≈ 600 MB of RGB)
pub const DEFAULT_MAX_CANVAS_PIXELS: u64 = 200_000_000;

/// Default ceiling on emitted pages (a 10 × 20 sheet wall)
pub const DEFAULT_MAX_PAGES: u64 = 200;

// =============================================================================
// Render Profiles
// =============================================================================

/// Resolution of the printable PDF
pub const FINAL_DPI: u32 = 300;

/// Resolution of the on-screen preview
pub const PREVIEW_DPI: u32 = 150;

/// Stroke width of margin borders in the PDF (pixels)
pub const FINAL_BORDER_WIDTH_PX: u32 = 2;

/// Stroke width of margin borders in the preview (pixels)
pub const PREVIEW_BORDER_WIDTH_PX: u32 = 3;

/// Width of the page grid lines drawn on the preview (pixels)
pub const PREVIEW_GRID_LINE_WIDTH_PX: u32 = 3;

/// JPEG quality of each PDF page
pub const FINAL_JPEG_QUALITY: u8 = 95;

/// JPEG quality of the preview image
pub const PREVIEW_JPEG_QUALITY: u8 = 85;

// =============================================================================
// Colors
// =============================================================================

/// Canvas and page background
pub const BACKGROUND: [u8; 3] = [255, 255, 255];

/// Margin border strokes
pub const BORDER_COLOR: [u8; 3] = [0, 0, 0];

/// Preview grid lines
pub const GRID_COLOR: [u8; 3] = [255, 0, 0];

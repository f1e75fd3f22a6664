use crate::constants::*;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters of one stencil request
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StencilOptions {
    // Physical output size
    pub target_width_cm: f64,
    pub target_height_cm: f64,

    // Image treatment
    pub filter: FilterKind,

    // Page grid
    pub orientation: Orientation,

    // Framing (None = image fills the whole mural)
    pub margins: Option<MarginSpec>,
}

impl Default for StencilOptions {
    fn default() -> Self {
        Self {
            target_width_cm: A4_SHORT_CM,
            target_height_cm: A4_LONG_CM,
            filter: FilterKind::None,
            orientation: Orientation::Portrait,
            margins: None,
        }
    }
}

impl StencilOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| StencilError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| StencilError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        check_positive("target width", self.target_width_cm)?;
        check_positive("target height", self.target_height_cm)?;

        if let Some(margins) = &self.margins {
            check_non_negative("horizontal margin", margins.x_cm)?;
            check_non_negative("vertical margin", margins.y_cm)?;
        }

        Ok(())
    }
}

fn check_positive(what: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(StencilError::InvalidDimension(format!(
            "{} must be greater than 0 cm, got {}",
            what, value
        )));
    }
    Ok(())
}

fn check_non_negative(what: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(StencilError::InvalidDimension(format!(
            "{} must be 0 cm or more, got {}",
            what, value
        )));
    }
    Ok(())
}

/// Output-specific rendering settings.
///
/// The PDF and the preview run the same pipeline; only these values differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderProfile {
    /// Pixels per inch of the mural and of each page
    pub dpi: u32,
    /// Stroke width of the canvas and content borders
    pub border_width_px: u32,
    /// Width of the red page grid, when drawn
    pub grid_line_width_px: Option<u32>,
    /// JPEG quality of the encoded output
    pub jpeg_quality: u8,
}

impl RenderProfile {
    /// Printable PDF pages
    pub const FINAL: RenderProfile = RenderProfile {
        dpi: FINAL_DPI,
        border_width_px: FINAL_BORDER_WIDTH_PX,
        grid_line_width_px: None,
        jpeg_quality: FINAL_JPEG_QUALITY,
    };

    /// Single gridded preview image
    pub const PREVIEW: RenderProfile = RenderProfile {
        dpi: PREVIEW_DPI,
        border_width_px: PREVIEW_BORDER_WIDTH_PX,
        grid_line_width_px: Some(PREVIEW_GRID_LINE_WIDTH_PX),
        jpeg_quality: PREVIEW_JPEG_QUALITY,
    };
}

/// Resource ceilings applied before any large allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderLimits {
    /// Maximum mural width × height in pixels
    pub max_canvas_pixels: u64,
    /// Maximum number of pages in the grid
    pub max_pages: u64,
}

impl Default for RenderLimits {
    fn default() -> Self {
        Self {
            max_canvas_pixels: DEFAULT_MAX_CANVAS_PIXELS,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

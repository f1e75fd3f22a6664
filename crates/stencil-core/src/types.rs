use thiserror::Error;

use crate::constants::{A4_LONG_CM, A4_SHORT_CM};

#[derive(Error, Debug)]
pub enum StencilError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),
    #[error("Requested canvas of {pixels} pixels exceeds the limit of {limit} pixels")]
    PayloadTooLarge { pixels: u64, limit: u64 },
    #[error("Requested grid of {pages} pages exceeds the limit of {limit} pages")]
    TooManyPages { pages: u64, limit: u64 },
    #[error("Unsupported filter: {0}")]
    UnsupportedFilter(String),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl StencilError {
    /// Stable machine-readable tag for the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            StencilError::InvalidInput(_) => "invalid_input",
            StencilError::InvalidDimension(_) => "invalid_dimension",
            StencilError::PayloadTooLarge { .. } | StencilError::TooManyPages { .. } => {
                "payload_too_large"
            }
            StencilError::UnsupportedFilter(_) => "unsupported_filter",
            StencilError::Config(_) => "config",
            StencilError::Image(_)
            | StencilError::Pdf(_)
            | StencilError::Io(_)
            | StencilError::TaskJoin(_) => "internal",
        }
    }

    /// Whether the caller is at fault (bad upload or parameters)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            StencilError::InvalidInput(_)
                | StencilError::InvalidDimension(_)
                | StencilError::PayloadTooLarge { .. }
                | StencilError::TooManyPages { .. }
                | StencilError::UnsupportedFilter(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, StencilError>;

/// Paper orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Orientation {
    /// Portrait: 21 × 29.7 cm pages
    #[default]
    Portrait,
    /// Landscape: 29.7 × 21 cm pages
    Landscape,
}

impl Orientation {
    /// Parse a form value (`portrait` / `landscape`, case-insensitive)
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "portrait" => Ok(Orientation::Portrait),
            "landscape" => Ok(Orientation::Landscape),
            other => Err(StencilError::InvalidInput(format!(
                "Unknown orientation '{}', expected portrait or landscape",
                other
            ))),
        }
    }

    /// Physical page size (width, height) in centimeters
    pub fn page_size_cm(self) -> (f64, f64) {
        match self {
            Orientation::Portrait => (A4_SHORT_CM, A4_LONG_CM),
            Orientation::Landscape => (A4_LONG_CM, A4_SHORT_CM),
        }
    }
}

/// Visual transform applied before layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FilterKind {
    /// Pass-through
    #[default]
    None,
    /// Luminance only, re-expanded to RGB
    Grayscale,
    /// Inverted edge map (dark lines on white)
    Outline,
}

impl FilterKind {
    /// Parse a form value.
    ///
    /// `color` is what the web frontend sends for "no filter" and `bw` is its
    /// grayscale option. Unrecognized values fall back to [`FilterKind::None`]
    /// unless `strict` is set.
    pub fn parse(value: &str, strict: bool) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "color" | "colour" => Ok(FilterKind::None),
            "bw" | "grayscale" | "greyscale" => Ok(FilterKind::Grayscale),
            "outline" => Ok(FilterKind::Outline),
            other if strict => Err(StencilError::UnsupportedFilter(other.to_string())),
            other => {
                log::warn!("Unknown filter '{}', falling back to none", other);
                Ok(FilterKind::None)
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FilterKind::None => "none",
            FilterKind::Grayscale => "grayscale",
            FilterKind::Outline => "outline",
        }
    }
}

/// Symmetric margins around the placed image, in centimeters
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarginSpec {
    /// Left and right margin
    pub x_cm: f64,
    /// Top and bottom margin
    pub y_cm: f64,
}

impl MarginSpec {
    pub fn new(x_cm: f64, y_cm: f64) -> Self {
        Self { x_cm, y_cm }
    }

    /// Same margin on every side
    pub fn uniform(margin_cm: f64) -> Self {
        Self::new(margin_cm, margin_cm)
    }
}

/// Summary of a stencil layout
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StencilStatistics {
    /// Number of printed pages (rows × cols)
    pub pages: usize,
    pub rows: usize,
    pub cols: usize,
    /// Requested physical size (width, height) in cm
    pub target_cm: (f64, f64),
    /// Physical page size (width, height) in cm
    pub page_cm: (f64, f64),
    /// Area covered by the full page grid in cm
    pub coverage_cm: (f64, f64),
    /// Blank paper beyond the mural edge on the last column / row, in cm
    pub overhang_cm: (f64, f64),
    /// Mural size in pixels
    pub canvas_px: (u32, u32),
    /// Page size in pixels
    pub page_px: (u32, u32),
    /// Rendering density
    pub dpi: u32,
}

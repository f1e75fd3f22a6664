//! Layout calculation for stencils
//!
//! This module handles all the geometric calculations:
//! - Physical size to pixel conversion at the render DPI
//! - Margin placement of the image inside the mural
//! - Page grid dimensions and per-tile crop bounds

mod grid;
mod types;

pub use grid::*;
pub use types::*;

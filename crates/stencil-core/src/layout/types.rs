//! Layout data types
//!
//! These types carry the pixel geometry computed by the planner to the
//! compositor and the tile emitter.

/// Position within the page grid (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPosition {
    /// Row index (0 = top row)
    pub row: usize,
    /// Column index (0 = leftmost column)
    pub col: usize,
}

impl GridPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A rectangular pixel area, origin at the top-left of the mural
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    /// X position (left edge)
    pub x: u32,
    /// Y position (top edge)
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive)
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive)
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Pixel count, widened so large murals cannot overflow
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Where the image sits inside a framed mural
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarginLayout {
    /// Inner content size in pixels (width, height)
    pub inner_px: (u32, u32),
    /// Top-left corner of the inner content in pixels (x, y)
    pub offset_px: (u32, u32),
    /// True when the margins left less than the minimum inner size
    /// and the content was shrunk to that floor
    pub inner_clamped: bool,
}

impl MarginLayout {
    pub fn content_rect(&self) -> PixelRect {
        PixelRect::new(
            self.offset_px.0,
            self.offset_px.1,
            self.inner_px.0,
            self.inner_px.1,
        )
    }
}

/// Complete pixel geometry of one stencil render
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPlan {
    /// Density the plan was computed at
    pub dpi: u32,
    /// Requested physical size (width, height) in cm
    pub target_cm: (f64, f64),
    /// Physical page size (width, height) in cm
    pub page_cm: (f64, f64),
    /// Page size in pixels
    pub page_px: (u32, u32),
    /// Mural size in pixels
    pub canvas_px: (u32, u32),
    /// Inner content placement, when margins were requested
    pub margins: Option<MarginLayout>,
    /// Number of page columns
    pub cols: usize,
    /// Number of page rows
    pub rows: usize,
}

impl LayoutPlan {
    /// Total number of pages
    pub fn page_count(&self) -> usize {
        self.cols * self.rows
    }

    /// Area of the mural the image is resized into
    pub fn content_rect(&self) -> PixelRect {
        match &self.margins {
            Some(margins) => margins.content_rect(),
            None => PixelRect::new(0, 0, self.canvas_px.0, self.canvas_px.1),
        }
    }

    /// Mural area covered by the page at `pos`, clamped to the mural edge.
    ///
    /// Tiles on the last row or column are usually partial; a tile may even be
    /// empty when the grid overshoots the mural by less than a pixel.
    pub fn tile_bounds(&self, pos: GridPosition) -> PixelRect {
        let (page_w, page_h) = self.page_px;
        let (canvas_w, canvas_h) = self.canvas_px;

        let left = (pos.col as u64 * page_w as u64).min(canvas_w as u64) as u32;
        let top = (pos.row as u64 * page_h as u64).min(canvas_h as u64) as u32;
        let right = ((pos.col as u64 + 1) * page_w as u64).min(canvas_w as u64) as u32;
        let bottom = ((pos.row as u64 + 1) * page_h as u64).min(canvas_h as u64) as u32;

        PixelRect::new(left, top, right - left, bottom - top)
    }

    /// Grid positions in page order: row by row, left to right
    pub fn tiles(&self) -> impl Iterator<Item = GridPosition> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| GridPosition::new(row, col)))
    }

    /// X coordinates of the page boundaries strictly inside the mural
    pub fn vertical_boundaries(&self) -> Vec<u32> {
        internal_boundaries(self.cols, self.page_px.0, self.canvas_px.0)
    }

    /// Y coordinates of the page boundaries strictly inside the mural
    pub fn horizontal_boundaries(&self) -> Vec<u32> {
        internal_boundaries(self.rows, self.page_px.1, self.canvas_px.1)
    }
}

fn internal_boundaries(count: usize, step: u32, extent: u32) -> Vec<u32> {
    (1..count)
        .map(|i| i as u64 * step as u64)
        .filter(|&pos| pos < extent as u64)
        .map(|pos| pos as u32)
        .collect()
}

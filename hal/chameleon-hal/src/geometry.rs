//! Panel geometry
//!
//! Some panels are mounted with rows at the top or bottom that are not
//! visible. Drawing coordinates are relative to the visible area; the gap
//! is added back when talking to the panel controller.

/// Rectangle in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Number of pixels covered
    pub const fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Physical panel dimensions plus the non-drawable gaps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Geometry {
    /// Panel width in pixels
    pub width: u16,
    /// Physical panel height in pixels
    pub height: u16,
    /// Rows hidden at the top of the panel
    pub gap_top: u16,
    /// Rows hidden at the bottom of the panel
    pub gap_bottom: u16,
}

/// Waveshare 1.47" 320x172 panel in landscape (34 hidden rows at the bottom)
pub const WAVESHARE_320X172: Geometry = Geometry::new(320, 172, 0, 34);

impl Geometry {
    /// Create a new geometry
    pub const fn new(width: u16, height: u16, gap_top: u16, gap_bottom: u16) -> Self {
        Self {
            width,
            height,
            gap_top,
            gap_bottom,
        }
    }

    /// Height usable for drawing
    pub const fn effective_height(&self) -> u16 {
        self.height
            .saturating_sub(self.gap_top)
            .saturating_sub(self.gap_bottom)
    }

    /// Pixels in the drawable area (the size a back buffer needs)
    pub const fn pixel_count(&self) -> usize {
        self.width as usize * self.effective_height() as usize
    }

    /// Check if a drawing coordinate is inside the drawable area
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.effective_height() as i32
    }

    /// Clip a rectangle to the drawable area
    ///
    /// Returns `None` if nothing is left after clipping.
    pub fn clip(&self, x: i32, y: i32, width: i32, height: i32) -> Option<Rect> {
        let max_x = self.width as i32;
        let max_y = self.effective_height() as i32;

        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(width).min(max_x);
        let y1 = y.saturating_add(height).min(max_y);

        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        Some(Rect::new(
            x0 as u16,
            y0 as u16,
            (x1 - x0) as u16,
            (y1 - y0) as u16,
        ))
    }

    /// Translate a drawing-space rectangle into panel coordinates
    pub const fn to_panel(&self, rect: Rect) -> Rect {
        Rect::new(rect.x, rect.y + self.gap_top, rect.width, rect.height)
    }

    /// The whole drawable area in drawing coordinates
    pub const fn drawable(&self) -> Rect {
        Rect::new(0, 0, self.width, self.effective_height())
    }
}

//! Recording panel

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use chameleon_hal::color::named;
use chameleon_hal::{Panel, Rect, Rgb565};

/// A text draw as seen by the panel controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawnText {
    pub x: u16,
    pub y: u16,
    pub text: String,
    pub color: Rgb565,
    pub size: u8,
}

/// Panel that keeps its pixels in RAM and logs text draws
///
/// Coordinates are panel coordinates (gap rows included).
#[derive(Debug, Clone)]
pub struct MockPanel {
    width: u16,
    height: u16,
    pixels: Vec<Rgb565>,
    texts: Vec<DrawnText>,
    frames_pushed: u32,
    brightness: u8,
}

impl MockPanel {
    /// Create a black panel
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            pixels: vec![named::BLACK; width as usize * height as usize],
            texts: Vec::new(),
            frames_pushed: 0,
            brightness: 0,
        }
    }

    /// Pixel at panel coordinates
    pub fn pixel(&self, x: u16, y: u16) -> Option<Rgb565> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// All text drawn since the last [`take_texts`](Self::take_texts)
    pub fn texts(&self) -> &[DrawnText] {
        &self.texts
    }

    /// Drain the text log
    pub fn take_texts(&mut self) -> Vec<DrawnText> {
        core::mem::take(&mut self.texts)
    }

    /// Whether any logged text contains `needle`
    pub fn has_text(&self, needle: &str) -> bool {
        self.texts.iter().any(|t| t.text.contains(needle))
    }

    /// Number of full-frame pushes
    pub fn frames_pushed(&self) -> u32 {
        self.frames_pushed
    }

    /// Last backlight level set
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Count pixels of a given color inside a rectangle
    pub fn count_color(&self, area: Rect, color: Rgb565) -> usize {
        let mut count = 0;
        for y in area.y..area.y.saturating_add(area.height) {
            for x in area.x..area.x.saturating_add(area.width) {
                if self.pixel(x, y) == Some(color) {
                    count += 1;
                }
            }
        }
        count
    }

    fn put(&mut self, x: u16, y: u16, color: Rgb565) {
        if x < self.width && y < self.height {
            self.pixels[y as usize * self.width as usize + x as usize] = color;
        }
    }
}

impl Panel for MockPanel {
    fn fill_rect(&mut self, area: Rect, color: Rgb565) {
        for y in area.y..area.y.saturating_add(area.height) {
            for x in area.x..area.x.saturating_add(area.width) {
                self.put(x, y, color);
            }
        }
    }

    fn set_pixel(&mut self, x: u16, y: u16, color: Rgb565) {
        self.put(x, y, color);
    }

    fn draw_string(&mut self, x: u16, y: u16, text: &str, color: Rgb565, size: u8) {
        self.texts.push(DrawnText {
            x,
            y,
            text: String::from(text),
            color,
            size,
        });
    }

    fn push_frame(&mut self, area: Rect, pixels: &[Rgb565]) {
        let mut source = pixels.iter();
        for y in area.y..area.y.saturating_add(area.height) {
            for x in area.x..area.x.saturating_add(area.width) {
                if let Some(&color) = source.next() {
                    self.put(x, y, color);
                }
            }
        }
        self.frames_pushed += 1;
    }

    fn set_brightness(&mut self, level: u8) {
        self.brightness = level;
    }
}

//! Double-buffered display on top of a raw panel
//!
//! Drawing lands in a caller-provided back buffer sized for the drawable
//! area. `present()` pushes the whole buffer to the panel in one block.
//! When no buffer is available (allocation failed, too small) every
//! primitive goes straight to the panel instead.
//!
//! Text is rendered by the panel controller, not into the buffer, so text
//! draws are queued and replayed after the frame push.

use heapless::{String, Vec};

use crate::color::Rgb565;
use crate::display::{drawable_size, rect_args, DisplayHal, Panel};
use crate::geometry::Geometry;

/// Maximum text draws queued per frame
pub const MAX_QUEUED_TEXT: usize = 24;

/// Maximum bytes kept per queued text draw
pub const MAX_TEXT_LEN: usize = 48;

/// Default backlight level
pub const DEFAULT_BRIGHTNESS: u8 = 255;

#[derive(Debug, Clone)]
struct QueuedText {
    x: u16,
    y: u16,
    text: String<MAX_TEXT_LEN>,
    color: Rgb565,
    size: u8,
}

/// [`DisplayHal`] implementation backed by a [`Panel`]
pub struct BufferedDisplay<'b, P> {
    panel: P,
    geometry: Geometry,
    back: Option<&'b mut [Rgb565]>,
    text_queue: Vec<QueuedText, MAX_QUEUED_TEXT>,
    frame_count: u32,
    brightness: u8,
}

impl<'b, P: Panel> BufferedDisplay<'b, P> {
    /// Create a display
    ///
    /// `back` must hold at least `geometry.pixel_count()` pixels, otherwise
    /// the display runs unbuffered.
    pub fn new(mut panel: P, geometry: Geometry, back: Option<&'b mut [Rgb565]>) -> Self {
        let back = match back {
            Some(buf) if buf.len() >= geometry.pixel_count() => {
                info!(
                    "Back buffer ready: {}x{} ({} px)",
                    geometry.width,
                    geometry.effective_height(),
                    geometry.pixel_count()
                );
                Some(buf)
            }
            Some(buf) => {
                warn!(
                    "Back buffer too small ({} < {} px), drawing directly",
                    buf.len(),
                    geometry.pixel_count()
                );
                None
            }
            None => {
                warn!("No back buffer, drawing directly");
                None
            }
        };

        panel.set_brightness(DEFAULT_BRIGHTNESS);

        Self {
            panel,
            geometry,
            back,
            text_queue: Vec::new(),
            frame_count: 0,
            brightness: DEFAULT_BRIGHTNESS,
        }
    }

    /// Whether drawing goes through the back buffer
    pub fn is_double_buffered(&self) -> bool {
        self.back.is_some()
    }

    /// Current backlight level
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Access the underlying panel
    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// Mutable access to the underlying panel
    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    /// Read back a pixel from the back buffer
    pub fn back_pixel(&self, x: i32, y: i32) -> Option<Rgb565> {
        if !self.geometry.contains(x, y) {
            return None;
        }
        let index = y as usize * self.geometry.width as usize + x as usize;
        self.back.as_deref().and_then(|buf| buf.get(index).copied())
    }

    fn flush_text(&mut self) {
        for queued in self.text_queue.iter() {
            self.panel.draw_string(
                queued.x,
                queued.y + self.geometry.gap_top,
                queued.text.as_str(),
                queued.color,
                queued.size,
            );
        }
        self.text_queue.clear();
    }
}

impl<P: Panel> DisplayHal for BufferedDisplay<'_, P> {
    fn geometry(&self) -> Geometry {
        self.geometry
    }

    fn clear(&mut self, color: Rgb565) {
        self.text_queue.clear();
        match self.back.as_deref_mut() {
            Some(buf) => buf.fill(color),
            None => {
                let area = self.geometry.to_panel(self.geometry.drawable());
                self.panel.fill_rect(area, color);
            }
        }
    }

    fn draw_pixel(&mut self, x: i32, y: i32, color: Rgb565) {
        if !self.geometry.contains(x, y) {
            return;
        }
        match self.back.as_deref_mut() {
            Some(buf) => {
                buf[y as usize * self.geometry.width as usize + x as usize] = color;
            }
            None => {
                self.panel
                    .set_pixel(x as u16, y as u16 + self.geometry.gap_top, color);
            }
        }
    }

    fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Rgb565) {
        let Some(rect) = self.geometry.clip(x, y, width, height) else {
            return;
        };
        let stride = self.geometry.width as usize;
        match self.back.as_deref_mut() {
            Some(buf) => {
                for row in rect.y..rect.y + rect.height {
                    let start = row as usize * stride + rect.x as usize;
                    buf[start..start + rect.width as usize].fill(color);
                }
            }
            None => {
                let area = self.geometry.to_panel(rect);
                self.panel.fill_rect(area, color);
            }
        }
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Rgb565, size: u8) {
        let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
            return;
        };
        if x >= self.geometry.width || y >= self.geometry.effective_height() {
            trace!("Text at ({}, {}) starts off screen", x, y);
            return;
        }

        if self.back.is_none() {
            self.panel
                .draw_string(x, y + self.geometry.gap_top, text, color, size);
            return;
        }

        let mut stored = String::new();
        for ch in text.chars() {
            if stored.push(ch).is_err() {
                break;
            }
        }
        let queued = QueuedText {
            x,
            y,
            text: stored,
            color,
            size,
        };
        if self.text_queue.push(queued).is_err() {
            warn!("Text queue full, dropping text at ({}, {})", x, y);
        }
    }

    fn present(&mut self) {
        if let Some(buf) = self.back.as_deref() {
            let area = self.geometry.to_panel(self.geometry.drawable());
            self.panel.push_frame(area, &buf[..self.geometry.pixel_count()]);
            self.flush_text();
        }
        self.frame_count = self.frame_count.wrapping_add(1);
    }

    fn frame_count(&self) -> u32 {
        self.frame_count
    }

    fn set_brightness(&mut self, level: u8) {
        self.brightness = level;
        self.panel.set_brightness(level);
        debug!("Brightness set to {}", level);
    }
}

// Paths spelled out so `DrawTarget::clear` stays out of scope next to
// `DisplayHal::clear`.
impl<P: Panel> embedded_graphics::geometry::OriginDimensions for BufferedDisplay<'_, P> {
    fn size(&self) -> embedded_graphics::geometry::Size {
        drawable_size(self.geometry)
    }
}

impl<P: Panel> embedded_graphics::draw_target::DrawTarget for BufferedDisplay<'_, P> {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = embedded_graphics::Pixel<Self::Color>>,
    {
        for embedded_graphics::Pixel(point, color) in pixels {
            DisplayHal::draw_pixel(self, point.x, point.y, color);
        }
        Ok(())
    }

    fn fill_solid(
        &mut self,
        area: &embedded_graphics::primitives::Rectangle,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let (x, y, width, height) = rect_args(area);
        DisplayHal::draw_rect(self, x, y, width, height, color);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::named;
    use crate::geometry::Rect;
    use embedded_graphics::geometry::Point;
    use embedded_graphics::primitives::{Circle, Line, Primitive, PrimitiveStyle};
    use embedded_graphics::Drawable;

    const SMALL: Geometry = Geometry::new(8, 6, 1, 1);

    #[derive(Default)]
    struct CountingPanel {
        fills: u32,
        pixels: u32,
        pushes: u32,
        last_push: Option<Rect>,
        strings: Vec<(u16, u16), 8>,
        brightness: u8,
    }

    impl Panel for CountingPanel {
        fn fill_rect(&mut self, _area: Rect, _color: Rgb565) {
            self.fills += 1;
        }
        fn set_pixel(&mut self, _x: u16, _y: u16, _color: Rgb565) {
            self.pixels += 1;
        }
        fn draw_string(&mut self, x: u16, y: u16, _text: &str, _color: Rgb565, _size: u8) {
            let _ = self.strings.push((x, y));
        }
        fn push_frame(&mut self, area: Rect, pixels: &[Rgb565]) {
            assert_eq!(pixels.len(), area.area());
            self.pushes += 1;
            self.last_push = Some(area);
        }
        fn set_brightness(&mut self, level: u8) {
            self.brightness = level;
        }
    }

    #[test]
    fn test_buffered_drawing_stays_off_panel_until_present() {
        let mut buf = [named::BLACK; 32];
        let mut display = BufferedDisplay::new(CountingPanel::default(), SMALL, Some(&mut buf));
        assert!(display.is_double_buffered());

        display.clear(named::BLUE);
        display.draw_pixel(2, 3, named::RED);
        display.draw_rect(0, 0, 2, 2, named::GREEN);
        assert_eq!(display.panel().pushes, 0);
        assert_eq!(display.panel().pixels, 0);

        assert_eq!(display.back_pixel(2, 3), Some(named::RED));
        assert_eq!(display.back_pixel(1, 1), Some(named::GREEN));
        assert_eq!(display.back_pixel(7, 3), Some(named::BLUE));

        display.present();
        assert_eq!(display.panel().pushes, 1);
        assert_eq!(display.panel().last_push, Some(Rect::new(0, 1, 8, 4)));
        assert_eq!(display.frame_count(), 1);
    }

    #[test]
    fn test_out_of_bounds_pixels_ignored() {
        let mut buf = [named::BLACK; 32];
        let mut display = BufferedDisplay::new(CountingPanel::default(), SMALL, Some(&mut buf));
        display.draw_pixel(8, 0, named::RED);
        display.draw_pixel(0, 4, named::RED);
        display.draw_pixel(-1, 0, named::RED);
        assert!(display.back.as_deref().unwrap().iter().all(|&p| p == named::BLACK));
    }

    #[test]
    fn test_small_buffer_falls_back_to_direct() {
        let mut buf = [named::BLACK; 4];
        let mut display = BufferedDisplay::new(CountingPanel::default(), SMALL, Some(&mut buf));
        assert!(!display.is_double_buffered());

        display.draw_pixel(1, 1, named::RED);
        display.draw_rect(0, 0, 3, 3, named::RED);
        display.draw_text(0, 0, "hi", named::WHITE, 1);
        assert_eq!(display.panel().pixels, 1);
        assert_eq!(display.panel().fills, 1);
        // Top gap applied to direct text
        assert_eq!(display.panel().strings.as_slice(), &[(0, 1)]);

        display.present();
        assert_eq!(display.panel().pushes, 0);
        assert_eq!(display.frame_count(), 1);
    }

    #[test]
    fn test_text_replayed_after_push() {
        let mut buf = [named::BLACK; 32];
        let mut display = BufferedDisplay::new(CountingPanel::default(), SMALL, Some(&mut buf));
        display.draw_text(2, 0, "Clock", named::WHITE, 1);
        display.draw_text(0, 9, "hidden", named::WHITE, 1);
        assert!(display.panel().strings.is_empty());

        display.present();
        assert_eq!(display.panel().strings.as_slice(), &[(2, 1)]);

        // Queue is drained once presented
        display.present();
        assert_eq!(display.panel().strings.len(), 1);
    }

    #[test]
    fn test_clear_drops_queued_text() {
        let mut buf = [named::BLACK; 32];
        let mut display = BufferedDisplay::new(CountingPanel::default(), SMALL, Some(&mut buf));
        display.draw_text(0, 0, "stale", named::WHITE, 1);
        display.clear(named::BLACK);
        display.present();
        assert!(display.panel().strings.is_empty());
    }

    #[test]
    fn test_brightness_forwarded() {
        let mut display = BufferedDisplay::new(CountingPanel::default(), SMALL, None);
        assert_eq!(display.panel().brightness, DEFAULT_BRIGHTNESS);
        display.set_brightness(40);
        assert_eq!(display.brightness(), 40);
        assert_eq!(display.panel().brightness, 40);
    }

    #[test]
    fn test_direct_text_off_screen_never_reaches_panel() {
        let mut display = BufferedDisplay::new(CountingPanel::default(), SMALL, None);
        // 65_546 would wrap to 10 if truncated to u16
        display.draw_text(65_546, 0, "Ghost", named::WHITE, 1);
        display.draw_text(500, 0, "Offscreen", named::WHITE, 1);
        display.draw_text(8, 0, "Edge", named::WHITE, 1);
        display.draw_text(0, 70_000, "Below", named::WHITE, 1);
        assert!(display.panel().strings.is_empty());

        display.draw_text(7, 0, "Last", named::WHITE, 1);
        assert_eq!(display.panel().strings.as_slice(), &[(7, 1)]);
    }

    #[test]
    fn test_queued_text_off_screen_dropped() {
        let mut buf = [named::BLACK; 32];
        let mut display = BufferedDisplay::new(CountingPanel::default(), SMALL, Some(&mut buf));
        display.draw_text(65_546, 0, "Ghost", named::WHITE, 1);
        display.draw_text(500, 2, "Offscreen", named::WHITE, 1);
        display.draw_text(3, 2, "Shown", named::WHITE, 1);
        display.present();
        assert_eq!(display.panel().strings.as_slice(), &[(3, 3)]);
    }

    #[test]
    fn test_graphics_primitives_draw_into_back_buffer() {
        let mut buf = [named::BLACK; 32];
        let mut display = BufferedDisplay::new(CountingPanel::default(), SMALL, Some(&mut buf));

        let _ = Line::new(Point::new(0, 0), Point::new(7, 0))
            .into_styled(PrimitiveStyle::with_stroke(named::RED, 1))
            .draw(&mut display);
        assert!((0..8).all(|x| display.back_pixel(x, 0) == Some(named::RED)));

        // Circle spills past the bottom of the 8x4 drawable area
        let _ = Circle::with_center(Point::new(4, 3), 3)
            .into_styled(PrimitiveStyle::with_fill(named::GREEN))
            .draw(&mut display);
        assert_eq!(display.back_pixel(4, 3), Some(named::GREEN));
        assert_eq!(display.back_pixel(4, 2), Some(named::GREEN));
        assert_eq!(display.back_pixel(0, 3), Some(named::BLACK));
        assert_eq!(display.panel().pixels, 0);
        assert_eq!(display.panel().fills, 0);
    }
}

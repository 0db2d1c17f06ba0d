//! Display abstractions
//!
//! Two layers:
//! - [`Panel`]: the raw controller (TFT over SPI etc.). Works in panel
//!   coordinates and does no bounds checking of its own.
//! - [`DisplayHal`]: what the runtime and applications draw through.
//!   Coordinates are relative to the drawable area and every primitive is
//!   bounds-checked.
//!
//! Shapes are rasterized by embedded-graphics through [`Canvas`], which
//! exposes any [`DisplayHal`] as a `DrawTarget`.

use core::convert::Infallible;

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{OriginDimensions, Point, Size};
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::primitives::{Circle, Line, Primitive, PrimitiveStyle, Rectangle};
use embedded_graphics::text::renderer::TextRenderer;
use embedded_graphics::text::Baseline;
use embedded_graphics::{Drawable, Pixel};

use crate::color::{named, Rgb565};
use crate::geometry::{Geometry, Rect};

/// Font whose metrics are used for text layout
///
/// Matches the 6 px advance of the panel controllers' built-in font.
pub const TEXT_FONT: &MonoFont<'static> = &FONT_6X10;

/// Raw panel controller
pub trait Panel {
    /// Fill a rectangle directly on the panel
    fn fill_rect(&mut self, area: Rect, color: Rgb565);

    /// Set a single pixel directly on the panel
    fn set_pixel(&mut self, x: u16, y: u16, color: Rgb565);

    /// Render text with the controller's built-in font
    fn draw_string(&mut self, x: u16, y: u16, text: &str, color: Rgb565, size: u8);

    /// Push a full block of pixels (row-major) into `area`
    fn push_frame(&mut self, area: Rect, pixels: &[Rgb565]);

    /// Set backlight level (0-255)
    fn set_brightness(&mut self, level: u8);
}

/// Bounds-checked drawing surface
///
/// Drawing goes to the back buffer where one exists; [`present`] makes it
/// visible.
///
/// [`present`]: DisplayHal::present
pub trait DisplayHal {
    /// Panel geometry
    fn geometry(&self) -> Geometry;

    /// Fill the whole drawable area
    fn clear(&mut self, color: Rgb565);

    /// Draw a single pixel; out-of-range coordinates are ignored
    fn draw_pixel(&mut self, x: i32, y: i32, color: Rgb565);

    /// Draw a filled rectangle, clipped to the drawable area
    fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Rgb565);

    /// Draw text; `size` is the font scale (1-5)
    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Rgb565, size: u8);

    /// Present the frame (buffer swap)
    fn present(&mut self);

    /// Total frames presented
    fn frame_count(&self) -> u32;

    /// Set backlight level (0-255)
    fn set_brightness(&mut self, level: u8);

    /// Draw a one-pixel line, both endpoints included
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb565) {
        let line = Line::new(Point::new(x0, y0), Point::new(x1, y1));
        let _ = line
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(&mut Canvas::new(self));
    }
}

/// [`DisplayHal`] seen as an embedded-graphics `DrawTarget`
///
/// The target is the drawable area; anything outside it is clipped by the
/// display's own bounds checks.
pub struct Canvas<'d, D: ?Sized> {
    display: &'d mut D,
}

impl<'d, D: DisplayHal + ?Sized> Canvas<'d, D> {
    pub fn new(display: &'d mut D) -> Self {
        Self { display }
    }
}

impl<D: DisplayHal + ?Sized> OriginDimensions for Canvas<'_, D> {
    fn size(&self) -> Size {
        drawable_size(self.display.geometry())
    }
}

impl<D: DisplayHal + ?Sized> DrawTarget for Canvas<'_, D> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.display.draw_pixel(point.x, point.y, color);
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let (x, y, width, height) = rect_args(area);
        self.display.draw_rect(x, y, width, height, color);
        Ok(())
    }
}

/// Size of the drawable area as embedded-graphics sees it
pub(crate) fn drawable_size(geometry: Geometry) -> Size {
    Size::new(geometry.width as u32, geometry.effective_height() as u32)
}

/// Split an embedded-graphics rectangle into `draw_rect` arguments
pub(crate) fn rect_args(area: &Rectangle) -> (i32, i32, i32, i32) {
    let width = i32::try_from(area.size.width).unwrap_or(i32::MAX);
    let height = i32::try_from(area.size.height).unwrap_or(i32::MAX);
    (area.top_left.x, area.top_left.y, width, height)
}

/// Helper drawing routines built on [`DisplayHal`]
pub trait DisplayExt: DisplayHal {
    /// Draw a filled circle; negative radii draw nothing
    fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Rgb565) {
        let Ok(radius) = u32::try_from(radius) else {
            return;
        };
        let circle = Circle::with_center(Point::new(cx, cy), radius * 2 + 1);
        let _ = circle
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(&mut self.canvas());
    }

    /// Draw text horizontally centered on the drawable area
    fn draw_text_centered(&mut self, y: i32, text: &str, color: Rgb565, size: u8) {
        let width = self.geometry().width as i32;
        let x = (width - text_width(text, size)) / 2;
        self.draw_text(x.max(0), y, text, color, size);
    }

    /// Draw a one-pixel rectangle outline
    fn draw_frame(&mut self, x: i32, y: i32, width: i32, height: i32, color: Rgb565) {
        if width <= 0 || height <= 0 {
            return;
        }
        self.draw_rect(x, y, width, 1, color);
        self.draw_rect(x, y + height - 1, width, 1, color);
        self.draw_rect(x, y, 1, height, color);
        self.draw_rect(x + width - 1, y, 1, height, color);
    }

    /// Borrow the display as an embedded-graphics `DrawTarget`
    fn canvas(&mut self) -> Canvas<'_, Self> {
        Canvas::new(self)
    }
}

impl<T: DisplayHal + ?Sized> DisplayExt for T {}

/// Width of `text` in pixels at the given font scale
pub fn text_width(text: &str, size: u8) -> i32 {
    let style = MonoTextStyle::new(TEXT_FONT, named::WHITE);
    let metrics = style.measure_string(text, Point::zero(), Baseline::Top);
    let width = i32::try_from(metrics.bounding_box.size.width).unwrap_or(i32::MAX);
    width.saturating_mul(size.max(1) as i32)
}

//! RGB565 color helpers
//!
//! Panels on this class of device take 16-bit RGB565 pixels. The color type
//! itself comes from `embedded-graphics` so drivers written against that
//! ecosystem interoperate without conversion.

pub use embedded_graphics::pixelcolor::Rgb565;

use embedded_graphics::pixelcolor::IntoStorage;

/// Build a color from its raw RGB565 encoding
pub const fn from_raw(raw: u16) -> Rgb565 {
    Rgb565::new(
        ((raw >> 11) & 0x1F) as u8,
        ((raw >> 5) & 0x3F) as u8,
        (raw & 0x1F) as u8,
    )
}

/// Raw RGB565 encoding of a color
pub fn to_raw(color: Rgb565) -> u16 {
    color.into_storage()
}

/// Named colors shared by drivers and applications
pub mod named {
    use super::Rgb565;

    pub const BLACK: Rgb565 = Rgb565::new(0, 0, 0);
    pub const WHITE: Rgb565 = Rgb565::new(31, 63, 31);
    pub const RED: Rgb565 = Rgb565::new(31, 0, 0);
    pub const GREEN: Rgb565 = Rgb565::new(0, 63, 0);
    pub const BLUE: Rgb565 = Rgb565::new(0, 0, 31);
    pub const YELLOW: Rgb565 = Rgb565::new(31, 63, 0);
    pub const CYAN: Rgb565 = Rgb565::new(0, 63, 31);
    pub const MAGENTA: Rgb565 = Rgb565::new(31, 0, 31);
    pub const GRAY: Rgb565 = Rgb565::new(16, 32, 16);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_colors_match_raw_encoding() {
        assert_eq!(to_raw(named::BLACK), 0x0000);
        assert_eq!(to_raw(named::WHITE), 0xFFFF);
        assert_eq!(to_raw(named::RED), 0xF800);
        assert_eq!(to_raw(named::GREEN), 0x07E0);
        assert_eq!(to_raw(named::BLUE), 0x001F);
        assert_eq!(to_raw(named::YELLOW), 0xFFE0);
        assert_eq!(to_raw(named::GRAY), 0x8410);
    }

    #[test]
    fn test_from_raw() {
        assert_eq!(from_raw(0xF81F), named::MAGENTA);
        assert_eq!(to_raw(from_raw(0x1C9F)), 0x1C9F);
    }
}

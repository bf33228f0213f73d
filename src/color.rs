//! Pixel color for monochrome OLED panels
//!
//! Each pixel of the SSD1306 is a single bit in display RAM: set means the
//! pixel is lit, clear means it is dark.
//!
//! ## Example
//!
//! ```
//! use ssd1306_bench::Color;
//!
//! assert_eq!(Color::Off.fill_byte(), 0x00);
//! assert_eq!(Color::On.fill_byte(), 0xFF);
//! assert_eq!(Color::from_bit(3), Color::On);
//! ```

use embedded_graphics_core::pixelcolor::{BinaryColor, PixelColor, raw::RawU1};

/// Colors supported by a monochrome OLED
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Color {
    /// Dark pixel
    #[default]
    Off,
    /// Lit pixel
    On,
}

impl PixelColor for Color {
    type Raw = RawU1;
}

impl Color {
    /// Interpret an integer color the way framebuffer APIs do: zero is off,
    /// anything else is on
    pub fn from_bit(value: u8) -> Self {
        if value == 0 { Self::Off } else { Self::On }
    }

    /// Byte value that sets all eight pixels of a buffer byte to this color
    pub fn fill_byte(self) -> u8 {
        match self {
            Self::Off => 0x00,
            Self::On => 0xFF,
        }
    }

    /// Whether the pixel is lit
    pub fn is_on(self) -> bool {
        self == Self::On
    }
}

impl From<bool> for Color {
    fn from(lit: bool) -> Self {
        if lit { Self::On } else { Self::Off }
    }
}

impl From<BinaryColor> for Color {
    fn from(color: BinaryColor) -> Self {
        match color {
            BinaryColor::Off => Self::Off,
            BinaryColor::On => Self::On,
        }
    }
}

impl From<Color> for BinaryColor {
    fn from(color: Color) -> Self {
        match color {
            Color::Off => Self::Off,
            Color::On => Self::On,
        }
    }
}

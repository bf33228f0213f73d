//! Graphics support via embedded-graphics
//!
//! [`Display`] implements [`DrawTarget`] directly, so any embedded-graphics
//! primitive can be drawn into its frame buffer. Two shortcuts cover what the
//! bench menu needs: [`Display::text`] renders with the 6x10 mono font and
//! [`Display::fill_rect`] draws a solid rectangle. Everything outside the
//! panel is clipped.
//!
//! Drawing never touches the bus; call [`Display::show`] afterwards.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_graphics::{
//!     prelude::*,
//!     primitives::{Circle, PrimitiveStyle},
//! };
//! use ssd1306_bench::{Color, Display, DisplayInterface, Geometry};
//! # use core::convert::Infallible;
//! # use embedded_hal::delay::DelayNs;
//! # struct MockInterface;
//! # impl DisplayInterface for MockInterface {
//! #     type Error = Infallible;
//! #     fn send_command(&mut self, _command: u8) -> Result<(), Self::Error> { Ok(()) }
//! #     fn send_data<D: DelayNs>(&mut self, _data: &[u8], _delay: &mut D) -> Result<(), Self::Error> { Ok(()) }
//! #     fn probe(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let mut delay = MockDelay;
//! let mut display = Display::new(MockInterface, Geometry::W128xH32);
//!
//! display.text("I2C MENU", 0, 0);
//! let _ = Circle::new(Point::new(100, 4), 20)
//!     .into_styled(PrimitiveStyle::with_stroke(Color::On, 1))
//!     .draw(&mut display);
//!
//! let _ = display.show(&mut delay);
//! ```

use core::convert::Infallible;
use embedded_graphics::{
    Drawable,
    mono_font::{MonoTextStyle, ascii::FONT_6X10},
    primitives::{Primitive, PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    prelude::Pixel,
};

use crate::color::Color;
use crate::display::Display;
use crate::interface::DisplayInterface;
use crate::layout::pixel_offset;

impl<I> Display<I>
where
    I: DisplayInterface,
{
    /// Draw `text` with its top-left corner at (x, y)
    ///
    /// Uses the 6x10 mono font in [`Color::On`] over a transparent background.
    /// Glyphs partly or wholly off the panel are clipped.
    pub fn text(&mut self, text: &str, x: i32, y: i32) {
        let style = MonoTextStyle::new(&FONT_6X10, Color::On);
        let _ = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(self);
    }

    /// Fill a `w` x `h` rectangle whose top-left corner is at (x, y)
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) {
        let _ = Rectangle::new(Point::new(x, y), Size::new(w, h))
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(self);
    }

    /// Color of the buffered pixel at (x, y), `None` outside the panel
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let geometry = self.geometry();
        if x >= geometry.width() || y >= geometry.height() {
            return None;
        }
        let (index, bit) = pixel_offset(x, y, geometry.width());
        Some(Color::from_bit(self.buffer()[index] & bit))
    }

    /// Set a single pixel; (x, y) must be on the panel
    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        let (index, bit) = pixel_offset(x, y, self.geometry().width());
        let buffer = self.buffer_mut();
        if color.is_on() {
            buffer[index] |= bit;
        } else {
            buffer[index] &= !bit;
        }
    }
}

impl<I> DrawTarget for Display<I>
where
    I: DisplayInterface,
{
    type Color = Color;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let sz = self.size();

        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 {
                continue;
            }

            let x = x as u32;
            let y = y as u32;

            if x >= sz.width || y >= sz.height {
                continue;
            }

            self.set_pixel(x, y, color);
        }

        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}

impl<I> OriginDimensions for Display<I>
where
    I: DisplayInterface,
{
    fn size(&self) -> Size {
        let geometry = self.geometry();
        Size::new(geometry.width(), geometry.height())
    }
}

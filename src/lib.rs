//! SSD1306 OLED I2C Bench
//!
//! An interactive bench for SSD1306 OLED modules on a two-wire (I2C) bus,
//! meant for watching the traffic on a logic analyser while driving the
//! display by hand.
//!
//! ## Features
//!
//! - `no_std` compatible
//! - `embedded-hal` v1.0 support
//! - `embedded-graphics` drawing into the frame buffer
//! - Bus scan and display address selection (0x3C, then 0x3D, then first found)
//! - 128x32 / 128x64 geometry fallback
//! - Frame buffer writes split into small chunked transactions
//! - Raw single-byte command and data sends
//! - Runtime bus frequency changes
//! - Scanner and probe diagnostics
//!
//! The board firmware supplies the I2C peripheral through a
//! [`BusProvider`](bus::BusProvider), a [`DelayNs`](embedded_hal::delay::DelayNs)
//! and a serial [`Console`](menu::Console).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::i2c::{ErrorType, I2c, Operation};
//! use ssd1306_bench::bench::Bench;
//! use ssd1306_bench::bus::{BusProvider, BusSettings};
//! use ssd1306_bench::menu::{self, Console};
//! use ssd1306_bench::Builder;
//!
//! # struct MockI2c;
//! # impl ErrorType for MockI2c { type Error = Infallible; }
//! # impl I2c for MockI2c {
//! #     fn transaction(&mut self, _address: u8, _operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct Board;
//! # impl BusProvider for Board {
//! #     type Bus = MockI2c;
//! #     fn open(&mut self, _settings: &BusSettings) -> Result<MockI2c, Infallible> { Ok(MockI2c) }
//! #     fn apply(&mut self, _bus: &mut MockI2c, _settings: &BusSettings) -> Result<(), Infallible> { Ok(()) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # struct Serial;
//! # impl core::fmt::Write for Serial {
//! #     fn write_str(&mut self, _s: &str) -> core::fmt::Result { Ok(()) }
//! # }
//! # impl Console for Serial {
//! #     fn read_line<'b>(&mut self, _buf: &'b mut [u8]) -> Option<&'b str> { None }
//! # }
//! # let mut serial = Serial;
//! let config = match Builder::new().frequency_hz(50_000).chunk_size(16).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut bench = match Bench::start(Board, config, MockDelay) {
//!     Ok(bench) => bench,
//!     Err(_) => return,
//! };
//! menu::session(&mut bench, &mut serial);
//! ```

#![no_std]

#[cfg(test)]
extern crate alloc;

/// Menu actions
pub mod bench;
/// Two-wire bus transport and discovery
pub mod bus;
/// Binary pixel color
pub mod color;
/// SSD1306 command definitions
pub mod command;
/// Bench configuration types and builder
pub mod config;
/// Bus, address and display bundle
pub mod context;
/// Scanner and probe programs
pub mod diag;
/// Core display operations
pub mod display;
/// Error types for the bench
pub mod error;
/// Graphics support via embedded-graphics
pub mod graphics;
/// Operator input parsing
pub mod input;
/// Hardware interface abstraction
pub mod interface;
/// Frame buffer layout utilities
pub mod layout;
/// Interactive menu
pub mod menu;
/// Raw command and data senders
pub mod raw;

#[cfg(test)]
pub(crate) mod testing;

pub use bus::{AddressSet, BusHandle, BusProvider, BusSettings};
pub use color::Color;
pub use config::{
    Builder, Config, DEFAULT_CHUNK_SIZE, DEFAULT_FREQUENCY_HZ, Geometry, MAX_CHUNK_SIZE,
    MIN_FREQUENCY_HZ,
};
pub use context::DeviceContext;
pub use display::Display;
pub use error::{BuilderError, Error, InputError};
pub use interface::{ChunkedWriter, DisplayInterface, I2cInterface};

//! Hardware interface abstraction
//!
//! This module provides the [`DisplayInterface`] trait, the [`I2cInterface`]
//! struct that talks to an SSD1306 over I2C, and the [`ChunkedWriter`] it uses
//! for display data.
//!
//! ## Chunked Writes
//!
//! Some I2C ports cannot reliably carry a whole frame buffer in one
//! transaction. [`ChunkedWriter`] splits display data into slices of at most
//! `chunk_size` bytes and sends each slice as its own transaction, with the
//! data control byte `0x40` in front of every slice:
//!
//! ```text
//! [0x40, b0 .. b15] [0x40, b16 .. b31] ... [0x40, bN-k .. bN-1]
//! ```
//!
//! A failed slice ends the write. Slices already sent stay on the display.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::i2c::{ErrorType, I2c, Operation};
//! use ssd1306_bench::{ChunkedWriter, DisplayInterface, I2cInterface};
//! # use core::convert::Infallible;
//! # struct MockI2c;
//! # impl ErrorType for MockI2c { type Error = Infallible; }
//! # impl I2c for MockI2c {
//! #     fn transaction(&mut self, _address: u8, _operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let mut delay = MockDelay;
//! let writer = match ChunkedWriter::new(16, 0) {
//!     Ok(writer) => writer,
//!     Err(_) => return,
//! };
//! let mut interface = I2cInterface::new(MockI2c, 0x3C, writer);
//!
//! // Display OFF: one transaction [0x80, 0xAE]
//! let _ = interface.send_command(0xAE);
//!
//! // 40 data bytes: three transactions of 16, 16 and 8 bytes after 0x40
//! let _ = interface.send_data(&[0xFF; 40], &mut delay);
//! ```

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::command::{CONTROL_COMMAND, CONTROL_DATA};
use crate::config::{DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};
use crate::error::BuilderError;

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Trait for the hardware interface to an SSD1306 controller
///
/// This trait abstracts over transports so that the
/// [`Display`](crate::display::Display) can be driven and tested without a
/// real bus.
pub trait DisplayInterface {
    /// Error type for interface operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Send one command byte as its own transaction
    ///
    /// # Errors
    ///
    /// Returns an error if the controller does not acknowledge.
    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error>;

    /// Send display RAM data
    ///
    /// # Arguments
    ///
    /// * `data` - Bytes to send, in display RAM order
    /// * `delay` - Delay implementation for inter-transaction pauses
    ///
    /// # Errors
    ///
    /// Returns the first transaction error. Data sent before it is not rolled back.
    fn send_data<D: DelayNs>(
        &mut self,
        data: &[u8],
        delay: &mut D,
    ) -> InterfaceResult<(), Self::Error>;

    /// Check that the controller answers without sending it anything
    ///
    /// # Errors
    ///
    /// Returns an error if the controller does not acknowledge its address.
    fn probe(&mut self) -> InterfaceResult<(), Self::Error>;
}

/// Splits display data into bounded I2C transactions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkedWriter {
    /// Maximum data bytes per transaction, excluding the control byte
    pub(crate) chunk_size: usize,
    /// Pause between transactions in microseconds
    pub(crate) pause_us: u32,
}

impl Default for ChunkedWriter {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            pause_us: 0,
        }
    }
}

impl ChunkedWriter {
    /// Create a writer
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidChunkSize` unless `1 <= chunk_size <= MAX_CHUNK_SIZE`.
    pub fn new(chunk_size: usize, pause_us: u32) -> Result<Self, BuilderError> {
        if chunk_size == 0 || chunk_size > MAX_CHUNK_SIZE {
            return Err(BuilderError::InvalidChunkSize(chunk_size));
        }
        Ok(Self {
            chunk_size,
            pause_us,
        })
    }

    /// Maximum data bytes per transaction
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Pause between transactions in microseconds
    pub fn pause_us(&self) -> u32 {
        self.pause_us
    }

    /// Number of transactions needed for `len` bytes
    pub fn transactions(&self, len: usize) -> usize {
        len.div_ceil(self.chunk_size)
    }

    /// Write `data` to `address` as a series of `[0x40] ++ slice` transactions
    ///
    /// Slices are consecutive, in order, and at most `chunk_size` long. When
    /// `pause_us` is non-zero the writer sleeps between slices, never after
    /// the last one.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failed transaction; no retry.
    pub fn write_frame<I2C, D>(
        &self,
        i2c: &mut I2C,
        address: u8,
        data: &[u8],
        delay: &mut D,
    ) -> InterfaceResult<(), I2C::Error>
    where
        I2C: I2c,
        D: DelayNs,
    {
        let mut packet = [0u8; MAX_CHUNK_SIZE + 1];
        packet[0] = CONTROL_DATA;

        log::debug!(
            "writing {} bytes to {:#04x} in {} chunk(s) of {}",
            data.len(),
            address,
            self.transactions(data.len()),
            self.chunk_size
        );

        for (index, chunk) in data.chunks(self.chunk_size).enumerate() {
            if index > 0 && self.pause_us > 0 {
                delay.delay_us(self.pause_us);
            }
            packet[1..=chunk.len()].copy_from_slice(chunk);
            log::trace!("chunk {}: {} bytes", index, chunk.len());
            i2c.write(address, &packet[..=chunk.len()])?;
        }

        Ok(())
    }
}

/// SSD1306 interface over I2C
///
/// Commands go out as `[0x80, command]`, display data through a
/// [`ChunkedWriter`].
pub struct I2cInterface<I2C> {
    /// Bus the controller sits on
    i2c: I2C,
    /// 7-bit controller address
    address: u8,
    /// Display data framing
    writer: ChunkedWriter,
}

impl<I2C> I2cInterface<I2C>
where
    I2C: I2c,
{
    /// Create a new interface for the controller at `address`
    pub fn new(i2c: I2C, address: u8, writer: ChunkedWriter) -> Self {
        Self {
            i2c,
            address,
            writer,
        }
    }

    /// Controller address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Display data framing in use
    pub fn writer(&self) -> &ChunkedWriter {
        &self.writer
    }

    /// Access the underlying bus
    ///
    /// Used by the raw senders, which bypass the display driver.
    pub fn bus(&self) -> &I2C {
        &self.i2c
    }

    /// Mutable access to the underlying bus
    pub fn bus_mut(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    /// Release the underlying bus
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> DisplayInterface for I2cInterface<I2C>
where
    I2C: I2c,
{
    type Error = I2C::Error;

    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error> {
        self.i2c.write(self.address, &[CONTROL_COMMAND, command])
    }

    fn send_data<D: DelayNs>(
        &mut self,
        data: &[u8],
        delay: &mut D,
    ) -> InterfaceResult<(), Self::Error> {
        self.writer
            .write_frame(&mut self.i2c, self.address, data, delay)
    }

    fn probe(&mut self) -> InterfaceResult<(), Self::Error> {
        self.i2c.write(self.address, &[])
    }
}

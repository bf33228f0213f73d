//! Error types for the bench
//!
//! This module defines error types for configuration building ([`BuilderError`]),
//! operator input validation ([`InputError`]) and device operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`InputError`] - Operator input that was rejected before any bus traffic
//! - [`Error`] - Runtime errors during bus and display operations
//!
//! ## Example
//!
//! ```
//! use ssd1306_bench::{Builder, BuilderError};
//!
//! let result = Builder::new().chunk_size(0).build();
//! assert!(matches!(result, Err(BuilderError::InvalidChunkSize(0))));
//!
//! let result = Builder::new().frequency_hz(999).build();
//! assert!(matches!(result, Err(BuilderError::InvalidFrequency(999))));
//! ```

use core::fmt::Debug;

/// Errors that can occur when talking to the bus or the display
///
/// Generic over the bus error type so callers can match on the underlying
/// hardware error, e.g. a missing acknowledge.
#[derive(Debug)]
pub enum Error<E> {
    /// A bus transaction failed
    ///
    /// Usually the addressed device did not acknowledge. Nothing is retried
    /// and nothing already sent is rolled back.
    Bus(E),
    /// No device acknowledged during the discovery scan
    NoDevices,
    /// Operator or caller input was rejected before any bus traffic
    Input(InputError),
}

impl<E> From<InputError> for Error<E> {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

impl<E: Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "I2C error: {e:?}"),
            Self::NoDevices => write!(
                f,
                "No I2C devices found. Check SCL/SDA wiring, 3V3, GND and the pull-ups"
            ),
            Self::Input(e) => write!(f, "{e}"),
        }
    }
}

impl<E: Debug> core::error::Error for Error<E> {}

/// Operator input that failed validation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputError {
    /// No input line was available
    Missing,
    /// Input is not a decimal integer
    NotANumber,
    /// Input is not a hexadecimal byte
    NotHex,
    /// Input parsed but lies outside the accepted range
    OutOfRange {
        /// Value supplied
        value: i64,
        /// Smallest accepted value
        min: i64,
        /// Largest accepted value
        max: i64,
    },
}

impl core::fmt::Display for InputError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Missing => write!(f, "Invalid value: no input"),
            Self::NotANumber => write!(f, "Invalid value: not a number"),
            Self::NotHex => write!(f, "Invalid hex"),
            Self::OutOfRange { value, min, max } => {
                write!(f, "Invalid value: {value} is outside {min}..={max}")
            }
        }
    }
}

impl core::error::Error for InputError {}

/// Errors that can occur when building configuration
#[derive(Debug, PartialEq, Eq)]
pub enum BuilderError {
    /// Bus clock frequency below the supported minimum
    InvalidFrequency(u32),
    /// Chunk size outside the supported range
    InvalidChunkSize(usize),
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidFrequency(hz) => write!(
                f,
                "Invalid I2C frequency {hz} Hz (minimum {} Hz)",
                crate::config::MIN_FREQUENCY_HZ
            ),
            Self::InvalidChunkSize(size) => write!(
                f,
                "Invalid chunk size {size} (must be 1..={})",
                crate::config::MAX_CHUNK_SIZE
            ),
        }
    }
}

impl core::error::Error for BuilderError {}

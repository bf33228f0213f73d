//! Operator input parsing
//!
//! Every value typed at a menu prompt goes through one of these functions
//! before it reaches the bus, so a rejected value never causes a transaction.
//!
//! ```
//! use ssd1306_bench::input::{parse_hex_byte, parse_int};
//! use ssd1306_bench::InputError;
//!
//! assert_eq!(parse_hex_byte(" AE "), Ok(0xAE));
//! assert_eq!(parse_hex_byte("0x7e"), Ok(0x7E));
//! assert_eq!(parse_int("300", 0, 255), Err(InputError::OutOfRange { value: 300, min: 0, max: 255 }));
//! ```

use crate::config::MIN_FREQUENCY_HZ;
use crate::error::InputError;

/// Parse a decimal integer and check it lies in `min..=max`
///
/// Surrounding whitespace is ignored; a blank line is [`InputError::Missing`].
pub fn parse_int(text: &str, min: i64, max: i64) -> Result<i64, InputError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(InputError::Missing);
    }
    let value: i64 = text.parse().map_err(|_| InputError::NotANumber)?;
    if !(min..=max).contains(&value) {
        return Err(InputError::OutOfRange { value, min, max });
    }
    Ok(value)
}

/// Parse a hexadecimal byte, with or without a `0x` prefix
///
/// Values above `0xFF` are rejected rather than truncated.
pub fn parse_hex_byte(text: &str) -> Result<u8, InputError> {
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if digits.is_empty() {
        return Err(InputError::NotHex);
    }
    let value = u32::from_str_radix(digits, 16).map_err(|_| InputError::NotHex)?;
    u8::try_from(value).map_err(|_| InputError::OutOfRange {
        value: i64::from(value),
        min: 0,
        max: 0xFF,
    })
}

/// Parse a bus clock frequency in Hz, at least [`MIN_FREQUENCY_HZ`]
pub fn parse_frequency(text: &str) -> Result<u32, InputError> {
    let value = parse_int(text, i64::from(MIN_FREQUENCY_HZ), i64::from(u32::MAX))?;
    Ok(value as u32)
}

//! Raw command and data senders
//!
//! These bypass the display driver and put exactly one two-byte transaction on
//! the bus, followed by a fixed settle time so single transactions stand out
//! on a logic analyser capture.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::command::{CONTROL_COMMAND, CONTROL_DATA};

/// Settle time after each raw transaction
pub const SETTLE_MS: u32 = 2;

/// Send one command byte as `[0x80, command]`, then wait [`SETTLE_MS`]
///
/// # Errors
///
/// Returns the bus error if the transaction is not acknowledged. No settle
/// delay follows a failed transaction.
pub fn send_command<I2C, D>(
    i2c: &mut I2C,
    address: u8,
    command: u8,
    delay: &mut D,
) -> Result<(), I2C::Error>
where
    I2C: I2c,
    D: DelayNs,
{
    send(i2c, address, CONTROL_COMMAND, command, delay)
}

/// Send one display RAM byte as `[0x40, data]`, then wait [`SETTLE_MS`]
///
/// The byte lands at the controller's current column and page.
///
/// # Errors
///
/// Returns the bus error if the transaction is not acknowledged.
pub fn send_data<I2C, D>(
    i2c: &mut I2C,
    address: u8,
    data: u8,
    delay: &mut D,
) -> Result<(), I2C::Error>
where
    I2C: I2c,
    D: DelayNs,
{
    send(i2c, address, CONTROL_DATA, data, delay)
}

fn send<I2C, D>(
    i2c: &mut I2C,
    address: u8,
    control: u8,
    byte: u8,
    delay: &mut D,
) -> Result<(), I2C::Error>
where
    I2C: I2c,
    D: DelayNs,
{
    log::debug!("raw {:#04x} {:#04x} -> {:#04x}", control, byte, address);
    i2c.write(address, &[control, byte])?;
    delay.delay_ms(SETTLE_MS);
    Ok(())
}

//! Bus diagnostics
//!
//! Two small standalone programs for checking wiring before running the menu:
//!
//! - [`run_scanner`] lists every address that acknowledges, one `0x..` per line
//! - [`run_probe`] waits for a logic analyser to be armed, then sends a single
//!   address-only write and reports whether the device acknowledged
//!
//! Both open their own bus, by default on the [`Builder::diagnostics`]
//! preset.
//!
//! [`Builder::diagnostics`]: crate::config::Builder::diagnostics

use core::fmt::Write;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::bus::{AddressSet, BusError, BusHandle, BusProvider};
use crate::config::Config;
use crate::error::Error;

/// Address probed by [`run_probe`] unless told otherwise
pub const PROBE_ADDRESS: u8 = 0x3C;

/// Wait before the probe transaction, time to arm the analyser
pub const PROBE_ARM_DELAY_MS: u32 = 1000;

/// Scan the bus and print each acknowledging address
///
/// Prints nothing when the bus is empty.
pub fn scan_report<I2C, W>(bus: &mut BusHandle<I2C>, out: &mut W) -> AddressSet
where
    I2C: I2c,
    W: Write,
{
    let found = bus.scan();
    for address in found.iter() {
        let _ = writeln!(out, "{address:#04x}");
    }
    found
}

/// Probe one address with a zero-length write and print the outcome
///
/// Returns whether the device acknowledged.
pub fn probe_report<I2C, D, W>(
    bus: &mut BusHandle<I2C>,
    address: u8,
    delay: &mut D,
    out: &mut W,
) -> bool
where
    I2C: I2c,
    D: DelayNs,
    W: Write,
{
    delay.delay_ms(PROBE_ARM_DELAY_MS);

    let _ = writeln!(out, "Probing {address:#04x} ...");
    match bus.probe(address) {
        Ok(()) => {
            let _ = writeln!(out, "ACK from {address:#04x}");
            true
        }
        Err(e) => {
            let _ = writeln!(out, "NACK / no response: {e:?}");
            false
        }
    }
}

/// Open the bus described by `config` and print a scan
///
/// # Errors
///
/// Returns [`Error::Bus`] if the bus cannot be opened.
pub fn run_scanner<P, W>(
    provider: &mut P,
    config: &Config,
    out: &mut W,
) -> Result<AddressSet, Error<BusError<P::Bus>>>
where
    P: BusProvider,
    W: Write,
{
    let mut bus = BusHandle::open(provider, config.bus_settings())?;
    Ok(scan_report(&mut bus, out))
}

/// Open the bus described by `config` and probe `address` once
///
/// # Errors
///
/// Returns [`Error::Bus`] if the bus cannot be opened. A missing acknowledge
/// is a result, not an error.
pub fn run_probe<P, D, W>(
    provider: &mut P,
    config: &Config,
    address: u8,
    delay: &mut D,
    out: &mut W,
) -> Result<bool, Error<BusError<P::Bus>>>
where
    P: BusProvider,
    D: DelayNs,
    W: Write,
{
    let mut bus = BusHandle::open(provider, config.bus_settings())?;
    Ok(probe_report(&mut bus, address, delay, out))
}

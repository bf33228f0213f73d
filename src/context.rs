//! Device context
//!
//! [`DeviceContext`] bundles everything an operator action needs: the bus
//! provider, the configuration, the selected display address and the display
//! driver, which in turn owns the bus handle.
//!
//! The bus peripheral is opened once, in [`DeviceContext::start`].
//! [`DeviceContext::reconfigure`] changes its frequency in place and puts the
//! previous frequency back when the display does not come up at the new one.

use embedded_hal::delay::DelayNs;

use crate::bus::{self, BusError, BusHandle, BusProvider};
use crate::config::{Config, Geometry, MIN_FREQUENCY_HZ};
use crate::display::Display;
use crate::error::{Error, InputError};
use crate::interface::I2cInterface;

/// Bus handle type opened by provider `P`
pub type Bus<P> = BusHandle<<P as BusProvider>::Bus>;

/// Display driver bound to a bus opened by provider `P`
pub type BenchDisplay<P> = Display<I2cInterface<Bus<P>>>;

/// Error type of context operations for provider `P`
pub type ContextError<P> = Error<BusError<<P as BusProvider>::Bus>>;

/// Bus, address and display in use by the bench
pub struct DeviceContext<P: BusProvider> {
    provider: P,
    config: Config,
    address: u8,
    display: BenchDisplay<P>,
}

impl<P: BusProvider> DeviceContext<P> {
    /// Open the bus, find the display and bring it up
    ///
    /// Steps, each fatal on failure: open the bus described by `config`, scan
    /// it and select the display address, then detect the geometry (128x32
    /// first, 128x64 second).
    ///
    /// # Errors
    ///
    /// [`Error::NoDevices`] when the scan is empty, [`Error::Bus`] when the bus
    /// cannot be opened or neither geometry initialises.
    pub fn start<D: DelayNs>(
        mut provider: P,
        config: Config,
        delay: &mut D,
    ) -> Result<Self, ContextError<P>> {
        let mut bus = BusHandle::open(&mut provider, config.bus_settings())?;
        let address = bus::discover(&mut bus)?;
        let interface = I2cInterface::new(bus, address, config.writer());
        let display = Display::detect(interface, delay)?;

        Ok(Self {
            provider,
            config,
            address,
            display,
        })
    }

    /// Switch the bus to `frequency_hz`
    ///
    /// Re-applies the bus settings at the new frequency, then re-initialises
    /// the display at the current address (current geometry first, then the
    /// other one). When the display does not come up, the previous frequency
    /// is applied again.
    ///
    /// # Errors
    ///
    /// [`Error::Input`] below [`MIN_FREQUENCY_HZ`], before any bus activity.
    /// Otherwise the error of applying the settings or of the last display
    /// attempt. Address, geometry and frequency are unchanged in every error
    /// case unless restoring the previous frequency fails too, which is
    /// logged. A rejected display attempt may have sent part of an
    /// initialisation sequence.
    pub fn reconfigure<D: DelayNs>(
        &mut self,
        frequency_hz: u32,
        delay: &mut D,
    ) -> Result<(), ContextError<P>> {
        if frequency_hz < MIN_FREQUENCY_HZ {
            return Err(InputError::OutOfRange {
                value: i64::from(frequency_hz),
                min: i64::from(MIN_FREQUENCY_HZ),
                max: i64::from(u32::MAX),
            }
            .into());
        }

        let previous = self.frequency_hz();
        let geometry = self.geometry();
        self.display
            .interface_mut()
            .bus_mut()
            .reconfigure(&mut self.provider, frequency_hz)?;

        if let Err(e) = self.display.redetect(geometry, delay) {
            log::warn!("display rebind at {} Hz failed: {}", frequency_hz, e);
            if let Err(revert) = self
                .display
                .interface_mut()
                .bus_mut()
                .reconfigure(&mut self.provider, previous)
            {
                log::warn!("could not restore {} Hz: {}", previous, revert);
            }
            return Err(e);
        }

        self.config.frequency_hz = frequency_hz;
        log::info!(
            "I2C frequency now {} Hz, display {}",
            frequency_hz,
            self.geometry()
        );
        Ok(())
    }

    /// Selected display address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Frequency the current bus handle runs at
    pub fn frequency_hz(&self) -> u32 {
        self.display.interface().bus().frequency_hz()
    }

    /// Geometry the display was accepted at
    pub fn geometry(&self) -> Geometry {
        self.display.geometry()
    }

    /// Configuration the bench started with, at the current frequency
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Bus provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Display driver
    pub fn display_mut(&mut self) -> &mut BenchDisplay<P> {
        &mut self.display
    }

    /// The bus handle, for transactions that bypass the display driver
    pub fn bus_mut(&mut self) -> &mut Bus<P> {
        self.display.interface_mut().bus_mut()
    }
}

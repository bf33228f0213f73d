//! Two-wire bus transport
//!
//! This module wraps an [`embedded_hal::i2c::I2c`] peripheral in a
//! [`BusHandle`] that remembers the settings it was opened with, and provides
//! address discovery on top of it.
//!
//! The peripheral is opened once through the firmware's [`BusProvider`].
//! Changing the clock frequency re-applies settings to that same peripheral,
//! since HALs hand out each I2C instance only once.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ssd1306_bench::bus::{self, BusHandle, BusProvider, BusSettings};
//! use embedded_hal::i2c::{ErrorType, I2c, Operation};
//! # use core::convert::Infallible;
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
//! # let mut board = Board;
//! let settings = ssd1306_bench::Config::default().bus_settings();
//! let mut bus = match BusHandle::open(&mut board, settings) {
//!     Ok(bus) => bus,
//!     Err(_) => return,
//! };
//! let found = bus.scan();
//! let _target = bus::select_target(&found);
//! ```

use embedded_hal::i2c::{ErrorType, I2c, Operation, SevenBitAddress};

use crate::error::Error;

/// First address probed by [`BusHandle::scan`]
///
/// Addresses below are reserved by the I2C specification.
pub const FIRST_SCAN_ADDRESS: u8 = 0x08;

/// Last address probed by [`BusHandle::scan`]
///
/// Addresses above are reserved by the I2C specification.
pub const LAST_SCAN_ADDRESS: u8 = 0x77;

/// Addresses preferred for the display, in order
pub const PREFERRED_ADDRESSES: [u8; 2] = [0x3C, 0x3D];

/// Error type of a bus
pub type BusError<B> = <B as ErrorType>::Error;

/// Settings a bus handle is opened with
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusSettings {
    /// Bus instance identifier
    pub bus_id: u8,
    /// Clock line pin
    pub scl_pin: u8,
    /// Data line pin
    pub sda_pin: u8,
    /// Bus clock frequency in Hz
    pub frequency_hz: u32,
}

impl BusSettings {
    /// Same bus and pins at another clock frequency
    pub fn with_frequency(self, frequency_hz: u32) -> Self {
        Self {
            frequency_hz,
            ..self
        }
    }
}

/// Source of the I2C peripheral, implemented by the board firmware
///
/// The peripheral is a singleton: `open` is called once per program and the
/// bus stays owned by the bench from then on. Later changes go through
/// [`apply`](Self::apply) on the bus already handed out.
pub trait BusProvider {
    /// Concrete I2C peripheral type
    type Bus: I2c;

    /// Bring up the bus described by `settings`
    fn open(&mut self, settings: &BusSettings) -> Result<Self::Bus, BusError<Self::Bus>>;

    /// Re-apply `settings` to an opened bus, e.g. a new clock frequency
    ///
    /// On error the bus must still be usable at its previous settings.
    fn apply(
        &mut self,
        bus: &mut Self::Bus,
        settings: &BusSettings,
    ) -> Result<(), BusError<Self::Bus>>;
}

/// A set of 7-bit addresses
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AddressSet(u128);

impl AddressSet {
    /// Empty set
    pub fn new() -> Self {
        Self(0)
    }

    /// Add an address; values above 0x7F are ignored
    pub fn insert(&mut self, address: u8) {
        if address < 0x80 {
            self.0 |= 1u128 << address;
        }
    }

    /// Whether `address` is in the set
    pub fn contains(&self, address: u8) -> bool {
        address < 0x80 && self.0 & (1u128 << address) != 0
    }

    /// Number of addresses in the set
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Lowest address in the set
    pub fn first(&self) -> Option<u8> {
        if self.is_empty() {
            None
        } else {
            Some(self.0.trailing_zeros() as u8)
        }
    }

    /// Addresses in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..0x80u8).filter(|address| self.contains(*address))
    }
}

impl FromIterator<u8> for AddressSet {
    fn from_iter<T: IntoIterator<Item = u8>>(iter: T) -> Self {
        let mut set = Self::new();
        for address in iter {
            set.insert(address);
        }
        set
    }
}

/// Pick the display address from a scan result
///
/// Prefers 0x3C, then 0x3D, then the lowest address found.
pub fn select_target(found: &AddressSet) -> Option<u8> {
    PREFERRED_ADDRESSES
        .iter()
        .copied()
        .find(|address| found.contains(*address))
        .or_else(|| found.first())
}

/// Scan the bus and select the display address
///
/// # Errors
///
/// Returns [`Error::NoDevices`] if nothing acknowledges.
pub fn discover<I2C: I2c>(bus: &mut BusHandle<I2C>) -> Result<u8, Error<I2C::Error>> {
    let found = bus.scan();
    log::info!("I2C scan found {} device(s)", found.len());
    for address in found.iter() {
        log::info!("  {:#04x}", address);
    }
    let target = select_target(&found).ok_or(Error::NoDevices)?;
    log::info!("using OLED at {:#04x}", target);
    Ok(target)
}

/// An opened I2C bus together with the settings it runs at
pub struct BusHandle<I2C> {
    i2c: I2C,
    settings: BusSettings,
}

impl<I2C: I2c> BusHandle<I2C> {
    /// Wrap an already configured peripheral
    pub fn new(i2c: I2C, settings: BusSettings) -> Self {
        Self { i2c, settings }
    }

    /// Open a bus through the provider
    pub fn open<P>(provider: &mut P, settings: BusSettings) -> Result<Self, Error<I2C::Error>>
    where
        P: BusProvider<Bus = I2C>,
    {
        let i2c = provider.open(&settings).map_err(Error::Bus)?;
        log::info!(
            "I2C{} up on SCL={} SDA={} at {} Hz",
            settings.bus_id,
            settings.scl_pin,
            settings.sda_pin,
            settings.frequency_hz
        );
        Ok(Self { i2c, settings })
    }

    /// Switch this bus to another clock frequency
    ///
    /// The provider re-applies the settings to the peripheral in place. On
    /// error the handle keeps its previous settings.
    pub fn reconfigure<P>(
        &mut self,
        provider: &mut P,
        frequency_hz: u32,
    ) -> Result<(), Error<I2C::Error>>
    where
        P: BusProvider<Bus = I2C>,
    {
        let settings = self.settings.with_frequency(frequency_hz);
        provider.apply(&mut self.i2c, &settings).map_err(Error::Bus)?;
        log::info!(
            "I2C{} reconfigured from {} Hz to {} Hz",
            settings.bus_id,
            self.settings.frequency_hz,
            settings.frequency_hz
        );
        self.settings = settings;
        Ok(())
    }

    /// Settings this handle was opened with
    pub fn settings(&self) -> &BusSettings {
        &self.settings
    }

    /// Bus clock frequency in Hz
    pub fn frequency_hz(&self) -> u32 {
        self.settings.frequency_hz
    }

    /// Probe every non-reserved address and collect those that acknowledge
    pub fn scan(&mut self) -> AddressSet {
        (FIRST_SCAN_ADDRESS..=LAST_SCAN_ADDRESS)
            .filter(|address| self.probe(*address).is_ok())
            .collect()
    }

    /// Address-only transaction: START, address + W, STOP
    pub fn probe(&mut self, address: u8) -> Result<(), I2C::Error> {
        self.i2c.write(address, &[])
    }

    /// Release the underlying peripheral
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> ErrorType for BusHandle<I2C> {
    type Error = I2C::Error;
}

impl<I2C: I2c> I2c<SevenBitAddress> for BusHandle<I2C> {
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.i2c.transaction(address, operations)
    }

    fn write(&mut self, address: SevenBitAddress, write: &[u8]) -> Result<(), Self::Error> {
        self.i2c.write(address, write)
    }
}

//! Bench configuration types and builder

pub use crate::error::BuilderError;
use crate::bus::BusSettings;
use crate::interface::ChunkedWriter;

/// Default bus clock frequency, slow enough to read comfortably on a logic analyser
pub const DEFAULT_FREQUENCY_HZ: u32 = 50_000;

/// Lowest accepted bus clock frequency
pub const MIN_FREQUENCY_HZ: u32 = 1_000;

/// Default number of display data bytes per I2C transaction
pub const DEFAULT_CHUNK_SIZE: usize = 16;

/// Largest supported number of display data bytes per I2C transaction
///
/// One full page row of a 128 pixel wide panel.
pub const MAX_CHUNK_SIZE: usize = 128;

/// Frequency used by the diagnostic programs
pub const DIAGNOSTIC_FREQUENCY_HZ: u32 = 100_000;

/// Supported panel geometries
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Geometry {
    /// 128 columns, 32 rows (4 pages)
    W128xH32,
    /// 128 columns, 64 rows (8 pages)
    W128xH64,
}

impl Geometry {
    /// Width in pixels
    pub fn width(self) -> u32 {
        128
    }

    /// Height in pixels
    pub fn height(self) -> u32 {
        match self {
            Self::W128xH32 => 32,
            Self::W128xH64 => 64,
        }
    }

    /// Number of 8-row pages
    pub fn pages(self) -> u32 {
        self.height() / 8
    }

    /// Frame buffer size in bytes
    pub fn buffer_size(self) -> usize {
        (self.width() * self.height() / 8) as usize
    }

    /// Argument of the multiplex ratio command (rows - 1)
    pub fn multiplex_ratio(self) -> u8 {
        (self.height() - 1) as u8
    }

    /// Argument of the COM pins configuration command
    pub fn com_pins(self) -> u8 {
        match self {
            Self::W128xH32 => 0x02,
            Self::W128xH64 => 0x12,
        }
    }

    /// The other supported geometry, tried when this one is rejected
    pub fn alternate(self) -> Self {
        match self {
            Self::W128xH32 => Self::W128xH64,
            Self::W128xH64 => Self::W128xH32,
        }
    }
}

impl core::fmt::Display for Geometry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}x{}", self.width(), self.height())
    }
}

/// Bench configuration
///
/// All values are fixed at startup. Use [`Builder`] to create a Config.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Bus instance identifier
    pub bus_id: u8,
    /// Clock line pin
    pub scl_pin: u8,
    /// Data line pin
    pub sda_pin: u8,
    /// Bus clock frequency in Hz
    pub frequency_hz: u32,
    /// Display data bytes per I2C transaction
    pub chunk_size: usize,
    /// Pause between chunk transactions in microseconds
    pub pause_us: u32,
}

impl Config {
    /// Settings for opening the bus described by this configuration
    pub fn bus_settings(&self) -> BusSettings {
        BusSettings {
            bus_id: self.bus_id,
            scl_pin: self.scl_pin,
            sda_pin: self.sda_pin,
            frequency_hz: self.frequency_hz,
        }
    }

    /// Chunked writer for this configuration
    ///
    /// A chunk size set directly on the struct outside `1..=MAX_CHUNK_SIZE`
    /// is clamped into that range; [`Builder::build`] rejects it instead.
    pub fn writer(&self) -> ChunkedWriter {
        ChunkedWriter {
            chunk_size: self.chunk_size.clamp(1, MAX_CHUNK_SIZE),
            pause_us: self.pause_us,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bus_id: 0,
            scl_pin: 13,
            sda_pin: 12,
            frequency_hz: DEFAULT_FREQUENCY_HZ,
            chunk_size: DEFAULT_CHUNK_SIZE,
            pause_us: 0,
        }
    }
}

/// Builder for constructing bench configuration
///
/// # Example
///
/// ```
/// use ssd1306_bench::Builder;
///
/// let config = match Builder::new().frequency_hz(400_000).chunk_size(32).build() {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert_eq!(config.chunk_size, 32);
/// assert_eq!(config.pause_us, 0);
/// ```
#[must_use]
#[derive(Default)]
pub struct Builder {
    config: Config,
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a Builder preset for the diagnostic programs
    ///
    /// Bus 1 on SCL 15 / SDA 14 at 100 kHz.
    pub fn diagnostics() -> Self {
        Self::new()
            .bus_id(1)
            .scl_pin(15)
            .sda_pin(14)
            .frequency_hz(DIAGNOSTIC_FREQUENCY_HZ)
    }

    /// Set the bus instance identifier
    pub fn bus_id(mut self, value: u8) -> Self {
        self.config.bus_id = value;
        self
    }

    /// Set the clock line pin
    pub fn scl_pin(mut self, value: u8) -> Self {
        self.config.scl_pin = value;
        self
    }

    /// Set the data line pin
    pub fn sda_pin(mut self, value: u8) -> Self {
        self.config.sda_pin = value;
        self
    }

    /// Set the bus clock frequency in Hz
    pub fn frequency_hz(mut self, value: u32) -> Self {
        self.config.frequency_hz = value;
        self
    }

    /// Set the number of display data bytes per transaction
    pub fn chunk_size(mut self, value: usize) -> Self {
        self.config.chunk_size = value;
        self
    }

    /// Set the pause between chunk transactions in microseconds
    ///
    /// Values around 50 help marginal wiring; 0 disables the pause.
    pub fn pause_us(mut self, value: u32) -> Self {
        self.config.pause_us = value;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidFrequency` below [`MIN_FREQUENCY_HZ`] and
    /// `BuilderError::InvalidChunkSize` outside `1..=MAX_CHUNK_SIZE`.
    pub fn build(self) -> Result<Config, BuilderError> {
        if self.config.frequency_hz < MIN_FREQUENCY_HZ {
            return Err(BuilderError::InvalidFrequency(self.config.frequency_hz));
        }
        ChunkedWriter::new(self.config.chunk_size, self.config.pause_us)?;
        Ok(self.config)
    }
}

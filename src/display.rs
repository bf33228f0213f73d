//! Core display operations

use embedded_hal::delay::DelayNs;

use crate::color::Color;
use crate::command::{
    DISPLAY_OFF, DISPLAY_ON, ENTIRE_DISPLAY_RESUME, INVERT_DISPLAY, MEMORY_MODE_HORIZONTAL,
    NORMAL_DISPLAY, SET_CHARGE_PUMP, SET_CLOCK_DIVIDE, SET_COLUMN_ADDRESS, SET_COM_PINS,
    SET_COM_SCAN_DIRECTION, SET_CONTRAST, SET_DISPLAY_OFFSET, SET_MEMORY_MODE,
    SET_MULTIPLEX_RATIO, SET_PAGE_ADDRESS, SET_PRECHARGE, SET_SEGMENT_REMAP, SET_START_LINE,
    SET_VCOM_DESELECT,
};
use crate::config::Geometry;
use crate::error::{Error, InputError};
use crate::interface::DisplayInterface;

/// Largest frame buffer of any supported geometry (128x64)
pub const MAX_BUFFER_SIZE: usize = 128 * 64 / 8;

type DisplayResult<I> = core::result::Result<(), Error<<I as DisplayInterface>::Error>>;

/// A failed connection attempt hands the interface back with the error
type ConnectResult<I> =
    core::result::Result<Display<I>, (I, Error<<I as DisplayInterface>::Error>)>;

/// Core display driver for SSD1306
///
/// Owns the frame buffer. Drawing only touches the buffer; [`show`](Self::show)
/// is the operation that sends it to the controller. Drawing primitives live in
/// the [`graphics`](crate::graphics) module.
pub struct Display<I>
where
    I: DisplayInterface,
{
    /// Hardware interface
    interface: I,
    /// Panel geometry, changed only by a successful re-detection
    geometry: Geometry,
    /// Frame buffer, only the first `geometry.buffer_size()` bytes are used
    buffer: [u8; MAX_BUFFER_SIZE],
}

impl<I> Display<I>
where
    I: DisplayInterface,
{
    /// Create a new Display instance
    ///
    /// No bus traffic is generated; call [`init`](Self::init) or use
    /// [`connect`](Self::connect) to bring the controller up.
    pub fn new(interface: I, geometry: Geometry) -> Self {
        Self {
            interface,
            geometry,
            buffer: [0; MAX_BUFFER_SIZE],
        }
    }

    /// Create a display at `geometry` and initialise the controller
    ///
    /// # Errors
    ///
    /// On failure the interface is handed back together with the error so the
    /// caller can try again, e.g. at another geometry.
    pub fn connect<D: DelayNs>(
        interface: I,
        geometry: Geometry,
        delay: &mut D,
    ) -> ConnectResult<I> {
        let mut display = Self::new(interface, geometry);
        match display.init(delay) {
            Ok(()) => {
                log::info!("display initialised at {}", geometry);
                Ok(display)
            }
            Err(e) => Err((display.release(), e)),
        }
    }

    /// Bring up the display, trying 128x32 first and 128x64 second
    ///
    /// Both attempts use the same interface and address. Acceptance only means
    /// the controller acknowledged the initialisation sequence; the SSD1306
    /// does not report its panel size.
    ///
    /// An attempt rejected after its probe leaves the commands already sent in
    /// effect on the controller, e.g. a 128x32 multiplex ratio. The next attempt
    /// starts again from display off and sends its whole sequence.
    ///
    /// # Errors
    ///
    /// Returns the error of the 128x64 attempt when both fail.
    pub fn detect<D: DelayNs>(interface: I, delay: &mut D) -> Result<Self, Error<I::Error>> {
        Self::reconnect(interface, Geometry::W128xH32, delay)
    }

    /// Bring up the display at `preferred`, falling back to the other geometry
    ///
    /// # Errors
    ///
    /// Returns the error of the fallback attempt when both fail.
    pub fn reconnect<D: DelayNs>(
        interface: I,
        preferred: Geometry,
        delay: &mut D,
    ) -> Result<Self, Error<I::Error>> {
        match Self::connect(interface, preferred, delay) {
            Ok(display) => Ok(display),
            Err((interface, e)) => {
                log::warn!(
                    "{} init failed ({}), trying {}",
                    preferred,
                    e,
                    preferred.alternate()
                );
                Self::connect(interface, preferred.alternate(), delay).map_err(|(_, e)| e)
            }
        }
    }

    /// Re-initialise this display at `preferred`, falling back to the other geometry
    ///
    /// Used after the bus underneath has changed. The frame buffer is cleared.
    /// A partly rejected attempt leaves its commands in effect, as with
    /// [`detect`](Self::detect).
    ///
    /// # Errors
    ///
    /// Returns the error of the fallback attempt when both fail. The geometry
    /// is then the one from before the call.
    pub fn redetect<D: DelayNs>(
        &mut self,
        preferred: Geometry,
        delay: &mut D,
    ) -> DisplayResult<I> {
        let previous = self.geometry;

        self.geometry = preferred;
        let Err(e) = self.init(delay) else {
            return Ok(());
        };
        log::warn!(
            "{} init failed ({}), trying {}",
            preferred,
            e,
            preferred.alternate()
        );

        self.geometry = preferred.alternate();
        if let Err(e) = self.init(delay) {
            self.geometry = previous;
            return Err(e);
        }
        log::info!("display initialised at {}", self.geometry);
        Ok(())
    }

    /// Initialise the controller for this geometry, clear the panel and turn it on
    ///
    /// An address-only probe goes first, so an absent controller fails the
    /// attempt before any command is sent.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.interface.probe().map_err(Error::Bus)?;

        for byte in self.init_sequence() {
            self.send_command(byte)?;
        }

        self.fill(Color::Off);
        self.show(delay)
    }

    /// Command bytes of the initialisation sequence, arguments included
    fn init_sequence(&self) -> [u8; 25] {
        [
            DISPLAY_OFF,
            // Horizontal addressing, so a flush is one linear write
            SET_MEMORY_MODE,
            MEMORY_MODE_HORIZONTAL,
            SET_START_LINE,
            // Column 127 mapped to SEG0
            SET_SEGMENT_REMAP | 0x01,
            SET_MULTIPLEX_RATIO,
            self.geometry.multiplex_ratio(),
            // Scan from COM[N-1] to COM0
            SET_COM_SCAN_DIRECTION | 0x08,
            SET_DISPLAY_OFFSET,
            0x00,
            SET_COM_PINS,
            self.geometry.com_pins(),
            SET_CLOCK_DIVIDE,
            0x80,
            SET_PRECHARGE,
            0xF1,
            SET_VCOM_DESELECT,
            0x30,
            SET_CONTRAST,
            0xFF,
            ENTIRE_DISPLAY_RESUME,
            NORMAL_DISPLAY,
            // Internal charge pump, no external VCC
            SET_CHARGE_PUMP,
            0x14,
            DISPLAY_ON,
        ]
    }

    /// Set every pixel of the buffer to `color`
    ///
    /// No bus traffic.
    pub fn fill(&mut self, color: Color) {
        let size = self.geometry.buffer_size();
        self.buffer[..size].fill(color.fill_byte());
    }

    /// Send the whole frame buffer to the controller
    ///
    /// Sets the column and page windows to the full panel, then hands the
    /// buffer to the interface, which splits it into chunked transactions.
    ///
    /// # Errors
    ///
    /// Returns the first failed transaction. A frame that fails midway is left
    /// partially written on the panel.
    pub fn show<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        let last_column = (self.geometry.width() - 1) as u8;
        let last_page = (self.geometry.pages() - 1) as u8;
        for byte in [
            SET_COLUMN_ADDRESS,
            0,
            last_column,
            SET_PAGE_ADDRESS,
            0,
            last_page,
        ] {
            self.send_command(byte)?;
        }

        let size = self.geometry.buffer_size();
        self.interface
            .send_data(&self.buffer[..size], delay)
            .map_err(Error::Bus)
    }

    /// Turn the panel on (0xAF)
    pub fn power_on(&mut self) -> DisplayResult<I> {
        self.send_command(DISPLAY_ON)
    }

    /// Turn the panel off (0xAE); display RAM is kept
    pub fn power_off(&mut self) -> DisplayResult<I> {
        self.send_command(DISPLAY_OFF)
    }

    /// Set the contrast level
    ///
    /// Sends 0x81 followed by `value` as a second command byte.
    ///
    /// # Errors
    ///
    /// Returns `Error::Input` without any bus traffic if `value` is outside 0..=255.
    pub fn set_contrast(&mut self, value: i32) -> DisplayResult<I> {
        let level = u8::try_from(value).map_err(|_| InputError::OutOfRange {
            value: i64::from(value),
            min: 0,
            max: 255,
        })?;
        self.send_command(SET_CONTRAST)?;
        self.send_command(level)
    }

    /// Invert the panel (0xA7) or return it to normal (0xA6)
    pub fn set_invert(&mut self, on: bool) -> DisplayResult<I> {
        self.send_command(if on { INVERT_DISPLAY } else { NORMAL_DISPLAY })
    }

    /// Send a command to the display controller
    fn send_command(&mut self, cmd: u8) -> DisplayResult<I> {
        self.interface.send_command(cmd).map_err(Error::Bus)
    }

    /// Get the panel geometry
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// The frame buffer in controller byte order
    pub fn buffer(&self) -> &[u8] {
        &self.buffer[..self.geometry.buffer_size()]
    }

    pub(crate) fn buffer_mut(&mut self) -> &mut [u8] {
        let size = self.geometry.buffer_size();
        &mut self.buffer[..size]
    }

    /// Access the underlying interface
    pub fn interface(&self) -> &I {
        &self.interface
    }

    /// Mutable access to the underlying interface
    pub fn interface_mut(&mut self) -> &mut I {
        &mut self.interface
    }

    /// Release the underlying interface
    pub fn release(self) -> I {
        self.interface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::{ChunkedWriter, I2cInterface};
    use crate::testing::{MockBus, MockDelay, MockError};
    use alloc::vec;
    use alloc::vec::Vec;

    #[derive(Debug, Default)]
    struct MockInterface {
        commands: Vec<u8>,
        data: Vec<Vec<u8>>,
        probes: usize,
        absent: bool,
    }

    impl DisplayInterface for MockInterface {
        type Error = MockError;

        fn send_command(&mut self, command: u8) -> Result<(), Self::Error> {
            if self.absent {
                return Err(MockError::Nack);
            }
            self.commands.push(command);
            Ok(())
        }

        fn send_data<D: DelayNs>(&mut self, data: &[u8], _delay: &mut D) -> Result<(), Self::Error> {
            if self.absent {
                return Err(MockError::Nack);
            }
            self.data.push(data.to_vec());
            Ok(())
        }

        fn probe(&mut self) -> Result<(), Self::Error> {
            self.probes += 1;
            if self.absent {
                Err(MockError::Nack)
            } else {
                Ok(())
            }
        }
    }

    fn i2c_display(bus: &MockBus, geometry: Geometry) -> Display<I2cInterface<MockBus>> {
        Display::new(
            I2cInterface::new(bus.clone(), 0x3C, ChunkedWriter::default()),
            geometry,
        )
    }

    fn command(byte: u8) -> (u8, Vec<u8>) {
        (0x3C, vec![0x80, byte])
    }

    #[test]
    fn test_new_sends_nothing() {
        let bus = MockBus::with_devices(&[0x3C]);
        let display = i2c_display(&bus, Geometry::W128xH32);
        assert!(bus.writes().is_empty());
        assert_eq!(display.buffer().len(), 512);
    }

    #[test]
    fn test_init_sequence_128x32() {
        let mut display = Display::new(MockInterface::default(), Geometry::W128xH32);
        let mut delay = MockDelay::new();
        display.init(&mut delay).unwrap();

        let interface = display.release();
        assert_eq!(interface.probes, 1);
        assert_eq!(
            interface.commands,
            [
                0xAE, 0x20, 0x00, 0x40, 0xA1, 0xA8, 0x1F, 0xC8, 0xD3, 0x00, 0xDA, 0x02, 0xD5,
                0x80, 0xD9, 0xF1, 0xDB, 0x30, 0x81, 0xFF, 0xA4, 0xA6, 0x8D, 0x14, 0xAF, // init
                0x21, 0x00, 0x7F, 0x22, 0x00, 0x03, // show windows
            ]
        );
        assert_eq!(interface.data, [vec![0u8; 512]]);
    }

    #[test]
    fn test_init_sequence_128x64_parameters() {
        let mut display = Display::new(MockInterface::default(), Geometry::W128xH64);
        let mut delay = MockDelay::new();
        display.init(&mut delay).unwrap();

        let interface = display.release();
        assert_eq!(interface.commands[5..7], [0xA8, 0x3F]);
        assert_eq!(interface.commands[10..12], [0xDA, 0x12]);
        assert_eq!(interface.commands[interface.commands.len() - 1], 0x07);
        assert_eq!(interface.data[0].len(), 1024);
    }

    #[test]
    fn test_show_sends_whole_buffer_in_chunks() {
        let bus = MockBus::with_devices(&[0x3C]);
        let mut display = i2c_display(&bus, Geometry::W128xH32);
        let mut delay = MockDelay::new();
        display.fill(Color::On);
        display.show(&mut delay).unwrap();

        let writes = bus.writes();
        assert_eq!(
            writes[..6],
            [
                command(0x21),
                command(0),
                command(127),
                command(0x22),
                command(0),
                command(3)
            ]
        );
        let data: Vec<_> = writes[6..].iter().collect();
        assert_eq!(data.len(), 512 / 16);
        assert!(data.iter().all(|(_, payload)| payload.len() == 17
            && payload[0] == 0x40
            && payload[1..].iter().all(|b| *b == 0xFF)));
    }

    #[test]
    fn test_fill_touches_only_buffer() {
        let bus = MockBus::with_devices(&[0x3C]);
        let mut display = i2c_display(&bus, Geometry::W128xH64);
        display.fill(Color::On);
        assert!(display.buffer().iter().all(|b| *b == 0xFF));
        display.fill(Color::Off);
        assert!(display.buffer().iter().all(|b| *b == 0x00));
        assert!(bus.writes().is_empty());
    }

    #[test]
    fn test_set_contrast_sends_two_commands() {
        let bus = MockBus::with_devices(&[0x3C]);
        let mut display = i2c_display(&bus, Geometry::W128xH32);
        display.set_contrast(0x7F).unwrap();
        assert_eq!(bus.writes(), [command(0x81), command(0x7F)]);

        bus.clear();
        display.set_contrast(0).unwrap();
        display.set_contrast(255).unwrap();
        assert_eq!(
            bus.writes(),
            [command(0x81), command(0), command(0x81), command(255)]
        );
    }

    #[test]
    fn test_set_contrast_out_of_range_sends_nothing() {
        let bus = MockBus::with_devices(&[0x3C]);
        let mut display = i2c_display(&bus, Geometry::W128xH32);

        let result = display.set_contrast(256);
        assert!(matches!(
            result,
            Err(Error::Input(InputError::OutOfRange { value: 256, .. }))
        ));
        let result = display.set_contrast(-1);
        assert!(matches!(result, Err(Error::Input(_))));
        assert_eq!(bus.attempts(), 0);
    }

    #[test]
    fn test_set_invert() {
        let bus = MockBus::with_devices(&[0x3C]);
        let mut display = i2c_display(&bus, Geometry::W128xH32);
        display.set_invert(true).unwrap();
        display.set_invert(false).unwrap();
        assert_eq!(bus.writes(), [command(0xA7), command(0xA6)]);
    }

    #[test]
    fn test_power_on_off() {
        let bus = MockBus::with_devices(&[0x3C]);
        let mut display = i2c_display(&bus, Geometry::W128xH32);
        display.power_off().unwrap();
        display.power_on().unwrap();
        assert_eq!(bus.writes(), [command(0xAE), command(0xAF)]);
    }

    #[test]
    fn test_command_nack_is_reported() {
        let bus = MockBus::with_devices(&[0x3C]);
        bus.fail_next(1);
        let mut display = i2c_display(&bus, Geometry::W128xH32);
        assert!(matches!(display.power_on(), Err(Error::Bus(MockError::Nack))));
    }

    #[test]
    fn test_detect_prefers_128x32() {
        let bus = MockBus::with_devices(&[0x3C]);
        let mut delay = MockDelay::new();
        let interface = I2cInterface::new(bus.clone(), 0x3C, ChunkedWriter::default());

        let display = Display::detect(interface, &mut delay).unwrap();
        assert_eq!(display.geometry(), Geometry::W128xH32);
        assert!(bus.writes().contains(&command(0x1F)));
    }

    #[test]
    fn test_detect_falls_back_to_128x64_without_traffic_from_failed_attempt() {
        let bus = MockBus::with_devices(&[0x3C]);
        bus.fail_next(1);
        let mut delay = MockDelay::new();
        let interface = I2cInterface::new(bus.clone(), 0x3C, ChunkedWriter::default());

        let display = Display::detect(interface, &mut delay).unwrap();
        assert_eq!(display.geometry(), Geometry::W128xH64);
        assert_eq!(display.interface().address(), 0x3C);

        let writes = bus.writes();
        // first acknowledged transaction is the 128x64 probe, then its init
        assert_eq!(writes[0], (0x3C, Vec::new()));
        assert_eq!(writes[1], command(0xAE));
        assert!(writes.contains(&command(0x3F)));
        assert!(!writes.contains(&command(0x1F)));
        assert!(writes.iter().all(|(address, _)| *address == 0x3C));
    }

    #[test]
    fn test_detect_falls_back_when_init_is_rejected() {
        let bus = MockBus::with_devices(&[0x3C]);
        bus.nack_payload(&[0x80, 0x1F]);
        let mut delay = MockDelay::new();
        let interface = I2cInterface::new(bus.clone(), 0x3C, ChunkedWriter::default());

        let display = Display::detect(interface, &mut delay).unwrap();
        assert_eq!(display.geometry(), Geometry::W128xH64);

        // the rejected attempt got as far as the multiplex command
        let writes = bus.writes();
        let second_start = writes
            .iter()
            .rposition(|write| *write == command(0xAE))
            .unwrap();
        assert!(writes[..second_start].contains(&command(0xA8)));
        assert!(!writes[..second_start].contains(&command(0xAF)));
        assert!(writes[second_start..].contains(&command(0x3F)));
    }

    #[test]
    fn test_detect_fails_when_both_geometries_fail() {
        let mut delay = MockDelay::new();
        let interface = MockInterface {
            absent: true,
            ..MockInterface::default()
        };

        let result = Display::detect(interface, &mut delay);
        assert!(matches!(result, Err(Error::Bus(MockError::Nack))));
    }

    #[test]
    fn test_reconnect_tries_preferred_first() {
        let bus = MockBus::with_devices(&[0x3C]);
        let mut delay = MockDelay::new();
        let interface = I2cInterface::new(bus.clone(), 0x3C, ChunkedWriter::default());

        let display = Display::reconnect(interface, Geometry::W128xH64, &mut delay).unwrap();
        assert_eq!(display.geometry(), Geometry::W128xH64);
        assert!(!bus.writes().contains(&command(0x1F)));
    }

    #[test]
    fn test_redetect_keeps_working_geometry() {
        let bus = MockBus::with_devices(&[0x3C]);
        let mut display = i2c_display(&bus, Geometry::W128xH64);
        let mut delay = MockDelay::new();
        display.fill(Color::On);

        display.redetect(Geometry::W128xH64, &mut delay).unwrap();
        assert_eq!(display.geometry(), Geometry::W128xH64);
        assert!(display.buffer().iter().all(|b| *b == 0x00));
        assert!(bus.writes().contains(&command(0x3F)));
    }

    #[test]
    fn test_redetect_falls_back_to_other_geometry() {
        let bus = MockBus::with_devices(&[0x3C]);
        bus.nack_payload(&[0x80, 0x3F]);
        let mut display = i2c_display(&bus, Geometry::W128xH64);
        let mut delay = MockDelay::new();

        display.redetect(Geometry::W128xH64, &mut delay).unwrap();
        assert_eq!(display.geometry(), Geometry::W128xH32);
        assert_eq!(display.buffer().len(), 512);
    }

    #[test]
    fn test_failed_redetect_restores_geometry() {
        let mut display = Display::new(MockInterface::default(), Geometry::W128xH64);
        display.interface_mut().absent = true;
        let mut delay = MockDelay::new();

        let result = display.redetect(Geometry::W128xH64, &mut delay);
        assert!(matches!(result, Err(Error::Bus(MockError::Nack))));
        assert_eq!(display.geometry(), Geometry::W128xH64);
        assert_eq!(display.interface().probes, 2);
    }
}

//! Menu actions
//!
//! [`Bench`] carries out the menu [`Action`]s against a [`DeviceContext`].
//! Prompts and results go to the console; validation failures and bus errors
//! are returned so the dispatcher reports them.

use core::fmt::Write;
use embedded_hal::delay::DelayNs;
use heapless::String;

use crate::bus::BusProvider;
use crate::color::Color;
use crate::command::{DISPLAY_OFF, DISPLAY_ON};
use crate::config::Config;
use crate::context::{ContextError, DeviceContext};
use crate::error::Error;
use crate::input::{parse_frequency, parse_hex_byte, parse_int};
use crate::menu::{Action, Console, Handler, LINE_CAPACITY, Status, prompt};
use crate::raw;

/// Frames drawn by the animation, about three seconds
pub const ANIMATION_FRAMES: u32 = 25;

/// Time between animation frames
pub const FRAME_MS: u32 = 120;

/// Horizontal step of the animated block per frame
const ANIMATION_STEP: i32 = 6;

/// Menu action handler over a device context
pub struct Bench<P: BusProvider, D: DelayNs> {
    context: DeviceContext<P>,
    delay: D,
}

impl<P, D> Bench<P, D>
where
    P: BusProvider,
    D: DelayNs,
{
    /// Wrap an already started context
    pub fn new(context: DeviceContext<P>, delay: D) -> Self {
        Self { context, delay }
    }

    /// Start a context from `config` and wrap it
    ///
    /// # Errors
    ///
    /// See [`DeviceContext::start`].
    pub fn start(provider: P, config: Config, mut delay: D) -> Result<Self, ContextError<P>> {
        let context = DeviceContext::start(provider, config, &mut delay)?;
        Ok(Self::new(context, delay))
    }

    /// Device context in use
    pub fn context(&self) -> &DeviceContext<P> {
        &self.context
    }

    /// Mutable access to the device context
    pub fn context_mut(&mut self) -> &mut DeviceContext<P> {
        &mut self.context
    }

    /// Release the context and delay
    pub fn release(self) -> (DeviceContext<P>, D) {
        (self.context, self.delay)
    }

    fn send_raw_command(&mut self, command: u8) -> Result<(), ContextError<P>> {
        let address = self.context.address();
        raw::send_command(self.context.bus_mut(), address, command, &mut self.delay)
            .map_err(Error::Bus)
    }

    fn power_off<C: Console>(&mut self, console: &mut C) -> Result<(), ContextError<P>> {
        self.send_raw_command(DISPLAY_OFF)?;
        let _ = writeln!(console, "-> OFF (0xAE)");
        Ok(())
    }

    fn power_on<C: Console>(&mut self, console: &mut C) -> Result<(), ContextError<P>> {
        self.send_raw_command(DISPLAY_ON)?;
        let _ = writeln!(console, "-> ON (0xAF)");
        Ok(())
    }

    fn contrast<C: Console>(&mut self, console: &mut C) -> Result<(), ContextError<P>> {
        let mut buf = [0u8; LINE_CAPACITY];
        let value = parse_int(prompt(console, "Contrast (0-255): ", &mut buf)?, 0, 255)?;
        self.context.display_mut().set_contrast(value as i32)?;
        let _ = writeln!(console, "-> CONTRAST = {value}");
        Ok(())
    }

    fn invert<C: Console>(&mut self, console: &mut C) -> Result<(), ContextError<P>> {
        let mut buf = [0u8; LINE_CAPACITY];
        let value = parse_int(prompt(console, "Invert? 1=ON / 0=OFF: ", &mut buf)?, 0, 1)?;
        self.context.display_mut().set_invert(value == 1)?;
        let _ = writeln!(console, "-> INVERT = {value}");
        Ok(())
    }

    fn clear<C: Console>(&mut self, console: &mut C) -> Result<(), ContextError<P>> {
        let display = self.context.display_mut();
        display.fill(Color::Off);
        display.show(&mut self.delay)?;
        let _ = writeln!(console, "-> CLEAR");
        Ok(())
    }

    fn text_demo<C: Console>(&mut self, console: &mut C) -> Result<(), ContextError<P>> {
        let mut label: String<16> = String::new();
        let _ = write!(label, "Addr {:#04x}", self.context.address());

        let display = self.context.display_mut();
        display.fill(Color::Off);
        display.text("I2C MENU", 0, 0);
        display.text(label.as_str(), 0, 10);
        display.text("Hello OLED!", 0, 22);
        display.show(&mut self.delay)?;
        let _ = writeln!(console, "-> TEXT SENT");
        Ok(())
    }

    fn animation<C: Console>(&mut self, console: &mut C) -> Result<(), ContextError<P>> {
        let _ = writeln!(console, "Animating for 3 s...");
        let geometry = self.context.geometry();
        let width = geometry.width() as i32;
        let y = geometry.height() as i32 - 10;
        let mut x = 0;

        for _ in 0..ANIMATION_FRAMES {
            let display = self.context.display_mut();
            display.fill(Color::Off);
            display.text("ANIM", 0, 0);
            display.fill_rect(x, y, 20, 8, Color::On);
            display.show(&mut self.delay)?;
            x = (x + ANIMATION_STEP) % width;
            self.delay.delay_ms(FRAME_MS);
        }

        let _ = writeln!(console, "-> ANIMATION DONE");
        Ok(())
    }

    fn raw_command<C: Console>(&mut self, console: &mut C) -> Result<(), ContextError<P>> {
        let mut buf = [0u8; LINE_CAPACITY];
        let value = parse_hex_byte(prompt(console, "Command hex (e.g. AE for OFF): ", &mut buf)?)?;
        self.send_raw_command(value)?;
        let _ = writeln!(console, "-> CMD RAW 0x{value:02X}");
        Ok(())
    }

    fn raw_data<C: Console>(&mut self, console: &mut C) -> Result<(), ContextError<P>> {
        let mut buf = [0u8; LINE_CAPACITY];
        let value = parse_hex_byte(prompt(console, "Data hex (e.g. 7E): ", &mut buf)?)?;
        let address = self.context.address();
        raw::send_data(self.context.bus_mut(), address, value, &mut self.delay)
            .map_err(Error::Bus)?;
        let _ = writeln!(console, "-> DATA RAW 0x{value:02X}");
        Ok(())
    }

    fn frequency<C: Console>(&mut self, console: &mut C) -> Result<(), ContextError<P>> {
        let mut buf = [0u8; LINE_CAPACITY];
        let line = prompt(
            console,
            "I2C frequency (Hz, e.g. 50000, 100000, 400000): ",
            &mut buf,
        )?;
        let frequency_hz = parse_frequency(line)?;
        self.context.reconfigure(frequency_hz, &mut self.delay)?;
        let _ = writeln!(console, "-> I2C frequency set to {frequency_hz} Hz");
        Ok(())
    }
}

impl<P, D> Handler for Bench<P, D>
where
    P: BusProvider,
    D: DelayNs,
{
    type Error = ContextError<P>;

    fn status(&self) -> Status {
        Status {
            frequency_hz: self.context.frequency_hz(),
            geometry: self.context.geometry(),
        }
    }

    fn splash<C: Console>(&mut self, console: &mut C) -> Result<(), Self::Error> {
        self.text_demo(console)
    }

    fn invoke<C: Console>(&mut self, action: Action, console: &mut C) -> Result<(), Self::Error> {
        match action {
            Action::PowerOff => self.power_off(console),
            Action::PowerOn => self.power_on(console),
            Action::Contrast => self.contrast(console),
            Action::Invert => self.invert(console),
            Action::Clear => self.clear(console),
            Action::TextDemo => self.text_demo(console),
            Action::Animation => self.animation(console),
            Action::RawCommand => self.raw_command(console),
            Action::RawData => self.raw_data(console),
            Action::Frequency => self.frequency(console),
            Action::Exit => Ok(()),
        }
    }
}

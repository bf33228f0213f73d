//! Interactive menu
//!
//! The menu is a fixed table of single-key entries. [`Dispatcher`] prints the
//! table, reads one line from the [`Console`], and hands the matching
//! [`Action`] to a [`Handler`]. Each action runs at most once per line read.
//!
//! ```text
//! === OLED I2C MENU (freq=50000 Hz, 128x32) ===
//! 1. Power off (0xAE)
//! 2. Power on (0xAF)
//! ...
//! 0. Exit
//! >
//! ```

use core::fmt::Write;

use crate::config::Geometry;
use crate::error::InputError;

/// Longest console line kept; the rest is cut off
pub const LINE_CAPACITY: usize = 64;

/// Operator actions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Display off (0xAE)
    PowerOff,
    /// Display on (0xAF)
    PowerOn,
    /// Prompt for and set the contrast level
    Contrast,
    /// Prompt for and set inverted display
    Invert,
    /// Clear the buffer and show it
    Clear,
    /// Draw the demo text and show it
    TextDemo,
    /// Run the short animation
    Animation,
    /// Prompt for and send one raw command byte
    RawCommand,
    /// Prompt for and send one raw data byte
    RawData,
    /// Prompt for and switch the bus frequency
    Frequency,
    /// Leave the menu
    Exit,
}

/// One line of the menu table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuEntry {
    /// Key the operator types
    pub key: char,
    /// Text shown next to the key
    pub label: &'static str,
    /// Action run for this key
    pub action: Action,
}

const fn entry(key: char, label: &'static str, action: Action) -> MenuEntry {
    MenuEntry { key, label, action }
}

/// The menu, in display order
pub const MENU: [MenuEntry; 11] = [
    entry('1', "Power off (0xAE)", Action::PowerOff),
    entry('2', "Power on (0xAF)", Action::PowerOn),
    entry('3', "Contrast (0-255)", Action::Contrast),
    entry('4', "Invert 1/0", Action::Invert),
    entry('5', "Clear", Action::Clear),
    entry('6', "Text demo", Action::TextDemo),
    entry('7', "Short animation", Action::Animation),
    entry('8', "Send RAW COMMAND", Action::RawCommand),
    entry('9', "Send RAW DATA", Action::RawData),
    entry('F', "Change I2C frequency", Action::Frequency),
    entry('0', "Exit", Action::Exit),
];

/// Find the action for an input line
///
/// The line is trimmed and matched case-insensitively against the single-key
/// entries; anything else is `None`.
pub fn lookup(line: &str) -> Option<Action> {
    let mut chars = line.trim().chars();
    let key = chars.next()?.to_ascii_uppercase();
    if chars.next().is_some() {
        return None;
    }
    MENU.iter()
        .find(|entry| entry.key == key)
        .map(|entry| entry.action)
}

/// Operator terminal
pub trait Console: Write {
    /// Read one line into `buf`, without the line terminator
    ///
    /// `None` means end of input or an interrupt; the menu exits on it.
    fn read_line<'b>(&mut self, buf: &'b mut [u8]) -> Option<&'b str>;
}

/// Print `text` and read the answer
///
/// # Errors
///
/// [`InputError::Missing`] when the console has no more input.
pub fn prompt<'b, C: Console>(
    console: &mut C,
    text: &str,
    buf: &'b mut [u8],
) -> Result<&'b str, InputError> {
    let _ = write!(console, "{text}");
    console.read_line(buf).ok_or(InputError::Missing)
}

/// What the menu header shows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Status {
    /// Current bus frequency in Hz
    pub frequency_hz: u32,
    /// Current display geometry
    pub geometry: Geometry,
}

/// Runs menu actions
pub trait Handler {
    /// Error reported to the operator as `Error: ...`
    type Error: core::fmt::Display;

    /// Values for the menu header
    fn status(&self) -> Status;

    /// Startup demo, run once before the first menu
    fn splash<C: Console>(&mut self, console: &mut C) -> Result<(), Self::Error>;

    /// Run one action; `Action::Exit` never reaches the handler
    fn invoke<C: Console>(&mut self, action: Action, console: &mut C) -> Result<(), Self::Error>;
}

/// Dispatcher state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// Waiting for the next line
    Running,
    /// Exit selected or input ended
    Terminated,
}

/// Menu loop
#[derive(Debug)]
pub struct Dispatcher {
    state: State,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// New dispatcher in [`State::Running`]
    pub fn new() -> Self {
        Self {
            state: State::Running,
        }
    }

    /// Current state
    pub fn state(&self) -> State {
        self.state
    }

    /// Print the menu, read one line and act on it
    ///
    /// Handler errors are printed and the dispatcher keeps running. Once
    /// terminated, further calls do nothing.
    pub fn step<H: Handler, C: Console>(&mut self, handler: &mut H, console: &mut C) -> State {
        if self.state == State::Terminated {
            return self.state;
        }

        print_menu(&handler.status(), console);

        let mut buf = [0u8; LINE_CAPACITY];
        let Some(line) = console.read_line(&mut buf) else {
            let _ = writeln!(console, "\nExiting.");
            self.state = State::Terminated;
            return self.state;
        };

        match lookup(line) {
            Some(Action::Exit) => {
                let _ = writeln!(console, "Bye.");
                self.state = State::Terminated;
            }
            Some(action) => {
                log::debug!("menu action {:?}", action);
                if let Err(e) = handler.invoke(action, console) {
                    let _ = writeln!(console, "Error: {e}");
                }
            }
            None => {
                let _ = writeln!(console, "Invalid option.");
            }
        }
        self.state
    }

    /// Step until terminated
    pub fn run<H: Handler, C: Console>(&mut self, handler: &mut H, console: &mut C) {
        while self.step(handler, console) == State::Running {}
    }
}

fn print_menu<C: Console>(status: &Status, console: &mut C) {
    let _ = writeln!(
        console,
        "\n=== OLED I2C MENU (freq={} Hz, {}) ===",
        status.frequency_hz, status.geometry
    );
    for entry in &MENU {
        let _ = writeln!(console, "{}. {}", entry.key, entry.label);
    }
    let _ = write!(console, "> ");
}

/// Run the startup demo, then the menu until exit or end of input
///
/// A failing startup demo is reported as a warning and the menu runs anyway.
pub fn session<H: Handler, C: Console>(handler: &mut H, console: &mut C) {
    if let Err(e) = handler.splash(console) {
        log::warn!("startup demo failed: {}", e);
        let _ = writeln!(console, "Warning: initial show failed: {e}");
    }
    Dispatcher::new().run(handler, console);
}

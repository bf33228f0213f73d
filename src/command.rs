//! SSD1306 command definitions
//!
//! This module defines the control bytes and command bytes used to drive the
//! SSD1306 OLED controller over I2C.
//!
//! ## Transaction Framing
//!
//! Every I2C transaction to the controller starts with a control byte that
//! tells it how to interpret the rest of the payload:
//!
//! | Control byte | Co | D/C# | Payload                  |
//! |--------------|----|------|--------------------------|
//! | `0x80`       | 1  | 0    | one command byte         |
//! | `0x40`       | 0  | 1    | display RAM data bytes   |
//!
//! Command arguments are commands too: `SET_CONTRAST` followed by its value is
//! two transactions, `[0x80, 0x81]` then `[0x80, value]`.
//!
//! ## Example
//!
//! ```
//! use ssd1306_bench::command;
//!
//! let power_off = [command::CONTROL_COMMAND, command::DISPLAY_OFF];
//! assert_eq!(power_off, [0x80, 0xAE]);
//! ```

// Control bytes

/// Control byte for a single command byte (Co=1, D/C#=0)
pub const CONTROL_COMMAND: u8 = 0x80;

/// Control byte for a run of display data bytes (Co=0, D/C#=1)
pub const CONTROL_DATA: u8 = 0x40;

// Fundamental commands

/// Set contrast control (0x81)
///
/// Followed by one argument byte, 0x00..=0xFF.
pub const SET_CONTRAST: u8 = 0x81;

/// Resume display from RAM content (0xA4)
pub const ENTIRE_DISPLAY_RESUME: u8 = 0xA4;

/// Normal display, 1 in RAM is a lit pixel (0xA6)
pub const NORMAL_DISPLAY: u8 = 0xA6;

/// Inverted display, 0 in RAM is a lit pixel (0xA7)
pub const INVERT_DISPLAY: u8 = 0xA7;

/// Display off, sleep mode (0xAE)
pub const DISPLAY_OFF: u8 = 0xAE;

/// Display on, normal mode (0xAF)
pub const DISPLAY_ON: u8 = 0xAF;

// Addressing commands

/// Set memory addressing mode (0x20)
///
/// Followed by one argument byte: 0x00 horizontal, 0x01 vertical, 0x02 page.
pub const SET_MEMORY_MODE: u8 = 0x20;

/// Horizontal addressing mode argument for [`SET_MEMORY_MODE`]
pub const MEMORY_MODE_HORIZONTAL: u8 = 0x00;

/// Set column address window (0x21)
///
/// Followed by start and end column.
pub const SET_COLUMN_ADDRESS: u8 = 0x21;

/// Set page address window (0x22)
///
/// Followed by start and end page.
pub const SET_PAGE_ADDRESS: u8 = 0x22;

// Hardware configuration commands

/// Set display start line, OR-ed with the line number 0..=63 (0x40)
pub const SET_START_LINE: u8 = 0x40;

/// Segment re-map, OR-ed with 1 to map column 127 to SEG0 (0xA0)
pub const SET_SEGMENT_REMAP: u8 = 0xA0;

/// Set multiplex ratio (0xA8)
///
/// Followed by the number of rows minus one.
pub const SET_MULTIPLEX_RATIO: u8 = 0xA8;

/// COM output scan direction, OR-ed with 0x08 to scan from COM[N-1] (0xC0)
pub const SET_COM_SCAN_DIRECTION: u8 = 0xC0;

/// Set vertical display offset (0xD3)
///
/// Followed by one argument byte.
pub const SET_DISPLAY_OFFSET: u8 = 0xD3;

/// Set COM pins hardware configuration (0xDA)
///
/// Followed by 0x02 (sequential, 128x32) or 0x12 (alternative, 128x64).
pub const SET_COM_PINS: u8 = 0xDA;

// Timing and driving commands

/// Set display clock divide ratio and oscillator frequency (0xD5)
pub const SET_CLOCK_DIVIDE: u8 = 0xD5;

/// Set pre-charge period (0xD9)
pub const SET_PRECHARGE: u8 = 0xD9;

/// Set VCOMH deselect level (0xDB)
pub const SET_VCOM_DESELECT: u8 = 0xDB;

/// Charge pump setting (0x8D)
///
/// Followed by 0x14 to enable the internal charge pump.
pub const SET_CHARGE_PUMP: u8 = 0x8D;

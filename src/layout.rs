//! Frame buffer layout utilities
//!
//! The SSD1306 stores pixels in pages of 8 rows. Each byte holds one column of
//! a page, with the topmost row of the page in the least significant bit:
//!
//! ```text
//!            x=0   x=1   x=2  ...
//! page 0   [ b0 ] [ b1 ] [ b2 ]      bit 0 = y 0, bit 7 = y 7
//! page 1   [b128] [b129] [b130]      bit 0 = y 8, bit 7 = y 15
//! ```
//!
//! With horizontal addressing the controller consumes bytes in exactly this
//! order, so the buffer is flushed as-is.
//!
//! ## Example
//!
//! ```
//! use ssd1306_bench::layout::pixel_offset;
//!
//! // Pixel (0,0) is byte 0, bit 0
//! assert_eq!(pixel_offset(0, 0, 128), (0, 0x01));
//!
//! // Pixel (5,9) is on page 1: byte 128 + 5, bit 1
//! assert_eq!(pixel_offset(5, 9, 128), (133, 0x02));
//! ```

/// Map a pixel to its buffer location
///
/// Converts (x, y) coordinates to (byte_index, bit_mask) for a panel `width`
/// pixels wide. Bounds are the caller's responsibility.
///
/// # Arguments
///
/// * `x` - X coordinate (column), 0 to width-1
/// * `y` - Y coordinate (row), 0 to height-1
/// * `width` - Display width in pixels
pub fn pixel_offset(x: u32, y: u32, width: u32) -> (usize, u8) {
    let index = (x + (y / 8) * width) as usize;
    let bit = 0x01 << (y % 8);
    (index, bit)
}

//! # Graphic Field Hex Serialization
//!
//! Converts a [`MonoBitmap`] into the ASCII hex text carried by the `^GF`
//! graphic field.
//!
//! ## Layout
//!
//! Each row is packed 8 pixels per byte and written as two uppercase hex
//! digits per byte, followed by `\n`:
//!
//! ```text
//! 10 x 2 bitmap              bytes_per_row = ceil(10 / 8) = 2
//!
//! ██████████                 FFC0\n
//! ░░░░░░░░░█                 0040\n
//! ```
//!
//! - Bit 7 (MSB) = leftmost pixel of the byte, 1 = black
//! - A partial last byte is padded with white (0) bits
//! - `binary_byte_count = height * bytes_per_row`
//! - `text.len() == binary_byte_count * 2 + height`

use crate::raster::{MonoBitmap, Tone};

/// Serialized hex text plus the counts the `^GFA` header needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexBitmap {
    /// Hex digits, one `\n`-terminated line per row
    pub text: String,
    /// Total bytes of bitmap data (`rows * bytes_per_row`)
    pub binary_byte_count: usize,
    /// Bytes per row (`ceil(width / 8)`)
    pub bytes_per_row: usize,
    /// Row count (bitmap height)
    pub rows: usize,
}

/// Pack up to 8 pixels into a byte, MSB first.
///
/// ```
/// use zplify::protocol::hex::pack_byte;
/// use zplify::raster::Tone::{Black, White};
///
/// assert_eq!(pack_byte(&[Black, Black, White, White, Black]), 0b1100_1000);
/// ```
pub fn pack_byte(pixels: &[Tone]) -> u8 {
    debug_assert!(pixels.len() <= 8);
    pixels
        .iter()
        .enumerate()
        .filter(|(_, tone)| tone.is_black())
        .fold(0u8, |byte, (j, _)| byte | (1 << (7 - j)))
}

/// Serialize a bitmap row-major into newline-terminated hex lines.
pub fn bitmap_to_hex(bitmap: &MonoBitmap) -> HexBitmap {
    let bytes_per_row = bitmap.width().div_ceil(8);
    let rows = bitmap.height();
    let binary_byte_count = rows * bytes_per_row;

    let mut text = String::with_capacity(binary_byte_count * 2 + rows);
    let mut row_bytes = Vec::with_capacity(bytes_per_row);
    for row in bitmap.rows() {
        row_bytes.clear();
        row_bytes.extend(row.chunks(8).map(pack_byte));
        text.push_str(&hex::encode_upper(&row_bytes));
        text.push('\n');
    }

    HexBitmap {
        text,
        binary_byte_count,
        bytes_per_row,
        rows,
    }
}

//! # ZPL II Graphic Field Protocol
//!
//! Serialization of monochrome bitmaps into ZPL II `^GFA` label text.
//!
//! ## Module Structure
//!
//! - [`hex`]: Bitmap to newline-separated hex text
//! - [`compress`]: ZPL run-length compression (and its inverse)
//! - [`crc`]: CRC-16 trailer for base64 payloads
//! - [`encoding`]: Payload encodings (hex, compressed hex, `:B64:`, `:Z64:`)
//! - [`commands`]: `^XA`, `^LL`, `^GFA`, `^FS`, `^PQ`, `^XZ` builders
//!
//! ## Usage Example
//!
//! ```
//! use zplify::protocol::{commands, encoding, hex};
//! use zplify::raster::{MonoBitmap, Tone};
//!
//! let bitmap = MonoBitmap::new(16, 2, Tone::Black).unwrap();
//! let hex = hex::bitmap_to_hex(&bitmap);
//! let payload = encoding::encode(&hex, encoding::EncodingKind::HexadecimalCompressed).unwrap();
//! assert_eq!(payload, "!:");
//!
//! let gf = commands::graphic_field(hex.binary_byte_count, hex.bytes_per_row, &payload);
//! assert_eq!(commands::label(&gf, None, 0), "^XA^GFA,4,4,2,!:^FS^XZ");
//! ```
//!
//! ## Protocol Reference
//!
//! Based on the "ZPL II Programming Guide" by Zebra Technologies.

pub mod commands;
pub mod compress;
pub mod crc;
pub mod encoding;
pub mod hex;

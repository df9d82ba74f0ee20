//! # Graphic Field Payload Encodings
//!
//! The `^GFA` payload can be carried four ways. All start from the same hex
//! text produced by [`bitmap_to_hex`](super::hex::bitmap_to_hex).
//!
//! | Kind | Payload |
//! |------|---------|
//! | `hex` | Hex text as-is, one line per row |
//! | `hex-compressed` | ZPL run-length compressed hex |
//! | `base64` | `:B64:<base64 of bytes>:<CRC>` |
//! | `base64-compressed` | `:Z64:<base64 of zlib(bytes)>:<CRC>` |
//!
//! The CRC is computed over the base64 text and written as 4 uppercase hex
//! digits (see [`crc`](super::crc)).

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use log::debug;
use serde::{Deserialize, Serialize};

use super::compress::compress_hex;
use super::crc::checksum;
use super::hex::HexBitmap;
use crate::error::ZplError;

/// How the graphic field payload is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EncodingKind {
    /// Plain ASCII hex
    #[serde(rename = "hex", alias = "hexadecimal")]
    Hexadecimal,
    /// ZPL run-length compressed hex
    #[default]
    #[serde(rename = "hex-compressed", alias = "hexadecimal-compressed")]
    HexadecimalCompressed,
    /// `:B64:` base64 of the raw bytes
    Base64,
    /// `:Z64:` base64 of zlib-compressed bytes
    Base64Compressed,
}

impl EncodingKind {
    pub const ALL: &'static [EncodingKind] = &[
        EncodingKind::Hexadecimal,
        EncodingKind::HexadecimalCompressed,
        EncodingKind::Base64,
        EncodingKind::Base64Compressed,
    ];

    /// Name used in configs and on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            EncodingKind::Hexadecimal => "hex",
            EncodingKind::HexadecimalCompressed => "hex-compressed",
            EncodingKind::Base64 => "base64",
            EncodingKind::Base64Compressed => "base64-compressed",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            EncodingKind::Hexadecimal => "ASCII hex, one line per row",
            EncodingKind::HexadecimalCompressed => "ZPL run-length compressed hex",
            EncodingKind::Base64 => "base64 with CRC (:B64:)",
            EncodingKind::Base64Compressed => "zlib + base64 with CRC (:Z64:)",
        }
    }

    /// Wire prefix for the base64 kinds.
    fn base64_prefix(&self) -> Option<&'static str> {
        match self {
            EncodingKind::Base64 => Some(":B64:"),
            EncodingKind::Base64Compressed => Some(":Z64:"),
            _ => None,
        }
    }
}

impl fmt::Display for EncodingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for EncodingKind {
    type Err = ZplError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hex" | "hexadecimal" => Ok(EncodingKind::Hexadecimal),
            "hex-compressed" | "hexadecimal-compressed" | "acs" | "compressed" => {
                Ok(EncodingKind::HexadecimalCompressed)
            }
            "base64" | "b64" => Ok(EncodingKind::Base64),
            "base64-compressed" | "z64" => Ok(EncodingKind::Base64Compressed),
            other => Err(ZplError::InvalidArgument(format!(
                "unknown encoding '{}' (expected one of: hex, hex-compressed, base64, base64-compressed)",
                other
            ))),
        }
    }
}

/// zlib-compress at maximum level.
pub fn deflate(bytes: &[u8]) -> Result<Vec<u8>, ZplError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}

/// Build a `:B64:` / `:Z64:` payload from base64 text.
fn wrap_base64(prefix: &str, b64: &str) -> String {
    format!("{}{}:{:04X}", prefix, b64, checksum(b64))
}

/// Encode serialized hex text as a graphic field payload.
pub fn encode(hex: &HexBitmap, kind: EncodingKind) -> Result<String, ZplError> {
    let payload = match kind {
        EncodingKind::Hexadecimal => hex.text.clone(),
        EncodingKind::HexadecimalCompressed => compress_hex(&hex.text, hex.bytes_per_row),
        EncodingKind::Base64 | EncodingKind::Base64Compressed => {
            let digits: String = hex.text.chars().filter(|c| *c != '\n').collect();
            let mut bytes =
                ::hex::decode(&digits).map_err(|e| ZplError::InvalidHex(e.to_string()))?;
            if kind == EncodingKind::Base64Compressed {
                bytes = deflate(&bytes)?;
            }
            let prefix = kind.base64_prefix().unwrap_or_default();
            wrap_base64(prefix, &STANDARD.encode(&bytes))
        }
    };

    debug!(
        "encoded {} bytes as {}: {} payload chars",
        hex.binary_byte_count,
        kind,
        payload.len()
    );
    Ok(payload)
}

//! CRC-16 for `:B64:` / `:Z64:` graphic field payloads.
//!
//! Printers verify the base64 text (not the decoded bytes) with
//! CRC-16/XMODEM: polynomial `0x1021`, initial value `0`, no reflection,
//! no final XOR. The trailer is the 4-digit uppercase hex value.

/// CRC-CCITT polynomial.
pub const POLYNOMIAL: u16 = 0x1021;

static TABLE: [u16; 256] = build_table();

const fn build_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = (i as u16) << 8;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ POLYNOMIAL
            } else {
                crc << 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// CRC-16/XMODEM of `data`.
///
/// ```
/// use zplify::protocol::crc::crc16_ccitt;
///
/// assert_eq!(crc16_ccitt(b"123456789"), 0x31C3);
/// ```
pub fn crc16_ccitt(data: &[u8]) -> u16 {
    data.iter().fold(0u16, |crc, &byte| {
        (crc << 8) ^ TABLE[(((crc >> 8) as u8) ^ byte) as usize]
    })
}

/// Checksum of a base64 payload as it appears in the graphic field.
pub fn checksum(text: &str) -> u16 {
    crc16_ccitt(text.as_bytes())
}

//! # ZPL ASCII Compression
//!
//! Run-length compression for graphic field hex text, as understood by ZPL II
//! printers. The compressor is a single forward pass over the hex text; the
//! decompressor is its inverse and is used to check round trips.
//!
//! ## Count Tokens
//!
//! A run of N identical hex digits is written as count letters followed by the
//! digit. Count letters are additive:
//!
//! | Letters | Count |
//! |---------|-------|
//! | `G` `H` ... `Y` | 1, 2, ... 19 |
//! | `g` `h` ... `z` | 20, 40, ... 400 |
//!
//! ```text
//! run         tokens
//! 7 × '6'     M6
//! 20 × 'A'    gA
//! 47 × '0'    hM0        (40 + 7)
//! 420 × 'F'   zgF        (400 + 20)
//! 1000 × '0'  zzp0       (400 + 400 + 200)
//! ```
//!
//! Single digits also get a count (`G`), so every run is at least two
//! characters.
//!
//! ## Row Markers
//!
//! | Char | Meaning |
//! |------|---------|
//! | `,` | Whole row is `0` (white) |
//! | `!` | Whole row is `F` (black) |
//! | `:` | Row is identical to the previous row |
//!
//! `,` and `!` are only emitted when a single run covers the entire row. `:`
//! compares against the immediately preceding row only. Row separators are
//! not written; the printer knows the row length from the `^GFA` header.
//!
//! ## Example
//!
//! ```
//! use zplify::protocol::compress::{compress_hex, decompress};
//!
//! let hex = "FFFF\n0000\n0000\nF00F\n";
//! let compressed = compress_hex(hex, 2);
//! assert_eq!(compressed, "!,:GFH0GF");
//! assert_eq!(decompress(&compressed, 2).unwrap(), hex);
//! ```

use log::trace;

use crate::error::ZplError;

/// Count letters for 1..=19.
pub const LOW_COUNTS: &[u8; 19] = b"GHIJKLMNOPQRSTUVWXY";

/// Count letters for 20, 40, ..., 400.
pub const HIGH_COUNTS: &[u8; 20] = b"ghijklmnopqrstuvwxyz";

/// Largest count a single letter can express.
pub const MAX_TOKEN_COUNT: usize = 400;

/// Whole row of `0`.
pub const BLANK_ROW: char = ',';
/// Whole row of `F`.
pub const FILLED_ROW: char = '!';
/// Same as the previous row.
pub const REPEAT_ROW: char = ':';

#[inline]
fn low_token(count: usize) -> char {
    LOW_COUNTS[count - 1] as char
}

#[inline]
fn high_token(count: usize) -> char {
    HIGH_COUNTS[count / 20 - 1] as char
}

/// Append the tokens for `count` repetitions of `digit`.
///
/// Counts above 20 are split into a multiple-of-20 part (in 400 chunks when
/// needed) and a 1..=19 remainder.
pub fn encode_run(out: &mut String, digit: char, count: usize) {
    debug_assert!(count > 0, "runs are never empty");

    if count > 20 {
        let multiples20 = count / 20 * 20;
        out.push(high_token(multiples20.min(MAX_TOKEN_COUNT)));

        let full_chunks = multiples20 / MAX_TOKEN_COUNT;
        if full_chunks > 0 {
            for _ in 1..full_chunks {
                out.push(high_token(MAX_TOKEN_COUNT));
            }
            let rest_to_400 = (count % MAX_TOKEN_COUNT) / 20 * 20;
            if rest_to_400 > 0 {
                out.push(high_token(rest_to_400));
            }
        }

        let rest_to_20 = count % 20;
        if rest_to_20 != 0 {
            out.push(low_token(rest_to_20));
        }
        out.push(digit);
    } else if count == 20 {
        out.push(high_token(20));
        out.push(digit);
    } else {
        out.push(low_token(count));
        out.push(digit);
    }
}

/// Single-pass compressor, fed one character of hex text at a time.
///
/// ```
/// use zplify::protocol::compress::Compressor;
///
/// let mut compressor = Compressor::new(1);
/// for ch in "FF\nFF\n".chars() {
///     compressor.feed(ch);
/// }
/// assert_eq!(compressor.finish(), "!:");
/// ```
#[derive(Debug, Clone)]
pub struct Compressor {
    /// Hex digits per row (`bytes_per_row * 2`)
    row_chars: usize,
    /// Digit of the run being counted
    current: Option<char>,
    run_length: usize,
    /// Compressed text of the row in progress
    line: String,
    /// Compressed text of the last finished row
    previous_line: Option<String>,
    output: String,
    rows: usize,
    repeated_rows: usize,
}

impl Compressor {
    pub fn new(bytes_per_row: usize) -> Self {
        Self {
            row_chars: bytes_per_row * 2,
            current: None,
            run_length: 0,
            line: String::new(),
            previous_line: None,
            output: String::new(),
            rows: 0,
            repeated_rows: 0,
        }
    }

    /// Advance by one character. `\n` ends the current row.
    pub fn feed(&mut self, ch: char) {
        if ch == '\n' {
            self.end_row();
            return;
        }

        match self.current {
            Some(digit) if digit == ch => self.run_length += 1,
            Some(digit) => {
                encode_run(&mut self.line, digit, self.run_length);
                self.current = Some(ch);
                self.run_length = 1;
            }
            None => {
                self.current = Some(ch);
                self.run_length = 1;
            }
        }
    }

    fn end_row(&mut self) {
        if let Some(digit) = self.current.take() {
            let spans_row = self.run_length >= self.row_chars;
            match digit {
                '0' if spans_row => self.line.push(BLANK_ROW),
                'F' if spans_row => self.line.push(FILLED_ROW),
                _ => encode_run(&mut self.line, digit, self.run_length),
            }
        }
        self.run_length = 0;
        self.rows += 1;

        let line = std::mem::take(&mut self.line);
        if self.previous_line.as_deref() == Some(line.as_str()) {
            self.output.push(REPEAT_ROW);
            self.repeated_rows += 1;
        } else {
            self.output.push_str(&line);
        }
        self.previous_line = Some(line);
    }

    /// Flush a trailing row without `\n` and return the compressed text.
    pub fn finish(mut self) -> String {
        if self.current.is_some() || !self.line.is_empty() {
            self.end_row();
        }
        trace!(
            "compressed {} rows ({} repeated) into {} chars",
            self.rows, self.repeated_rows, self.output.len()
        );
        self.output
    }
}

/// Compress newline-separated hex text with rows of `bytes_per_row` bytes.
pub fn compress_hex(hex: &str, bytes_per_row: usize) -> String {
    let mut compressor = Compressor::new(bytes_per_row);
    for ch in hex.chars() {
        compressor.feed(ch);
    }
    compressor.finish()
}

/// Expand compressed graphic field data back into newline-separated hex text.
pub fn decompress(data: &str, bytes_per_row: usize) -> Result<String, ZplError> {
    let row_chars = bytes_per_row * 2;
    if row_chars == 0 {
        return Err(ZplError::InvalidArgument(
            "bytes_per_row must be at least 1".to_string(),
        ));
    }

    let mut out = String::new();
    let mut row = String::with_capacity(row_chars);
    let mut previous: Option<String> = None;
    let mut pending = 0usize;

    for (offset, ch) in data.char_indices() {
        match ch {
            REPEAT_ROW => {
                if !row.is_empty() || pending != 0 {
                    return Err(ZplError::InvalidCompressed(format!(
                        "repeat marker inside a row at offset {}",
                        offset
                    )));
                }
                let prev = previous.as_deref().ok_or_else(|| {
                    ZplError::InvalidCompressed("repeat marker before the first row".to_string())
                })?;
                row.push_str(prev);
            }
            BLANK_ROW | FILLED_ROW => {
                if pending != 0 {
                    return Err(ZplError::InvalidCompressed(format!(
                        "count without a digit at offset {}",
                        offset
                    )));
                }
                let fill = if ch == BLANK_ROW { '0' } else { 'F' };
                while row.len() < row_chars {
                    row.push(fill);
                }
            }
            'G'..='Y' => pending += (ch as u8 - b'G') as usize + 1,
            'g'..='z' => pending += ((ch as u8 - b'g') as usize + 1) * 20,
            '0'..='9' | 'A'..='F' => {
                let count = pending.max(1);
                pending = 0;
                if row.len() + count > row_chars {
                    return Err(ZplError::InvalidCompressed(format!(
                        "run of {} at offset {} overflows a {}-digit row",
                        count, offset, row_chars
                    )));
                }
                row.extend(std::iter::repeat_n(ch, count));
            }
            '\r' | '\n' => continue,
            other => {
                return Err(ZplError::InvalidCompressed(format!(
                    "unexpected character '{}' at offset {}",
                    other, offset
                )));
            }
        }

        if row.len() == row_chars {
            out.push_str(&row);
            out.push('\n');
            previous = Some(std::mem::take(&mut row));
        }
    }

    if !row.is_empty() || pending != 0 {
        return Err(ZplError::InvalidCompressed("data ends inside a row".to_string()));
    }
    Ok(out)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn run(digit: char, count: usize) -> String {
        let mut out = String::new();
        encode_run(&mut out, digit, count);
        out
    }

    /// Sum of the count letters in a token string.
    fn token_total(tokens: &str) -> usize {
        tokens
            .chars()
            .map(|c| match c {
                'G'..='Y' => (c as u8 - b'G') as usize + 1,
                'g'..='z' => ((c as u8 - b'g') as usize + 1) * 20,
                _ => 0,
            })
            .sum()
    }

    #[test]
    fn test_count_letters() {
        assert_eq!(low_token(1), 'G');
        assert_eq!(low_token(19), 'Y');
        assert_eq!(high_token(20), 'g');
        assert_eq!(high_token(40), 'h');
        assert_eq!(high_token(400), 'z');
    }

    #[test]
    fn test_encode_run_table() {
        let cases = [
            (1, "G0"),
            (2, "H0"),
            (7, "M0"),
            (19, "Y0"),
            (20, "g0"),
            (21, "gG0"),
            (39, "gY0"),
            (40, "h0"),
            (47, "hM0"),
            (327, "vM0"),
            (399, "yY0"),
            (400, "z0"),
            (401, "zG0"),
            (419, "zY0"),
            (420, "zg0"),
            (440, "zh0"),
            (799, "zyY0"),
            (800, "zz0"),
            (801, "zzG0"),
            (820, "zzg0"),
            (1000, "zzp0"),
            (1200, "zzz0"),
            (1219, "zzzY0"),
        ];
        for (count, expected) in cases {
            assert_eq!(run('0', count), expected, "count {}", count);
        }
    }

    #[test]
    fn test_encode_run_totals() {
        for count in 1..=2500 {
            let tokens = run('A', count);
            assert!(tokens.ends_with('A'));
            assert_eq!(token_total(&tokens), count, "count {} -> {}", count, tokens);
        }
    }

    #[test]
    fn test_single_digits_get_a_count() {
        assert_eq!(compress_hex("0F0F\n", 2), "G0GFG0GF");
    }

    #[test]
    fn test_full_row_shorthand() {
        assert_eq!(compress_hex("FF\n", 1), "!");
        assert_eq!(compress_hex("0000\n", 2), ",");
        assert_eq!(compress_hex("FFFFFFFF\n", 4), "!");
    }

    #[test]
    fn test_trailing_run_not_spanning_row() {
        // Only a run that covers the whole row gets the shorthand
        assert_eq!(compress_hex("FFFF80\n", 3), "JFG8G0");
        assert_eq!(compress_hex("80000000\n", 4), "G8M0");
        assert_eq!(compress_hex("000000FF\n", 4), "L0HF");
    }

    #[test]
    fn test_other_digit_spanning_row() {
        assert_eq!(compress_hex("AAAA\n", 2), "JA");
    }

    #[test]
    fn test_duplicate_rows() {
        assert_eq!(compress_hex("0000\n0000\n0000\n", 2), ",::");
        assert_eq!(compress_hex("F00F\nF00F\n", 2), "GFH0GF:");
    }

    #[test]
    fn test_only_previous_row_is_compared() {
        assert_eq!(compress_hex("FF\n00\nFF\n", 1), "!,!");
    }

    #[test]
    fn test_runs_do_not_cross_rows() {
        // Row 1 ends in 0, row 2 starts with 0
        assert_eq!(compress_hex("F0\n0F\n", 1), "GFG0G0GF");
    }

    #[test]
    fn test_long_row() {
        let hex = format!("{}\n", "A".repeat(100));
        assert_eq!(compress_hex(&hex, 50), "kA");
    }

    #[test]
    fn test_missing_final_newline() {
        assert_eq!(compress_hex("FF\nFF", 1), "!:");
    }

    #[test]
    fn test_feed_transitions() {
        let mut compressor = Compressor::new(2);
        compressor.feed('1');
        assert_eq!(compressor.current, Some('1'));
        assert_eq!(compressor.run_length, 1);
        compressor.feed('1');
        assert_eq!(compressor.run_length, 2);
        compressor.feed('2');
        assert_eq!(compressor.line, "H1");
        assert_eq!(compressor.current, Some('2'));
        compressor.feed('\n');
        assert_eq!(compressor.current, None);
        assert_eq!(compressor.previous_line.as_deref(), Some("H1G2"));
        assert_eq!(compressor.finish(), "H1G2");
    }

    #[test]
    fn test_decompress_markers() {
        assert_eq!(decompress(",", 2).unwrap(), "0000\n");
        assert_eq!(decompress("!", 2).unwrap(), "FFFF\n");
        assert_eq!(decompress("!:", 1).unwrap(), "FF\nFF\n");
        assert_eq!(decompress("G8,", 2).unwrap(), "8000\n");
        assert_eq!(decompress("AB", 1).unwrap(), "AB\n");
    }

    #[test]
    fn test_decompress_errors() {
        assert!(matches!(decompress(":", 1), Err(ZplError::InvalidCompressed(_))));
        assert!(matches!(decompress("IF", 1), Err(ZplError::InvalidCompressed(_))));
        assert!(matches!(decompress("GF", 1), Err(ZplError::InvalidCompressed(_))));
        assert!(matches!(decompress("H,", 1), Err(ZplError::InvalidCompressed(_))));
        assert!(matches!(decompress("HF?", 1), Err(ZplError::InvalidCompressed(_))));
        assert!(matches!(decompress("", 0), Err(ZplError::InvalidArgument(_))));
    }

    #[test]
    fn test_roundtrip_mixed_rows() {
        let rows = [
            "0".repeat(60),
            "0".repeat(60),
            format!("{}{}", "F".repeat(45), "0".repeat(15)),
            "0123456789ABCDEF0123456789ABCDEF0123456789ABCDEF0123456789AB".to_string(),
            "F".repeat(60),
            "F".repeat(60),
        ];
        let hex: String = rows.iter().map(|r| format!("{}\n", r)).collect();
        let compressed = compress_hex(&hex, 30);
        assert_eq!(decompress(&compressed, 30).unwrap(), hex);
    }
}

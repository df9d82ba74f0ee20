//! # Raster Buffers
//!
//! The conversion pipeline works on two pixel representations:
//!
//! | Type | Pixel | Produced by |
//! |------|-------|-------------|
//! | [`image::RgbaImage`] | 32-bit RGBA | image decoders, [`prepare`] |
//! | [`MonoBitmap`] | [`Tone`] (black/white) | [`crate::render::dither`], packed 1-bit input |
//!
//! Decoders (PNG, BMP, ...) are adapted into an `RgbaImage` by the `image`
//! crate; everything after that point only sees these two types.
//!
//! ## Packed 1-bit Layout
//!
//! Already-monochrome input uses the usual thermal printer packing:
//!
//! ```text
//! Byte value 0xF0 = 11110000 = ████░░░░
//! Bit 7 (MSB) = leftmost dot, 1 = black
//! Rows padded to a whole number of bytes
//! ```

pub mod prepare;

use image::{GrayImage, Luma, Rgba};

use crate::error::ZplError;

/// A single monochrome sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Black,
    White,
}

impl Tone {
    #[inline]
    pub fn is_black(self) -> bool {
        matches!(self, Tone::Black)
    }
}

/// A width × height grid of black/white samples, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonoBitmap {
    width: usize,
    height: usize,
    pixels: Vec<Tone>,
}

/// Reject rasters the pipeline cannot encode.
pub fn ensure_dimensions(width: usize, height: usize) -> Result<(), ZplError> {
    if width == 0 || height == 0 {
        return Err(ZplError::InvalidArgument(format!(
            "bitmap must not be empty (got {}x{})",
            width, height
        )));
    }
    Ok(())
}

impl MonoBitmap {
    /// Create a bitmap with every pixel set to `fill`.
    pub fn new(width: usize, height: usize, fill: Tone) -> Result<Self, ZplError> {
        ensure_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![fill; width * height],
        })
    }

    /// Build a bitmap by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Result<Self, ZplError>
    where
        F: FnMut(usize, usize) -> Tone,
    {
        ensure_dimensions(width, height)?;
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Wrap a row-major tone vector.
    pub fn from_tones(width: usize, height: usize, pixels: Vec<Tone>) -> Result<Self, ZplError> {
        ensure_dimensions(width, height)?;
        if pixels.len() != width * height {
            return Err(ZplError::InvalidArgument(format!(
                "expected {} pixels for {}x{}, got {}",
                width * height,
                width,
                height,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Unpack 1-bit rows (MSB first, 1 = black, rows padded to whole bytes).
    ///
    /// ```
    /// use zplify::raster::{MonoBitmap, Tone};
    ///
    /// let bitmap = MonoBitmap::from_packed(4, 1, &[0b1010_0000]).unwrap();
    /// assert_eq!(bitmap.get(0, 0), Tone::Black);
    /// assert_eq!(bitmap.get(1, 0), Tone::White);
    /// ```
    pub fn from_packed(width: usize, height: usize, data: &[u8]) -> Result<Self, ZplError> {
        ensure_dimensions(width, height)?;
        let width_bytes = width.div_ceil(8);
        if data.len() != width_bytes * height {
            return Err(ZplError::InvalidArgument(format!(
                "packed data length mismatch: expected {} ({} bytes × {} rows), got {}",
                width_bytes * height,
                width_bytes,
                height,
                data.len()
            )));
        }

        Self::from_fn(width, height, |x, y| {
            let byte = data[y * width_bytes + x / 8];
            if (byte >> (7 - (x % 8))) & 1 == 1 {
                Tone::Black
            } else {
                Tone::White
            }
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Tone {
        self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, tone: Tone) {
        self.pixels[y * self.width + x] = tone;
    }

    /// Iterate over rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Tone]> {
        self.pixels.chunks(self.width)
    }

    pub fn pixels(&self) -> &[Tone] {
        &self.pixels
    }

    pub fn black_count(&self) -> usize {
        self.pixels.iter().filter(|t| t.is_black()).count()
    }

    /// Render as an 8-bit grey image (0 = black, 255 = white) for previews.
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            match self.get(x as usize, y as usize) {
                Tone::Black => Luma([0u8]),
                Tone::White => Luma([255u8]),
            }
        })
    }
}

/// Parse `RRGGBB` or `RRGGBBAA` (leading `#` optional) into RGBA.
///
/// ```
/// use zplify::raster::parse_color;
///
/// assert_eq!(parse_color("#FF0000").unwrap().0, [255, 0, 0, 255]);
/// assert_eq!(parse_color("ffffff64").unwrap().0, [255, 255, 255, 100]);
/// ```
pub fn parse_color(s: &str) -> Result<Rgba<u8>, ZplError> {
    let hex = s.trim().trim_start_matches('#');
    if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
        return Err(ZplError::InvalidArgument(format!(
            "color '{}' must be RRGGBB or RRGGBBAA",
            s
        )));
    }

    let mut channels = [255u8; 4];
    for (i, channel) in channels.iter_mut().enumerate().take(hex.len() / 2) {
        *channel = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
            .map_err(|_| ZplError::InvalidArgument(format!("color '{}' is not hex", s)))?;
    }
    Ok(Rgba(channels))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dimensions_rejected() {
        assert!(matches!(
            MonoBitmap::new(0, 5, Tone::White),
            Err(ZplError::InvalidArgument(_))
        ));
        assert!(matches!(
            MonoBitmap::new(5, 0, Tone::White),
            Err(ZplError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_from_tones_length_mismatch() {
        let result = MonoBitmap::from_tones(2, 2, vec![Tone::Black; 3]);
        assert!(matches!(result, Err(ZplError::InvalidArgument(_))));
    }

    #[test]
    fn test_from_packed_padding() {
        // 10 pixels wide -> 2 bytes per row, the last 6 bits are padding
        let bitmap = MonoBitmap::from_packed(10, 2, &[0xFF, 0xC0, 0x00, 0x40]).unwrap();
        assert!(bitmap.rows().next().unwrap().iter().all(|t| t.is_black()));
        assert_eq!(bitmap.black_count(), 11);
        assert_eq!(bitmap.get(9, 1), Tone::Black);
        assert_eq!(bitmap.get(8, 1), Tone::White);
    }

    #[test]
    fn test_from_packed_wrong_length() {
        let result = MonoBitmap::from_packed(10, 2, &[0xFF, 0xC0]);
        assert!(matches!(result, Err(ZplError::InvalidArgument(_))));
    }

    #[test]
    fn test_rows_iterate_in_order() {
        let bitmap = MonoBitmap::from_fn(3, 2, |_, y| {
            if y == 1 { Tone::Black } else { Tone::White }
        })
        .unwrap();
        let rows: Vec<&[Tone]> = bitmap.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], &[Tone::White; 3]);
        assert_eq!(rows[1], &[Tone::Black; 3]);
    }

    #[test]
    fn test_gray_image_preview() {
        let mut bitmap = MonoBitmap::new(2, 1, Tone::White).unwrap();
        bitmap.set(1, 0, Tone::Black);
        let img = bitmap.to_gray_image();
        assert_eq!(img.get_pixel(0, 0).0, [255]);
        assert_eq!(img.get_pixel(1, 0).0, [0]);
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("000000").unwrap().0, [0, 0, 0, 255]);
        assert_eq!(parse_color("#00ff0080").unwrap().0, [0, 255, 0, 128]);
        assert!(parse_color("#fff").is_err());
        assert!(parse_color("zzzzzz").is_err());
    }
}

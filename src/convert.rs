//! # Raster to ZPL Conversion
//!
//! End-to-end pipeline from a decoded raster to label text:
//!
//! ```text
//! RgbaImage
//!   → shift::apply_shift          (label_top / label_shift)
//!   → dither::to_monochrome       (threshold + dithering)
//!   → hex::bitmap_to_hex          (bytes_per_row, binary_byte_count)
//!   → encoding::encode            (hex / compressed / :B64: / :Z64:)
//!   → commands::label             (^XA ... ^XZ, or the bare ^GFA field)
//! ```
//!
//! Every call is independent: no state survives between conversions, so
//! pages can be converted in parallel.
//!
//! ## Example
//!
//! ```
//! use image::{Rgba, RgbaImage};
//! use zplify::{ZplOptions, convert_bitmap};
//!
//! let image = RgbaImage::from_pixel(8, 1, Rgba([0, 0, 0, 255]));
//! let zpl = convert_bitmap(&image, &ZplOptions::default()).unwrap();
//! assert_eq!(zpl, "^XA^GFA,1,1,1,!^FS^XZ");
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use image::{DynamicImage, Rgba, RgbaImage};
use log::{debug, info};
use rayon::prelude::*;

use crate::error::ZplError;
use crate::options::ZplOptions;
use crate::protocol::{commands, encoding, hex};
use crate::raster::prepare::{RasterOptions, prepare};
use crate::raster::{MonoBitmap, Tone, ensure_dimensions};
use crate::render::{dither, shift};

/// Background behind shifted content when none is configured.
pub const DEFAULT_BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Shift and reduce an RGBA canvas to the bitmap that will be encoded.
pub fn reduce(
    image: &RgbaImage,
    options: &ZplOptions,
    background: Rgba<u8>,
) -> Result<MonoBitmap, ZplError> {
    ensure_dimensions(image.width() as usize, image.height() as usize)?;
    let canvas = shift::apply_shift(image, options.label_top, options.label_shift, background);
    dither::to_monochrome(&canvas, options.threshold, options.dithering)
}

/// Serialize, encode and wrap a monochrome bitmap.
fn encode_monochrome(bitmap: &MonoBitmap, options: &ZplOptions) -> Result<String, ZplError> {
    let hex = hex::bitmap_to_hex(bitmap);
    debug!(
        "{}x{} bitmap: {} bytes, {} per row",
        bitmap.width(),
        bitmap.height(),
        hex.binary_byte_count,
        hex.bytes_per_row
    );

    let payload = encoding::encode(&hex, options.encoding)?;
    let field = commands::graphic_field(hex.binary_byte_count, hex.bytes_per_row, &payload);
    if options.graphic_field_only {
        return Ok(field);
    }

    let length = options.set_label_length.then_some(hex.rows);
    Ok(commands::label(&field, length, options.print_quantity))
}

/// Convert an RGBA raster, filling shifted-in areas with white.
pub fn convert_bitmap(image: &RgbaImage, options: &ZplOptions) -> Result<String, ZplError> {
    convert_bitmap_with_background(image, options, DEFAULT_BACKGROUND)
}

/// Convert an RGBA raster with an explicit background for shifted-in areas.
pub fn convert_bitmap_with_background(
    image: &RgbaImage,
    options: &ZplOptions,
    background: Rgba<u8>,
) -> Result<String, ZplError> {
    let bitmap = reduce(image, options, background)?;
    encode_monochrome(&bitmap, options)
}

/// Prepare a decoded image (rotate, resize, flatten) and convert it.
pub fn convert_image(
    image: &DynamicImage,
    raster: &RasterOptions,
    options: &ZplOptions,
) -> Result<String, ZplError> {
    let canvas = prepare(image, raster)?;
    convert_bitmap_with_background(&canvas, options, raster.background_rgba())
}

/// Convert a bitmap that is already black and white.
///
/// Threshold and dithering do not apply; the label offsets still do, with
/// white filling the uncovered area.
pub fn convert_monochrome(bitmap: &MonoBitmap, options: &ZplOptions) -> Result<String, ZplError> {
    ensure_dimensions(bitmap.width(), bitmap.height())?;
    let shifted = shift::apply_shift_mono(
        bitmap,
        options.label_top,
        options.label_shift,
        Tone::White,
    );
    encode_monochrome(&shifted, options)
}

/// Convert one page of a multi-page source.
pub fn convert_page(
    pages: &[RgbaImage],
    index: usize,
    options: &ZplOptions,
) -> Result<String, ZplError> {
    let page = pages.get(index).ok_or(ZplError::PageOutOfRange {
        index,
        count: pages.len(),
    })?;
    convert_bitmap(page, options)
}

/// Lazily convert pages one at a time.
///
/// ```
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// use image::{Rgba, RgbaImage};
/// use zplify::{ZplOptions, convert_pages};
///
/// let pages = vec![RgbaImage::from_pixel(8, 1, Rgba([0, 0, 0, 255])); 3];
/// let cancel = AtomicBool::new(false);
///
/// let mut iter = convert_pages(&pages, ZplOptions::default()).with_cancel(&cancel);
/// assert!(iter.next().is_some());
/// cancel.store(true, Ordering::Relaxed);
/// assert!(iter.next().is_none());
/// ```
pub fn convert_pages(pages: &[RgbaImage], options: ZplOptions) -> Pages<'_> {
    Pages {
        pages,
        options,
        next: 0,
        cancel: None,
    }
}

/// Iterator returned by [`convert_pages`].
///
/// The cancel flag is checked before each page; a page already in progress
/// always completes.
pub struct Pages<'a> {
    pages: &'a [RgbaImage],
    options: ZplOptions,
    next: usize,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> Pages<'a> {
    pub fn with_cancel(mut self, cancel: &'a AtomicBool) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

impl Iterator for Pages<'_> {
    type Item = Result<String, ZplError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.pages.len() {
            return None;
        }
        if self.cancelled() {
            info!(
                "conversion cancelled after {} of {} pages",
                self.next,
                self.pages.len()
            );
            self.next = self.pages.len();
            return None;
        }

        let index = self.next;
        self.next += 1;
        debug!("converting page {}/{}", index + 1, self.pages.len());
        Some(convert_page(self.pages, index, &self.options))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.pages.len() - self.next))
    }
}

/// Convert all pages on the rayon pool, preserving page order.
pub fn convert_pages_parallel(
    pages: &[RgbaImage],
    options: &ZplOptions,
) -> Result<Vec<String>, ZplError> {
    info!("converting {} pages in parallel", pages.len());
    pages
        .par_iter()
        .map(|page| convert_bitmap(page, options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::encoding::EncodingKind;

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn black(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, BLACK)
    }

    #[test]
    fn test_black_byte() {
        let zpl = convert_bitmap(&black(8, 1), &ZplOptions::default()).unwrap();
        assert_eq!(zpl, "^XA^GFA,1,1,1,!^FS^XZ");
    }

    #[test]
    fn test_hex_keeps_row_separator() {
        let options = ZplOptions::default().encoding(EncodingKind::Hexadecimal);
        let zpl = convert_bitmap(&black(8, 1), &options).unwrap();
        assert_eq!(zpl, "^XA^GFA,1,1,1,FF\n^FS^XZ");
    }

    #[test]
    fn test_label_length_uses_height() {
        let options = ZplOptions::default().set_label_length(true);
        let zpl = convert_bitmap(&black(8, 3), &options).unwrap();
        assert_eq!(zpl, "^XA^LL3^GFA,3,3,1,!::^FS^XZ");
    }

    #[test]
    fn test_graphic_field_only() {
        let options = ZplOptions::default()
            .graphic_field_only(true)
            .set_label_length(true)
            .print_quantity(4);
        let zpl = convert_bitmap(&black(8, 1), &options).unwrap();
        assert_eq!(zpl, "^GFA,1,1,1,!");
    }

    #[test]
    fn test_empty_raster_is_invalid() {
        let empty = RgbaImage::new(0, 5);
        assert!(matches!(
            convert_bitmap(&empty, &ZplOptions::default()),
            Err(ZplError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_shift_uses_background() {
        // Content moved down one row; the new top row takes the background
        let options = ZplOptions::default().label_top(1);
        let zpl = convert_bitmap_with_background(&black(8, 2), &options, BLACK).unwrap();
        assert_eq!(zpl, "^XA^GFA,2,2,1,!:^FS^XZ");

        let zpl = convert_bitmap_with_background(&black(8, 2), &options, WHITE).unwrap();
        assert_eq!(zpl, "^XA^GFA,2,2,1,,!^FS^XZ");
    }

    #[test]
    fn test_monochrome_input() {
        let bitmap = MonoBitmap::from_packed(16, 2, &[0xFF, 0xFF, 0x00, 0x00]).unwrap();
        let zpl = convert_monochrome(&bitmap, &ZplOptions::default()).unwrap();
        assert_eq!(zpl, "^XA^GFA,4,4,2,!,^FS^XZ");
    }

    #[test]
    fn test_convert_image_resizes() {
        let image = DynamicImage::ImageRgba8(black(4, 4));
        let raster = RasterOptions::default().width(16).height(2);
        let zpl = convert_image(&image, &raster, &ZplOptions::default()).unwrap();
        assert_eq!(zpl, "^XA^GFA,4,4,2,!:^FS^XZ");
    }

    #[test]
    fn test_page_out_of_range() {
        let pages = vec![black(8, 1)];
        assert!(convert_page(&pages, 0, &ZplOptions::default()).is_ok());
        assert!(matches!(
            convert_page(&pages, 1, &ZplOptions::default()),
            Err(ZplError::PageOutOfRange { index: 1, count: 1 })
        ));
    }

    #[test]
    fn test_pages_iterator() {
        let pages = vec![black(8, 1), RgbaImage::from_pixel(8, 1, WHITE)];
        let out: Vec<String> = convert_pages(&pages, ZplOptions::default())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(out, vec!["^XA^GFA,1,1,1,!^FS^XZ", "^XA^GFA,1,1,1,,^FS^XZ"]);
    }

    #[test]
    fn test_pages_cancelled_before_start() {
        let pages = vec![black(8, 1); 4];
        let cancel = AtomicBool::new(true);
        let mut iter = convert_pages(&pages, ZplOptions::default()).with_cancel(&cancel);
        assert!(iter.next().is_none());
        // Stays finished even if the flag is cleared
        cancel.store(false, Ordering::Relaxed);
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let pages: Vec<RgbaImage> = (1..=6).map(|h| black(8 * h, h)).collect();
        let options = ZplOptions::default();
        let sequential: Vec<String> = convert_pages(&pages, options)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(convert_pages_parallel(&pages, &options).unwrap(), sequential);
    }
}

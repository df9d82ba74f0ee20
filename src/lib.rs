//! # Zplify - Raster to ZPL II Graphic Field Library
//!
//! Zplify turns decoded images into ZPL II label text for Zebra-compatible
//! thermal label printers. It provides:
//!
//! - **Monochrome reduction**: threshold, Floyd-Steinberg and Atkinson dithering
//! - **Graphic field serialization**: packed hex rows with byte counts
//! - **ZPL compression**: the printer's run-length ASCII compression scheme
//! - **Transport encodings**: hex, compressed hex, `:B64:` and `:Z64:` with CRC
//! - **Label assembly**: `^XA`/`^LL`/`^GFA`/`^FS`/`^PQ`/`^XZ`
//!
//! ## Quick Start
//!
//! ```
//! use image::{Rgba, RgbaImage};
//! use zplify::{DitheringAlgorithm, EncodingKind, ZplOptions, convert_bitmap};
//!
//! // A 16x4 canvas, top half black
//! let image = RgbaImage::from_fn(16, 4, |_, y| {
//!     if y < 2 { Rgba([0, 0, 0, 255]) } else { Rgba([255, 255, 255, 255]) }
//! });
//!
//! let options = ZplOptions::default()
//!     .encoding(EncodingKind::HexadecimalCompressed)
//!     .dithering(DitheringAlgorithm::None)
//!     .set_label_length(true);
//!
//! let zpl = convert_bitmap(&image, &options)?;
//! assert_eq!(zpl, "^XA^LL4^GFA,8,8,2,!:,:^FS^XZ");
//!
//! # Ok::<(), zplify::ZplError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`convert`] | End-to-end conversion and page batches |
//! | [`options`] | Conversion options and config files |
//! | [`raster`] | Monochrome bitmaps and image preparation |
//! | [`render`] | Shifting and dithering |
//! | [`protocol`] | Hex, compression, encodings and ZPL commands |
//! | [`error`] | Error types |
//!
//! ## Printer Resolution
//!
//! Sizes are in printer dots. The default 203 DPI matches most desktop
//! Zebra printheads (8 dots/mm); use [`RasterOptions::dpi`] for 300 or
//! 600 DPI heads.

pub mod convert;
pub mod error;
pub mod options;
pub mod protocol;
pub mod raster;
pub mod render;

// Re-exports for convenience
pub use convert::{
    Pages, convert_bitmap, convert_bitmap_with_background, convert_image, convert_monochrome,
    convert_page, convert_pages, convert_pages_parallel,
};
pub use error::ZplError;
pub use options::{ConvertConfig, ZplOptions};
pub use protocol::encoding::EncodingKind;
pub use raster::prepare::{RasterOptions, Rotation};
pub use raster::{MonoBitmap, Tone};
pub use render::dither::DitheringAlgorithm;

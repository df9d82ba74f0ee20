//! # Rendering Module
//!
//! Pixel-level transforms applied before a canvas is serialized.
//!
//! ## Modules
//!
//! - [`shift`]: Moves content for `label_top` / `label_shift`
//! - [`dither`]: Threshold and error-diffusion reduction to 1-bit
//!
//! ## Order
//!
//! ```text
//! RgbaImage → shift::apply_shift → dither::to_monochrome → MonoBitmap
//! ```
//!
//! Shifting must come first so the background pixels it introduces are
//! thresholded (and dithered) together with the content.

pub mod dither;
pub mod shift;

//! # Label Position Shift
//!
//! Moves label content inside a canvas of the same size before it is reduced
//! to monochrome, so that uncovered areas are filled with the background and
//! take part in thresholding like any other pixel.
//!
//! ```text
//! label_top = 2, label_shift = -3        (content drawn at x = 3, y = 2)
//!
//! ┌──────────┐      ┌──────────┐
//! │██████████│      │░░░░░░░░░░│
//! │██████████│  →   │░░░░░░░░░░│
//! │██████████│      │░░░███████│
//! └──────────┘      └──────────┘
//! ```
//!
//! Content pushed past the right or bottom edge is cropped.
//!
//! ## Ranges
//!
//! | Offset | Accepted | Clamped to |
//! |--------|----------|------------|
//! | `label_top` | any `i8` | `0..=120` dot rows |
//! | `label_shift` | any `i16` | `-9999..=0` dots |
//!
//! When both clamped offsets are zero the input is returned as-is without
//! allocating.

use std::borrow::Cow;

use image::{Rgba, RgbaImage, imageops};
use log::debug;

use crate::raster::{MonoBitmap, Tone};

pub const MAX_LABEL_TOP: i8 = 120;
pub const MIN_LABEL_SHIFT: i16 = -9999;

#[inline]
pub fn clamp_label_top(label_top: i8) -> i8 {
    label_top.clamp(0, MAX_LABEL_TOP)
}

#[inline]
pub fn clamp_label_shift(label_shift: i16) -> i16 {
    label_shift.clamp(MIN_LABEL_SHIFT, 0)
}

/// Canvas offset `(dx, dy)` for the given options, or `None` for identity.
pub fn offsets(label_top: i8, label_shift: i16) -> Option<(i64, i64)> {
    let top = clamp_label_top(label_top);
    let shift = clamp_label_shift(label_shift);
    if top == 0 && shift == 0 {
        None
    } else {
        Some((-(shift as i64), top as i64))
    }
}

/// Composite `image` at the clamped offset onto a canvas filled with `background`.
pub fn apply_shift(
    image: &RgbaImage,
    label_top: i8,
    label_shift: i16,
    background: Rgba<u8>,
) -> Cow<'_, RgbaImage> {
    let Some((dx, dy)) = offsets(label_top, label_shift) else {
        return Cow::Borrowed(image);
    };

    debug!("shifting {}x{} canvas by ({}, {})", image.width(), image.height(), dx, dy);

    let mut canvas = RgbaImage::from_pixel(image.width(), image.height(), background);
    imageops::overlay(&mut canvas, image, dx, dy);
    Cow::Owned(canvas)
}

/// Same as [`apply_shift`] for input that is already monochrome.
pub fn apply_shift_mono(
    bitmap: &MonoBitmap,
    label_top: i8,
    label_shift: i16,
    background: Tone,
) -> Cow<'_, MonoBitmap> {
    let Some((dx, dy)) = offsets(label_top, label_shift) else {
        return Cow::Borrowed(bitmap);
    };
    let (dx, dy) = (dx as usize, dy as usize);

    let mut canvas = bitmap.clone();
    for y in 0..bitmap.height() {
        for x in 0..bitmap.width() {
            let tone = if x >= dx && y >= dy {
                bitmap.get(x - dx, y - dy)
            } else {
                background
            };
            canvas.set(x, y, tone);
        }
    }
    Cow::Owned(canvas)
}

//! # Raster Preparation
//!
//! Turns a decoded image into the RGBA canvas the encoder consumes:
//!
//! ```text
//! DynamicImage → rotate → resize → flatten alpha onto background → RgbaImage
//! ```
//!
//! Rotation happens before resizing so that `width`/`height` always describe
//! the final label orientation.

use std::str::FromStr;

use image::{DynamicImage, Rgba, RgbaImage, imageops::FilterType};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ZplError;

/// Most Zebra desktop printheads are 8 dots/mm.
pub const DEFAULT_DPI: u32 = 203;

/// Rotation in 90 degree steps (clockwise).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    #[serde(rename = "0")]
    Rotate0,
    #[serde(rename = "90")]
    Rotate90,
    #[serde(rename = "180")]
    Rotate180,
    #[serde(rename = "270")]
    Rotate270,
}

impl FromStr for Rotation {
    type Err = ZplError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" | "360" => Ok(Rotation::Rotate0),
            "90" | "-270" => Ok(Rotation::Rotate90),
            "180" | "-180" => Ok(Rotation::Rotate180),
            "270" | "-90" => Ok(Rotation::Rotate270),
            other => Err(ZplError::InvalidArgument(format!(
                "unsupported rotation '{}' (expected 0, 90, 180 or 270)",
                other
            ))),
        }
    }
}

/// How a decoded image is turned into label dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterOptions {
    /// Printer resolution, used to convert millimetres into dots
    pub dpi: u32,
    /// Target width in dots (`None` keeps the source width)
    pub width: Option<u32>,
    /// Target height in dots (`None` keeps the source height)
    pub height: Option<u32>,
    /// Derive the missing dimension (or fit inside both) from the aspect ratio
    pub with_aspect_ratio: bool,
    pub rotation: Rotation,
    /// RGBA colour under transparent pixels and behind shifted content
    pub background: [u8; 4],
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            width: None,
            height: None,
            with_aspect_ratio: false,
            rotation: Rotation::Rotate0,
            background: [255, 255, 255, 255],
        }
    }
}

impl RasterOptions {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn width(mut self, dots: u32) -> Self {
        self.width = Some(dots);
        self
    }

    pub fn height(mut self, dots: u32) -> Self {
        self.height = Some(dots);
        self
    }

    pub fn with_aspect_ratio(mut self) -> Self {
        self.with_aspect_ratio = true;
        self
    }

    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn background(mut self, color: Rgba<u8>) -> Self {
        self.background = color.0;
        self
    }

    pub fn background_rgba(&self) -> Rgba<u8> {
        Rgba(self.background)
    }

    /// Convert a physical length into printer dots.
    ///
    /// ```
    /// use zplify::raster::prepare::RasterOptions;
    ///
    /// // 203 DPI is ~8 dots/mm
    /// assert_eq!(RasterOptions::default().dots_for_mm(50.0), 400);
    /// ```
    pub fn dots_for_mm(&self, mm: f32) -> u32 {
        (mm / 25.4 * self.dpi as f32).round().max(0.0) as u32
    }

    /// Final (width, height) for a source of the given size after rotation.
    fn target_size(&self, source_width: u32, source_height: u32) -> (u32, u32) {
        let aspect = source_height as f64 / source_width as f64;
        match (self.width, self.height, self.with_aspect_ratio) {
            (Some(w), Some(h), _) => (w, h),
            (Some(w), None, true) => (w, (w as f64 * aspect).round() as u32),
            (None, Some(h), true) => ((h as f64 / aspect).round() as u32, h),
            (w, h, _) => (w.unwrap_or(source_width), h.unwrap_or(source_height)),
        }
    }
}

/// Rotate, resize and flatten an image according to `options`.
pub fn prepare(image: &DynamicImage, options: &RasterOptions) -> Result<RgbaImage, ZplError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(ZplError::InvalidArgument("source image is empty".to_string()));
    }

    let rotated = match options.rotation {
        Rotation::Rotate0 => image.clone(),
        Rotation::Rotate90 => image.rotate90(),
        Rotation::Rotate180 => image.rotate180(),
        Rotation::Rotate270 => image.rotate270(),
    };

    let (width, height) = options.target_size(rotated.width(), rotated.height());
    if width == 0 || height == 0 {
        return Err(ZplError::InvalidArgument(format!(
            "target size {}x{} is empty",
            width, height
        )));
    }

    let resized = if (width, height) == (rotated.width(), rotated.height()) {
        rotated
    } else if options.with_aspect_ratio && options.width.is_some() && options.height.is_some() {
        // Fit inside the box
        rotated.resize(width, height, FilterType::Lanczos3)
    } else {
        rotated.resize_exact(width, height, FilterType::Lanczos3)
    };

    debug!(
        "prepared raster {}x{} -> {}x{} ({:?})",
        image.width(),
        image.height(),
        resized.width(),
        resized.height(),
        options.rotation
    );

    let mut rgba = resized.to_rgba8();
    flatten_alpha(&mut rgba, options.background_rgba());
    Ok(rgba)
}

/// Composite every pixel over `background` and make it opaque.
///
/// A translucent background is itself composited over white first, the way
/// it would look on label stock.
pub fn flatten_alpha(image: &mut RgbaImage, background: Rgba<u8>) {
    let bg = over(background, [255, 255, 255]);
    for pixel in image.pixels_mut() {
        let rgb = over(*pixel, bg);
        *pixel = Rgba([rgb[0], rgb[1], rgb[2], 255]);
    }
}

#[inline]
fn over(top: Rgba<u8>, bottom: [u8; 3]) -> [u8; 3] {
    let alpha = top[3] as u32;
    let mut out = [0u8; 3];
    for c in 0..3 {
        out[c] = ((top[c] as u32 * alpha + bottom[c] as u32 * (255 - alpha) + 127) / 255) as u8;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255])))
    }

    #[test]
    fn test_rotation_parse() {
        assert_eq!("90".parse::<Rotation>().unwrap(), Rotation::Rotate90);
        assert_eq!("-90".parse::<Rotation>().unwrap(), Rotation::Rotate270);
        assert!("45".parse::<Rotation>().is_err());
    }

    #[test]
    fn test_rotation_swaps_dimensions() {
        let options = RasterOptions::default().rotation(Rotation::Rotate90);
        let out = prepare(&sample(30, 10), &options).unwrap();
        assert_eq!(out.dimensions(), (10, 30));
    }

    #[test]
    fn test_resize_keeps_aspect_ratio() {
        let options = RasterOptions::default().width(50).with_aspect_ratio();
        let out = prepare(&sample(100, 40), &options).unwrap();
        assert_eq!(out.dimensions(), (50, 20));

        let options = RasterOptions::default().height(10).with_aspect_ratio();
        let out = prepare(&sample(100, 40), &options).unwrap();
        assert_eq!(out.dimensions(), (25, 10));
    }

    #[test]
    fn test_resize_exact_without_aspect_ratio() {
        let options = RasterOptions::default().width(50);
        let out = prepare(&sample(100, 40), &options).unwrap();
        assert_eq!(out.dimensions(), (50, 40));
    }

    #[test]
    fn test_fit_inside_box() {
        let options = RasterOptions::default().width(50).height(50).with_aspect_ratio();
        let out = prepare(&sample(100, 40), &options).unwrap();
        assert_eq!(out.dimensions(), (50, 20));
    }

    #[test]
    fn test_zero_target_rejected() {
        let options = RasterOptions::default().width(0);
        assert!(matches!(
            prepare(&sample(10, 10), &options),
            Err(ZplError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_flatten_transparent_onto_background() {
        let mut img = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0]));
        flatten_alpha(&mut img, Rgba([255, 0, 0, 255]));
        assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);

        let mut img = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));
        flatten_alpha(&mut img, Rgba([255, 255, 255, 255]));
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_translucent_background_over_white() {
        let mut img = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0]));
        flatten_alpha(&mut img, Rgba([0, 0, 0, 0]));
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_dots_for_mm() {
        let options = RasterOptions::default().dpi(300);
        assert_eq!(options.dots_for_mm(25.4), 300);
    }
}

//! # Conversion Options
//!
//! [`ZplOptions`] controls how a raster becomes ZPL. It is a plain value type
//! with consuming builder methods, and loads from JSON through serde:
//!
//! ```
//! use zplify::{EncodingKind, ZplOptions};
//!
//! let options = ZplOptions::default()
//!     .encoding(EncodingKind::Base64Compressed)
//!     .set_label_length(true)
//!     .print_quantity(2);
//! assert_eq!(options.threshold, 128);
//! ```
//!
//! [`ConvertConfig`] bundles it with [`RasterOptions`] for config files:
//!
//! ```json
//! {
//!   "zpl": { "encoding": "base64-compressed", "dithering": "atkinson" },
//!   "raster": { "dpi": 300, "width": 812, "with_aspect_ratio": true }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ZplError;
use crate::protocol::encoding::EncodingKind;
use crate::raster::prepare::RasterOptions;
use crate::render::dither::{DEFAULT_THRESHOLD, DitheringAlgorithm};

/// Options for one conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZplOptions {
    /// Graphic field payload encoding
    pub encoding: EncodingKind,
    /// Return only the `^GFA,...` field instead of a full label
    pub graphic_field_only: bool,
    /// Emit `^LL<height>` so the label ends with the graphic
    pub set_label_length: bool,
    /// Luminance at or above which a pixel is white
    pub threshold: u8,
    pub dithering: DitheringAlgorithm,
    /// `^PQ` copies; 0 omits the directive
    pub print_quantity: u32,
    /// Dot rows to move the content down (clamped to 0..=120)
    pub label_top: i8,
    /// Dots to move the content right, given as a non-positive value
    /// (clamped to -9999..=0)
    pub label_shift: i16,
}

impl Default for ZplOptions {
    fn default() -> Self {
        Self {
            encoding: EncodingKind::default(),
            graphic_field_only: false,
            set_label_length: false,
            threshold: DEFAULT_THRESHOLD,
            dithering: DitheringAlgorithm::None,
            print_quantity: 0,
            label_top: 0,
            label_shift: 0,
        }
    }
}

impl ZplOptions {
    pub fn encoding(mut self, encoding: EncodingKind) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn graphic_field_only(mut self, enabled: bool) -> Self {
        self.graphic_field_only = enabled;
        self
    }

    pub fn set_label_length(mut self, enabled: bool) -> Self {
        self.set_label_length = enabled;
        self
    }

    pub fn threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn dithering(mut self, algorithm: DitheringAlgorithm) -> Self {
        self.dithering = algorithm;
        self
    }

    pub fn print_quantity(mut self, quantity: u32) -> Self {
        self.print_quantity = quantity;
        self
    }

    pub fn label_top(mut self, dots: i8) -> Self {
        self.label_top = dots;
        self
    }

    pub fn label_shift(mut self, dots: i16) -> Self {
        self.label_shift = dots;
        self
    }
}

/// Config file contents: conversion plus raster preparation options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    pub zpl: ZplOptions,
    pub raster: RasterOptions,
}

impl ConvertConfig {
    pub fn from_json(json: &str) -> Result<Self, ZplError> {
        serde_json::from_str(json).map_err(|e| ZplError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, ZplError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json).map_err(|e| match e {
            ZplError::Config(msg) => ZplError::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }
}

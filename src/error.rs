//! # Error Types
//!
//! This module defines error types used throughout the zplify library.

use thiserror::Error;

/// Main error type for zplify operations
#[derive(Debug, Error)]
pub enum ZplError {
    /// Missing, empty or unrecognized input (empty raster, unknown encoding name, ...)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A page was requested that the source does not have
    #[error("Page {index} is out of range ({count} pages available)")]
    PageOutOfRange { index: usize, count: usize },

    /// Hex bitmap text that cannot be turned into bytes
    #[error("Invalid hex data: {0}")]
    InvalidHex(String),

    /// ASCII-compressed graphic field data that cannot be expanded
    #[error("Invalid compressed data: {0}")]
    InvalidCompressed(String),

    /// Image decoding or preparation error
    #[error("Image error: {0}")]
    Image(String),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

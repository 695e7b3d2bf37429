//! Unified error types for fontify_engine

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for fontify_engine operations
#[derive(Debug, Error)]
pub enum FontifyError {
    // === I/O Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to open sheet '{path}': {message}")]
    OpenSheet { path: PathBuf, message: String },

    #[error("Failed to list sheets: {0}")]
    Walk(#[from] walkdir::Error),

    // === Sheet Errors ===
    #[error("Sheet '{sheet}' has width {width}, which is not divisible by 8, 9 or 10")]
    UnsupportedSheetWidth { sheet: String, width: u32 },

    #[error("Stride {stride} does not divide the width {width} of sheet '{sheet}'")]
    StrideMismatch { sheet: String, stride: u32, width: u32 },

    #[error("Invalid stride {stride}, expected 8, 9 or 10")]
    InvalidStride { stride: u32 },

    #[error("Sheet data length mismatch: expected {expected}, got {actual}")]
    SheetSizeMismatch { expected: usize, actual: usize },

    #[error("Sheet '{sheet}' has ink outside the glyph area at x: {x}, y: {y} (width {width})")]
    InkOutsideInterior { sheet: String, x: u32, y: u32, width: u32 },

    // === Index Errors ===
    #[error("No glyphs found, nothing to index")]
    EmptyGlyphSet,

    #[error("Invalid index file: {message}")]
    InvalidIndexFile { message: String },

    // === Output Errors ===
    #[error("Failed to create image buffer")]
    ImageBufferCreationFailed,

    // === External Errors ===
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type alias for fontify_engine operations
pub type Result<T> = std::result::Result<T, FontifyError>;

impl FontifyError {
    /// Create an error for a sheet the image codec could not decode
    pub fn open_sheet(path: impl Into<PathBuf>, msg: impl std::fmt::Display) -> Self {
        Self::OpenSheet {
            path: path.into(),
            message: msg.to_string(),
        }
    }

    /// Create an error for a malformed persisted index
    pub fn invalid_index(msg: impl Into<String>) -> Self {
        Self::InvalidIndexFile { message: msg.into() }
    }
}

//! Error types for the raster surface.

use thiserror::Error;

/// Result type for raster operations.
pub type RasterResult<T> = Result<T, RasterError>;

/// Errors that can occur while drawing or encoding.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Invalid surface dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Invalid font specification: {0}")]
    FontParseError(String),

    #[error("Invalid color: {0}")]
    ColorParseError(String),

    #[error("Image data has {len} bytes, expected {width}x{height}x4")]
    InvalidImage { width: u32, height: u32, len: usize },

    #[error("PNG encoding error: {0}")]
    PngError(String),
}

impl From<png::EncodingError> for RasterError {
    fn from(err: png::EncodingError) -> Self {
        RasterError::PngError(err.to_string())
    }
}

//! Error types for stereodepth.

use thiserror::Error;

/// Errors that can occur when building grids or running the pipeline.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StereoError {
    /// A grid was constructed with a zero width or height.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// The flat buffer length does not match `width * height`.
    #[error("buffer length {got} does not match {width}x{height} grid")]
    BufferSizeMismatch {
        width: usize,
        height: usize,
        got: usize,
    },
    /// Two grids being zipped or compared have different shapes.
    #[error("shape mismatch: {left_width}x{left_height} vs {right_width}x{right_height}")]
    ShapeMismatch {
        left_width: usize,
        left_height: usize,
        right_width: usize,
        right_height: usize,
    },
    /// A configuration value failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// An image could not be decoded or encoded.
    #[error("image i/o failed: {reason}")]
    ImageIo { reason: String },
}

/// Result alias for stereodepth operations.
pub type StereoResult<T> = std::result::Result<T, StereoError>;

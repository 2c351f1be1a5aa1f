//! Error types for plate rendering.

use thiserror::Error;

/// Result type alias for render operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Failures that abort the current request. Font resolution is absent on
/// purpose: it recovers through the fallback chain and terminates in the
/// embedded face, so it never surfaces here.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The background image is missing, unreadable or not a supported format.
    #[error("background image error: {0}")]
    Background(#[from] image::ImageError),

    /// Encoding the composited canvas as PNG failed.
    #[error("PNG encode error: {0}")]
    Encode(#[from] png::EncodingError),

    /// Output directory creation or file write failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

//! Render and export errors.

use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid surface size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("Embedded font could not be parsed: {0}")]
    Font(#[from] ab_glyph::InvalidFont),
    #[error("Pixel buffer has {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

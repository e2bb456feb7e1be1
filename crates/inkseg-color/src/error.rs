//! Error types for inkseg-color

use thiserror::Error;

/// Errors that can occur during binarization
#[derive(Debug, Error)]
pub enum ColorError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] inkseg_core::Error),

    /// Filter error from a pre-threshold blur
    #[error("filter error: {0}")]
    Filter(#[from] inkseg_filter::FilterError),

    /// Unsupported channel layout for this operation
    #[error("unsupported channels: expected {expected}, got {actual}")]
    UnsupportedChannels { expected: &'static str, actual: u32 },

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for color operations
pub type ColorResult<T> = Result<T, ColorError>;

pub(crate) fn check_grayscale(pix: &inkseg_core::Pix) -> ColorResult<()> {
    if pix.is_gray() {
        Ok(())
    } else {
        Err(ColorError::UnsupportedChannels {
            expected: "1 (gray)",
            actual: pix.channels().count(),
        })
    }
}

pub(crate) fn check_rgb(pix: &inkseg_core::Pix) -> ColorResult<()> {
    if pix.is_gray() {
        Err(ColorError::UnsupportedChannels {
            expected: "3 (rgb)",
            actual: pix.channels().count(),
        })
    } else {
        Ok(())
    }
}

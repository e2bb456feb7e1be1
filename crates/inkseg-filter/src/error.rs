//! Error types for inkseg-filter

use thiserror::Error;

/// Errors that can occur during filtering operations
#[derive(Debug, Error)]
pub enum FilterError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] inkseg_core::Error),

    /// Invalid kernel
    #[error("invalid kernel: {0}")]
    InvalidKernel(String),

    /// Unsupported channel layout for this operation
    #[error("unsupported channels: expected {expected}, got {actual}")]
    UnsupportedChannels {
        /// Expected layout description
        expected: &'static str,
        /// Actual samples per pixel
        actual: u32,
    },

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;

pub(crate) fn check_grayscale(pix: &inkseg_core::Pix) -> FilterResult<()> {
    if pix.is_gray() {
        Ok(())
    } else {
        Err(FilterError::UnsupportedChannels {
            expected: "1 (gray)",
            actual: pix.channels().count(),
        })
    }
}

pub(crate) fn check_odd_window(size: u32) -> FilterResult<()> {
    if size == 0 || size % 2 == 0 {
        return Err(FilterError::InvalidParameters(format!(
            "window size must be odd and positive, got {size}"
        )));
    }
    Ok(())
}

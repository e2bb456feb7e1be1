//! Error types for inkseg-segment

use thiserror::Error;

/// Errors that can occur while segmenting an image
///
/// Only malformed input and misconfiguration are errors. An image with
/// no foreground produces an empty table, and an untrustworthy largest
/// component is reported as `None`.
#[derive(Debug, Error)]
pub enum SegmentError {
    /// Degenerate image or unusable configuration
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] inkseg_core::Error),

    /// Filter error
    #[error("filter error: {0}")]
    Filter(#[from] inkseg_filter::FilterError),

    /// Morphology error
    #[error("morphology error: {0}")]
    Morph(#[from] inkseg_morph::MorphError),

    /// Region processing error
    #[error("region error: {0}")]
    Region(#[from] inkseg_region::RegionError),

    /// Binarization error
    #[error("threshold error: {0}")]
    Color(#[from] inkseg_color::ColorError),
}

/// Result type for segmentation operations
pub type SegmentResult<T> = Result<T, SegmentError>;

/// Report an option error as invalid input.
pub(crate) fn invalid(err: impl std::fmt::Display) -> SegmentError {
    SegmentError::InvalidInput(err.to_string())
}

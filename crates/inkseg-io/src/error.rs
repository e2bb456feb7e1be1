//! I/O error types
//!
//! Decoder and encoder failures from the `image` crate, file-system
//! errors and core geometry errors are folded into one `IoError`.

use thiserror::Error;

/// Error type for image I/O operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// Standard I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Decoding or encoding failed
    #[error("image codec error: {0}")]
    Codec(#[from] image::ImageError),

    /// The decoded buffer could not be turned into a core container
    #[error("core error: {0}")]
    Core(#[from] inkseg_core::Error),

    /// The image data is structurally invalid
    #[error("invalid image data: {0}")]
    InvalidData(String),
}

/// Result type for I/O operations
pub type IoResult<T> = Result<T, IoError>;

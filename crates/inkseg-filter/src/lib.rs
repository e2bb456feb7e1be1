//! inkseg-filter - Gray-image filters
//!
//! The thresholding stages need a handful of neighborhood filters:
//!
//! - Median filtering (noise suppression before thresholding)
//! - Block (box) means over an integral image
//! - Separable Gaussian smoothing
//! - The 3x3 Laplacian (signed second derivative)
//!
//! Filters that feed a threshold comparison return an [`FPix`] so no
//! precision is lost to rounding before the comparison.
//!
//! [`FPix`]: inkseg_core::FPix

pub mod block_conv;
pub mod convolve;
pub mod edge;
mod error;
pub mod kernel;
pub mod rank;

pub use error::{FilterError, FilterResult};
pub use kernel::Kernel;

pub use block_conv::{IntegralImage, block_mean};
pub use convolve::{convolve_sep, gaussian_blur, gaussian_sigma_for_size};
pub use edge::laplacian;
pub use rank::{median_filter, rank_filter};

//! inkseg-color - Binarization strategies
//!
//! This crate turns gray or color captures into foreground masks:
//!
//! - **Thresholding** ([`threshold`]): fixed inverse threshold,
//!   fixed-intensity search, Otsu's method, adaptive thresholding
//! - **Segmentation** ([`segment`]): two-cluster (k = 2) color split,
//!   red-blue channel-difference threshold
//!
//! Every function returns a [`Mask`](inkseg_core::Mask) in which ink is
//! foreground.

pub mod error;
pub mod segment;
pub mod threshold;

// Re-export core types
pub use inkseg_core;

// Re-export error types
pub use error::{ColorError, ColorResult};

// Re-export threshold functions
pub use threshold::{
    // Types
    AdaptiveMethod,
    AdaptiveThresholdOptions,
    ThresholdSearch,
    ThresholdSearchOptions,
    // Functions
    adaptive_threshold,
    compute_otsu_threshold,
    fixed_threshold_search,
    otsu_from_histogram,
    threshold_inv,
    threshold_otsu,
};

// Re-export segmentation
pub use segment::{ClusterOptions, channel_difference_threshold, two_cluster_segment};

//! inkseg - Segmentation of printed ink lines
//!
//! Turns microscopy captures of 3D-printed ink lines into labeled
//! foreground components.
//!
//! # Overview
//!
//! - Binarization: fixed-intensity search, adaptive, Otsu, two-cluster,
//!   channel difference
//! - Morphological repair: nozzle exclusion, top sealing, close/open,
//!   sharp-edge removal, hole filling
//! - Component tables with erase/select operations
//! - Consensus of two independent segmentations
//!
//! # Example
//!
//! ```
//! use inkseg::segment::{SegmentOptions, Segmenter};
//! use inkseg::Pix;
//!
//! let pix = Pix::from_gray_fn(120, 100, |x, y| {
//!     if (30..90).contains(&x) && (25..75).contains(&y) { 40 } else { 220 }
//! })
//! .unwrap();
//! let seg = Segmenter::new(SegmentOptions::default())
//!     .unwrap()
//!     .segment(&pix)
//!     .unwrap();
//! assert!(seg.success());
//! assert_eq!(seg.table().len(), 1);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use inkseg_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use inkseg_color as color;
pub use inkseg_filter as filter;
pub use inkseg_io as io;
pub use inkseg_morph as morph;
pub use inkseg_region as region;
pub use inkseg_segment as segment;

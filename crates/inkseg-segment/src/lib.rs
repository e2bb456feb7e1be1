//! inkseg-segment - Ink-line segmentation engine
//!
//! Turns a capture of a printed ink line into labeled foreground
//! components, and reconciles two independent segmentations of the same
//! capture:
//!
//! - [`Thresholder`] - one or more binarization strategies, unioned
//! - [`MorphologicalRepairer`] - nozzle exclusion, top sealing,
//!   close/open, sharp-edge removal and hole filling
//! - [`ComponentTable`] - labeled components with erase/select operations
//!   and the main-component heuristic
//! - [`Segmenter`] - the per-image pipeline, with fallback plans
//! - [`combine`] - consensus of two masks
//!
//! # Example
//!
//! ```no_run
//! use inkseg_core::Pix;
//! use inkseg_segment::{SegmentOptions, Segmenter};
//!
//! # fn run(pix: &Pix) -> inkseg_segment::SegmentResult<()> {
//! let segmenter = Segmenter::new(SegmentOptions::default())?;
//! let mut seg = segmenter.segment(pix)?;
//! seg.table_mut().erase_border(5, true);
//! if let Some(main) = seg.table_mut().main_component() {
//!     println!("main component {main}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod combine;
pub mod config;
pub mod error;
pub mod nozzle;
pub mod repair;
pub mod segmenter;
pub mod table;
pub mod threshold;

// Re-export core types
pub use inkseg_core;

// Re-export error types
pub use error::{SegmentError, SegmentResult};

// Re-export configuration
pub use config::{
    CombineOptions, FillMode, RepairOptions, SegmentOptions, TableOptions, ThresholdOptions,
    ThresholdStrategy,
};

// Re-export pipeline stages
pub use combine::{Combined, combine};
pub use nozzle::{CropRect, NozzleMasker, NozzleMode, RectNozzle};
pub use repair::{
    MorphologicalRepairer, Repaired, clear_reflection_edges, close_vertical_top, fill,
};
pub use segmenter::{Segmentation, Segmenter};
pub use table::{ComponentRecord, ComponentTable, TrustLargest};
pub use threshold::{Thresholded, Thresholder};

// Re-export batch helpers
pub use batch::{combine_batch, segment_batch};

//! Batch processing
//!
//! Images share no state, so a batch is a plain parallel map on the
//! `rayon` pool. Results come back in input order, one per input; a
//! failing image does not stop the others.

use crate::SegmentResult;
use crate::combine::{Combined, combine};
use crate::config::CombineOptions;
use crate::segmenter::{Segmentation, Segmenter};
use inkseg_core::{Mask, Pix};
use rayon::prelude::*;
use tracing::debug;

/// Segment every image with the same segmenter.
pub fn segment_batch(
    images: &[Pix],
    segmenter: &Segmenter<'_>,
) -> Vec<SegmentResult<Segmentation>> {
    let results: Vec<_> = images.par_iter().map(|pix| segmenter.segment(pix)).collect();
    debug!(
        images = images.len(),
        failed = results.iter().filter(|r| r.is_err()).count(),
        "segment batch"
    );
    results
}

/// Combine every `(A, B)` mask pair with the same options.
pub fn combine_batch(
    pairs: &[(Mask, Mask)],
    options: &CombineOptions,
) -> Vec<SegmentResult<Combined>> {
    pairs
        .par_iter()
        .map(|(a, b)| combine(a, b, options))
        .collect()
}

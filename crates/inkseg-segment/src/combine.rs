//! Segment combiner
//!
//! Reconciles two segmentations of the same image, typically a
//! model-derived mask `A` and a classical mask `B`:
//!
//! 1. Each mask is labeled with the area floor; components overlapping
//!    the other mask are kept (`commonA`, `commonB`).
//! 2. `agreement = commonA & commonB`.
//! 3. `onlyA = commonA - commonB`, minus components starting near the top
//!    edge (reflections).
//! 4. `onlyB = commonB - commonA`, opened with disks, restricted to
//!    `commonA | commonB`, minus components above the artifact ceiling.
//! 5. The union of those three, with tiny gaps filled inside `A | B`, is
//!    labeled into the result table.

use crate::config::{CombineOptions, TableOptions};
use crate::error::invalid;
use crate::table::ComponentTable;
use crate::SegmentResult;
use inkseg_core::Mask;
use inkseg_morph::{dilate_disk, erode_disk};
use inkseg_region::{ConnectivityType, fill_holes_below};
use tracing::debug;

/// Consensus of two segmentations
#[derive(Debug, Clone)]
pub struct Combined {
    /// Final labeled result
    pub table: ComponentTable,
    /// Merged mask before the final labeling
    pub mask: Mask,
    /// First input
    pub mask_a: Mask,
    /// Second input
    pub mask_b: Mask,
    /// Pixels both endorsed regions share
    pub agreement: Mask,
    /// Filtered A-only contribution
    pub only_a: Mask,
    /// Filtered B-only contribution
    pub only_b: Mask,
    /// Raw symmetric difference of the endorsed regions
    pub disagreement: Mask,
}

impl Combined {
    pub fn success(&self) -> bool {
        self.table.success()
    }
}

/// Merge `mask_a` and `mask_b` into one consensus table.
///
/// # Errors
///
/// Returns [`SegmentError::InvalidInput`](crate::SegmentError) when the
/// masks differ in size.
pub fn combine(mask_a: &Mask, mask_b: &Mask, options: &CombineOptions) -> SegmentResult<Combined> {
    if !mask_a.sizes_equal(mask_b) {
        return Err(invalid(format!(
            "combiner inputs differ in size: {}x{} vs {}x{}",
            mask_a.width(),
            mask_a.height(),
            mask_b.width(),
            mask_b.height()
        )));
    }

    let floor = TableOptions::default().with_min_area(options.min_area);
    let table_a = ComponentTable::from_mask(mask_a, floor.clone())?;
    let table_b = ComponentTable::from_mask(mask_b, floor.clone())?;
    let common_a = table_a.common_mask(&table_b)?;
    let common_b = table_b.common_mask(&table_a)?;

    let agreement = common_a.and(&common_b)?;
    let endorsed = common_a.or(&common_b)?;
    let raw_a = common_a.subtract(&common_b)?;
    let raw_b = common_b.subtract(&common_a)?;
    let disagreement = raw_a.or(&raw_b)?;

    let unfiltered = TableOptions::default().with_min_area(0);
    let mut pieces_a = ComponentTable::from_mask(&raw_a, unfiltered.clone())?;
    pieces_a.erase_top_border(options.top_margin, false);
    let only_a = pieces_a.labels_bw().clone();

    let opened = dilate_disk(&erode_disk(&raw_b, options.erode_radius)?, options.dilate_radius)?;
    let mut pieces_b = ComponentTable::from_mask(&opened.and(&endorsed)?, unfiltered)?;
    pieces_b.erase_large(options.artifact_max_area, false);
    let only_b = pieces_b.labels_bw().clone();

    let mut merged = agreement.or(&only_a)?;
    merged.or_assign(&only_b)?;
    let merged = fill_holes_below(&merged, options.tiny_gap_area, ConnectivityType::EightWay)?
        .and(&mask_a.or(mask_b)?)?;

    let table = ComponentTable::from_mask(&merged, floor)?;
    debug!(
        agreement = agreement.count(),
        only_a = only_a.count(),
        only_b = only_b.count(),
        merged = merged.count(),
        components = table.len(),
        "combined"
    );

    Ok(Combined {
        table,
        mask: merged,
        mask_a: mask_a.clone(),
        mask_b: mask_b.clone(),
        agreement,
        only_a,
        only_b,
        disagreement,
    })
}

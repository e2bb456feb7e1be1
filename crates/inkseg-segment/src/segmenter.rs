//! Segmenter
//!
//! Per-image entry point: threshold, repair, then label. When the primary
//! strategy set produces no component reaching the table's area floor,
//! the configured fallback plans are tried in order.

use crate::config::{SegmentOptions, ThresholdStrategy};
use crate::error::invalid;
use crate::nozzle::{CropRect, NozzleMasker};
use crate::repair::MorphologicalRepairer;
use crate::table::ComponentTable;
use crate::threshold::Thresholder;
use crate::SegmentResult;
use inkseg_color::ThresholdSearch;
use inkseg_core::{FPix, Mask, Pix};
use tracing::{debug, warn};

/// Everything one segmentation run produced
#[derive(Debug, Clone)]
pub struct Segmentation {
    gray: Pix,
    thresh: Mask,
    filled: Mask,
    table: ComponentTable,
    attempt: usize,
    search: Option<ThresholdSearch>,
    edges: Option<FPix>,
}

impl Segmentation {
    /// Blurred gray image the thresholds ran on.
    pub fn gray(&self) -> &Pix {
        &self.gray
    }

    /// Raw threshold mask, before repair.
    pub fn thresh(&self) -> &Mask {
        &self.thresh
    }

    /// Repaired and filled mask the table was built from, after the
    /// vertical-space pass when that is enabled.
    pub fn filled(&self) -> &Mask {
        &self.filled
    }

    pub fn table(&self) -> &ComponentTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut ComponentTable {
        &mut self.table
    }

    pub fn into_table(self) -> ComponentTable {
        self.table
    }

    /// Index of the plan that produced this result (0 = primary).
    pub fn attempt(&self) -> usize {
        self.attempt
    }

    pub fn search(&self) -> Option<&ThresholdSearch> {
        self.search.as_ref()
    }

    /// Laplacian used for sharp-edge removal, if it ran.
    pub fn edges(&self) -> Option<&FPix> {
        self.edges.as_ref()
    }

    pub fn success(&self) -> bool {
        self.table.success()
    }
}

/// Threshold, repair and label one image
pub struct Segmenter<'a> {
    options: SegmentOptions,
    thresholder: Thresholder,
    nozzle: Option<(&'a dyn NozzleMasker, CropRect)>,
}

impl<'a> Segmenter<'a> {
    /// # Errors
    ///
    /// Returns [`SegmentError::InvalidInput`](crate::SegmentError) for
    /// invalid options.
    pub fn new(options: SegmentOptions) -> SegmentResult<Self> {
        options.validate()?;
        Ok(Self {
            thresholder: Thresholder::new(options.threshold.clone())?,
            options,
            nozzle: None,
        })
    }

    /// Exclude a nozzle from every mask. `crop` is the region of the frame
    /// the segmented images cover.
    pub fn with_nozzle(mut self, masker: &'a dyn NozzleMasker, crop: CropRect) -> Self {
        self.nozzle = Some((masker, crop));
        self
    }

    pub fn options(&self) -> &SegmentOptions {
        &self.options
    }

    /// Segment one image.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::InvalidInput`](crate::SegmentError) for a
    /// flat image, a strategy the image cannot feed, or an image whose size
    /// differs from the nozzle crop.
    pub fn segment(&self, pix: &Pix) -> SegmentResult<Segmentation> {
        if let Some((_, crop)) = &self.nozzle
            && (crop.width(), crop.height()) != (pix.width(), pix.height())
        {
            return Err(invalid(format!(
                "image is {}x{} but the crop is {}x{}",
                pix.width(),
                pix.height(),
                crop.width(),
                crop.height()
            )));
        }

        let plans: Vec<&[ThresholdStrategy]> = std::iter::once(&self.options.threshold.strategies)
            .chain(&self.options.fallbacks)
            .map(Vec::as_slice)
            .collect();
        let min_area = self.options.table.min_area;

        let mut last = None;
        for (attempt, plan) in plans.iter().enumerate() {
            let result = self.run_plan(pix, plan, attempt)?;
            let area = result.table.largest().map_or(0, |r| r.area);
            debug!(attempt, ?plan, components = result.table.len(), area, "plan finished");
            if area >= min_area {
                if attempt > 0 {
                    warn!(attempt, ?plan, "primary plan found nothing, fallback used");
                }
                return Ok(result);
            }
            last = Some(result);
        }
        match last {
            Some(result) => Ok(result),
            None => Err(invalid("no threshold plan configured")),
        }
    }

    fn run_plan(
        &self,
        pix: &Pix,
        plan: &[ThresholdStrategy],
        attempt: usize,
    ) -> SegmentResult<Segmentation> {
        let thresholded = self.thresholder.threshold_with(pix, plan)?;
        let mut repairer = MorphologicalRepairer::new(self.options.repair.clone())?;
        if let Some((masker, crop)) = self.nozzle {
            repairer = repairer.with_nozzle(masker, crop);
        }
        let repaired = repairer.repair(&thresholded.mask, &thresholded.gray)?;
        let mut filled = repaired.filled;
        let mut table = ComponentTable::from_mask(&filled, self.options.table.clone())?;
        if self.options.repair.empty_vertical_spaces {
            filled = repairer.empty_vertical_spaces(&thresholded.mask, table.labels_bw())?;
            table = ComponentTable::from_mask(&filled, self.options.table.clone())?;
        }
        Ok(Segmentation {
            gray: thresholded.gray,
            thresh: thresholded.mask,
            filled,
            table,
            attempt,
            search: thresholded.search,
            edges: repaired.edges,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FillMode, RepairOptions, TableOptions, ThresholdOptions};
    use crate::nozzle::RectNozzle;
    use crate::SegmentError;
    use inkseg_core::Box;

    /// Dark 30x20 block on a bright 80x60 field.
    fn block_image() -> Pix {
        Pix::from_gray_fn(80, 60, |x, y| {
            if (25..55).contains(&x) && (20..40).contains(&y) { 40 } else { 220 }
        })
        .unwrap()
    }

    fn options(min_area: u64) -> SegmentOptions {
        SegmentOptions::default()
            .with_threshold(ThresholdOptions::default().with_gray_blur(0))
            .with_repair(RepairOptions::default().with_fill_mode(FillMode::FillSimple))
            .with_table(TableOptions::default().with_min_area(min_area))
    }

    #[test]
    fn test_segment_block() {
        let seg = Segmenter::new(options(100)).unwrap();
        let out = seg.segment(&block_image()).unwrap();
        assert!(out.success());
        assert_eq!(out.attempt(), 0);
        assert_eq!(out.table().len(), 1);
        assert_eq!(out.table().records()[0].bbox, Box::new_unchecked(25, 20, 30, 20));
        assert_eq!(out.filled().count(), 600);
        assert!(out.search().is_some());
        let table = out.into_table();
        assert_eq!(table.labels_bw().count(), 600);
    }

    #[test]
    fn test_nothing_large_enough_keeps_last_attempt() {
        let opts = options(5000).with_fallback(vec![ThresholdStrategy::TwoCluster]);
        let out = Segmenter::new(opts).unwrap().segment(&block_image()).unwrap();
        assert_eq!(out.attempt(), 1);
        // the block is the main component and survives the area floor
        assert_eq!(out.table().len(), 1);
    }

    /// Two dark vertical lines 4 apart joined by a rung every sixth row.
    fn ladder_image() -> Pix {
        Pix::from_gray_fn(40, 100, |x, y| {
            let line = (10..16).contains(&x) || (20..26).contains(&x);
            let rung = (16..20).contains(&x) && y % 6 == 0;
            if (line || rung) && (5..95).contains(&y) { 40 } else { 220 }
        })
        .unwrap()
    }

    #[test]
    fn test_empty_vertical_spaces_splits_ladder() {
        let filled = Segmenter::new(options(100)).unwrap().segment(&ladder_image()).unwrap();
        assert_eq!(filled.table().len(), 1);
        assert_eq!(filled.filled().count(), 1080 + 85 * 4);

        let opts = options(100);
        let repair = opts.repair.clone().with_empty_vertical_spaces(true);
        let split = Segmenter::new(opts.with_repair(repair))
            .unwrap()
            .segment(&ladder_image())
            .unwrap();
        assert_eq!(split.table().len(), 2);
        assert_eq!(split.filled().count(), 1080);
        assert!(split.table().records().iter().all(|r| r.area == 540));
    }

    #[test]
    fn test_nozzle_crop_size_mismatch() {
        let nozzle = RectNozzle::new(Box::new_unchecked(0, 0, 5, 5));
        let seg = Segmenter::new(options(100))
            .unwrap()
            .with_nozzle(&nozzle, CropRect::full(10, 10));
        assert!(matches!(
            seg.segment(&block_image()),
            Err(SegmentError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_nozzle_is_excluded() {
        let nozzle = RectNozzle::new(Box::new_unchecked(35, 0, 10, 30));
        let seg = Segmenter::new(options(100))
            .unwrap()
            .with_nozzle(&nozzle, CropRect::full(80, 60));
        let out = seg.segment(&block_image()).unwrap();
        assert!(!out.filled().get(40, 25));
        assert!(out.filled().get(30, 25));
        assert_eq!(out.filled().count(), 600 - 100);
    }
}

//! Thresholder
//!
//! Prepares a blurred gray image and unions the masks of the requested
//! binarization strategies.

use crate::config::{ThresholdOptions, ThresholdStrategy, validate_strategies};
use crate::error::invalid;
use crate::{SegmentError, SegmentResult};
use inkseg_color::{
    ThresholdSearch, adaptive_threshold, channel_difference_threshold, fixed_threshold_search,
    two_cluster_segment,
};
use inkseg_core::{Mask, Pix};
use inkseg_filter::median_filter;
use tracing::debug;

/// Output of one thresholding pass
#[derive(Debug, Clone)]
pub struct Thresholded {
    /// Union of all strategy masks
    pub mask: Mask,
    /// Blurred gray image the gray strategies ran on
    pub gray: Pix,
    /// Report of the fixed-intensity search, if it ran
    pub search: Option<ThresholdSearch>,
}

/// Binarizes an image with one or more strategies
#[derive(Debug, Clone)]
pub struct Thresholder {
    options: ThresholdOptions,
}

impl Thresholder {
    /// # Errors
    ///
    /// Returns [`SegmentError::InvalidInput`] for invalid options.
    pub fn new(options: ThresholdOptions) -> SegmentResult<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &ThresholdOptions {
        &self.options
    }

    /// Gray conversion followed by the configured median blur.
    pub fn prepare_gray(&self, pix: &Pix) -> SegmentResult<Pix> {
        let gray = pix.to_gray();
        if self.options.gray_blur > 1 {
            Ok(median_filter(&gray, self.options.gray_blur)?)
        } else {
            Ok(gray)
        }
    }

    /// Threshold with the configured strategies.
    pub fn threshold(&self, pix: &Pix) -> SegmentResult<Thresholded> {
        self.threshold_with(pix, &self.options.strategies)
    }

    /// Threshold with an explicit strategy set, unioning the masks.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::InvalidInput`] for an empty strategy set,
    /// a flat image, or a color-only strategy on gray input.
    pub fn threshold_with(
        &self,
        pix: &Pix,
        strategies: &[ThresholdStrategy],
    ) -> SegmentResult<Thresholded> {
        validate_strategies(strategies)?;
        if pix.is_uniform() {
            return Err(invalid(format!(
                "{}x{} image has zero variance",
                pix.width(),
                pix.height()
            )));
        }

        let gray = self.prepare_gray(pix)?;
        let mut mask = Mask::new(pix.width(), pix.height())?;
        let mut search = None;
        for &strategy in strategies {
            let part = match strategy {
                ThresholdStrategy::FixedSearch => {
                    let result = fixed_threshold_search(&gray, &self.options.search)?;
                    debug!(
                        threshold = result.threshold,
                        fraction = result.fraction,
                        steps = result.steps,
                        "fixed-intensity search"
                    );
                    let part = result.mask.clone();
                    search = Some(result);
                    part
                }
                ThresholdStrategy::Adaptive => adaptive_threshold(&gray, &self.options.adaptive)?,
                ThresholdStrategy::TwoCluster => two_cluster_segment(pix, &self.options.cluster)?,
                ThresholdStrategy::ChannelDifference => {
                    if pix.is_gray() {
                        return Err(SegmentError::InvalidInput(
                            "channel difference needs an RGB image".into(),
                        ));
                    }
                    channel_difference_threshold(pix)?
                }
            };
            debug!(?strategy, foreground = part.count(), "strategy mask");
            mask.or_assign(&part)?;
        }

        Ok(Thresholded { mask, gray, search })
    }
}

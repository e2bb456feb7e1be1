//! Segmentation options
//!
//! Every stage is driven by a plain options struct whose `Default`
//! carries the tuned constants. Options are checked once, when a
//! [`Segmenter`](crate::Segmenter) is built.

use crate::SegmentResult;
use crate::error::invalid;
use inkseg_color::{AdaptiveThresholdOptions, ClusterOptions, ThresholdSearchOptions};

// =============================================================================
// Thresholding
// =============================================================================

/// Binarization strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThresholdStrategy {
    /// Lower a global gray threshold until the mask is sparse enough
    FixedSearch,
    /// Local Gaussian or mean threshold, for uneven illumination
    Adaptive,
    /// k = 2 color clustering, minority cluster is ink
    TwoCluster,
    /// Red-over-blue difference with Otsu thresholds (color input only)
    ChannelDifference,
}

/// Options for the [`Thresholder`](crate::Thresholder)
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdOptions {
    /// Strategies whose masks are unioned
    pub strategies: Vec<ThresholdStrategy>,
    /// Median blur applied to the gray image (odd, 0 disables)
    pub gray_blur: u32,
    /// Fixed-intensity search bounds
    pub search: ThresholdSearchOptions,
    /// Local-adaptive parameters
    pub adaptive: AdaptiveThresholdOptions,
    /// Two-cluster parameters
    pub cluster: ClusterOptions,
}

impl Default for ThresholdOptions {
    fn default() -> Self {
        Self {
            strategies: vec![ThresholdStrategy::FixedSearch],
            gray_blur: 3,
            search: ThresholdSearchOptions::default(),
            adaptive: AdaptiveThresholdOptions::default(),
            cluster: ClusterOptions::default(),
        }
    }
}

impl ThresholdOptions {
    pub fn with_strategies(mut self, strategies: impl Into<Vec<ThresholdStrategy>>) -> Self {
        self.strategies = strategies.into();
        self
    }

    pub fn with_gray_blur(mut self, size: u32) -> Self {
        self.gray_blur = size;
        self
    }

    pub fn with_search(mut self, search: ThresholdSearchOptions) -> Self {
        self.search = search;
        self
    }

    pub fn with_adaptive(mut self, adaptive: AdaptiveThresholdOptions) -> Self {
        self.adaptive = adaptive;
        self
    }

    pub fn with_cluster(mut self, cluster: ClusterOptions) -> Self {
        self.cluster = cluster;
        self
    }

    /// # Errors
    ///
    /// Returns [`SegmentError::InvalidInput`](crate::SegmentError) when no
    /// strategy is selected, the blur is even, or a strategy's options
    /// are out of range.
    pub fn validate(&self) -> SegmentResult<()> {
        validate_strategies(&self.strategies)?;
        if self.gray_blur != 0 && self.gray_blur % 2 == 0 {
            return Err(invalid(format!(
                "gray blur must be odd or 0, got {}",
                self.gray_blur
            )));
        }
        self.search.validate().map_err(invalid)?;
        self.adaptive.validate().map_err(invalid)?;
        self.cluster.validate().map_err(invalid)?;
        Ok(())
    }
}

pub(crate) fn validate_strategies(strategies: &[ThresholdStrategy]) -> SegmentResult<()> {
    if strategies.is_empty() {
        return Err(invalid("no threshold strategy selected"));
    }
    Ok(())
}

// =============================================================================
// Repair
// =============================================================================

/// Hole-filling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    /// Drop border-touching components, fill holes below
    /// `hollow_min_area`
    #[default]
    RemoveBorder,
    /// Fill every enclosed hole
    FillSimple,
    /// Fill small holes, keep hollows of at least `hollow_min_area`
    FillWithHoles,
    /// Fill each component's outer contour, then re-clear sharp edges
    FillByContours,
}

/// Options for the [`MorphologicalRepairer`](crate::MorphologicalRepairer)
#[derive(Debug, Clone, PartialEq)]
pub struct RepairOptions {
    pub fill_mode: FillMode,
    /// Disk radius; positive closes, negative opens, 0 skips
    pub closing: i32,
    /// Subtract sharp white-to-black edges before filling
    pub remove_sharp: bool,
    /// Laplacian magnitude that counts as a sharp edge
    pub sharp_crit: f32,
    /// Seal and later unseal the top of tall images
    pub close_top: bool,
    /// Height fraction of the band cleared at the top of tall images
    pub top_cutoff: f64,
    /// Blank nozzle pixels when a nozzle provider is attached
    pub exclude_nozzle: bool,
    /// Smallest hole kept open by [`FillMode::FillWithHoles`] and
    /// [`FillMode::RemoveBorder`]
    pub hollow_min_area: u64,
    /// Rows painted by the top seal
    pub seal_thickness: u32,
    /// Widest span (fraction of the width) the top seal may bridge
    pub seal_max_fraction: f64,
    /// Also seal (and unseal) the last foreground row of tall images
    pub close_bottom: bool,
    /// Clear the background between vertical printed lines after labeling
    pub empty_vertical_spaces: bool,
    /// Pixels the nozzle is grown by before the vertical-space pass
    pub vertical_nozzle_dilate: u32,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            fill_mode: FillMode::RemoveBorder,
            closing: 0,
            remove_sharp: false,
            sharp_crit: 20.0,
            close_top: true,
            top_cutoff: 0.01,
            exclude_nozzle: true,
            hollow_min_area: 1000,
            seal_thickness: 3,
            seal_max_fraction: 0.2,
            close_bottom: false,
            empty_vertical_spaces: false,
            vertical_nozzle_dilate: 5,
        }
    }
}

impl RepairOptions {
    pub fn with_fill_mode(mut self, mode: FillMode) -> Self {
        self.fill_mode = mode;
        self
    }

    pub fn with_closing(mut self, radius: i32) -> Self {
        self.closing = radius;
        self
    }

    pub fn with_remove_sharp(mut self, enabled: bool, crit: f32) -> Self {
        self.remove_sharp = enabled;
        self.sharp_crit = crit;
        self
    }

    pub fn with_close_top(mut self, enabled: bool) -> Self {
        self.close_top = enabled;
        self
    }

    pub fn with_top_cutoff(mut self, fraction: f64) -> Self {
        self.top_cutoff = fraction;
        self
    }

    pub fn with_exclude_nozzle(mut self, enabled: bool) -> Self {
        self.exclude_nozzle = enabled;
        self
    }

    pub fn with_hollow_min_area(mut self, area: u64) -> Self {
        self.hollow_min_area = area;
        self
    }

    pub fn with_close_bottom(mut self, enabled: bool) -> Self {
        self.close_bottom = enabled;
        self
    }

    pub fn with_empty_vertical_spaces(mut self, enabled: bool) -> Self {
        self.empty_vertical_spaces = enabled;
        self
    }

    pub fn with_vertical_nozzle_dilate(mut self, pixels: u32) -> Self {
        self.vertical_nozzle_dilate = pixels;
        self
    }

    pub fn validate(&self) -> SegmentResult<()> {
        if !(0.0..1.0).contains(&self.top_cutoff) {
            return Err(invalid(format!(
                "top cutoff must be in [0, 1), got {}",
                self.top_cutoff
            )));
        }
        if !(self.sharp_crit >= 0.0) {
            return Err(invalid(format!(
                "sharp edge criterion must be non-negative, got {}",
                self.sharp_crit
            )));
        }
        if !(0.0..=1.0).contains(&self.seal_max_fraction) {
            return Err(invalid(format!(
                "seal width fraction must be in [0, 1], got {}",
                self.seal_max_fraction
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Component table
// =============================================================================

/// Options for a [`ComponentTable`](crate::ComponentTable)
#[derive(Debug, Clone, PartialEq)]
pub struct TableOptions {
    /// Components below this area are erased when the table is built
    pub min_area: u64,
    /// Distance from the edge within which the largest component is
    /// checked for truncation
    pub main_margin: u32,
    /// Contour points on one extreme row/column above which a
    /// border-touching largest component is trusted
    pub main_edge_points: usize,
    /// The smoothest component must be below this roughness for rough
    /// objects to be removed
    pub roughness_ceiling: f64,
    /// Components rougher than the smoothest by more than this are rough
    pub roughness_band: f64,
    /// Satellites below this fraction of the largest area are erased by
    /// [`ComponentTable::erase_satellites`](crate::ComponentTable::erase_satellites)
    pub satellite_fraction: f64,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            min_area: 100,
            main_margin: 5,
            main_edge_points: 20,
            roughness_ceiling: 0.5,
            roughness_band: 0.5,
            satellite_fraction: 0.2,
        }
    }
}

impl TableOptions {
    pub fn with_min_area(mut self, area: u64) -> Self {
        self.min_area = area;
        self
    }

    pub fn with_main_margin(mut self, margin: u32) -> Self {
        self.main_margin = margin;
        self
    }

    pub fn with_main_edge_points(mut self, points: usize) -> Self {
        self.main_edge_points = points;
        self
    }

    pub fn with_roughness(mut self, ceiling: f64, band: f64) -> Self {
        self.roughness_ceiling = ceiling;
        self.roughness_band = band;
        self
    }

    pub fn with_satellite_fraction(mut self, fraction: f64) -> Self {
        self.satellite_fraction = fraction;
        self
    }

    pub fn validate(&self) -> SegmentResult<()> {
        if !(self.roughness_ceiling >= 0.0 && self.roughness_band >= 0.0) {
            return Err(invalid("roughness limits must be non-negative"));
        }
        if !(0.0..=1.0).contains(&self.satellite_fraction) {
            return Err(invalid(format!(
                "satellite fraction must be in [0, 1], got {}",
                self.satellite_fraction
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Segmenter and combiner
// =============================================================================

/// Options for a [`Segmenter`](crate::Segmenter)
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentOptions {
    pub threshold: ThresholdOptions,
    pub repair: RepairOptions,
    pub table: TableOptions,
    /// Strategy sets tried in order when the primary one finds no
    /// component of at least `table.min_area`
    pub fallbacks: Vec<Vec<ThresholdStrategy>>,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            threshold: ThresholdOptions::default(),
            repair: RepairOptions::default(),
            table: TableOptions::default().with_min_area(2500),
            fallbacks: Vec::new(),
        }
    }
}

impl SegmentOptions {
    pub fn with_threshold(mut self, threshold: ThresholdOptions) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_repair(mut self, repair: RepairOptions) -> Self {
        self.repair = repair;
        self
    }

    pub fn with_table(mut self, table: TableOptions) -> Self {
        self.table = table;
        self
    }

    pub fn with_fallback(mut self, strategies: impl Into<Vec<ThresholdStrategy>>) -> Self {
        self.fallbacks.push(strategies.into());
        self
    }

    pub fn validate(&self) -> SegmentResult<()> {
        self.threshold.validate()?;
        self.repair.validate()?;
        self.table.validate()?;
        for plan in &self.fallbacks {
            validate_strategies(plan)?;
        }
        Ok(())
    }
}

/// Options for [`combine`](crate::combine)
#[derive(Debug, Clone, PartialEq)]
pub struct CombineOptions {
    /// Area floor of the input tables and the final table
    pub min_area: u64,
    /// Erosion radius applied to the B-only region
    pub erode_radius: u32,
    /// Dilation radius applied after that erosion
    pub dilate_radius: u32,
    /// A-only components starting within this many rows of the top are
    /// dropped as reflections
    pub top_margin: u32,
    /// B-only components larger than this are dropped
    pub artifact_max_area: u64,
    /// Gaps below this area are filled in the merged mask
    pub tiny_gap_area: u64,
}

impl Default for CombineOptions {
    fn default() -> Self {
        Self {
            min_area: 2500,
            erode_radius: 5,
            dilate_radius: 10,
            top_margin: 5,
            artifact_max_area: 1000,
            tiny_gap_area: 50,
        }
    }
}

impl CombineOptions {
    pub fn with_min_area(mut self, area: u64) -> Self {
        self.min_area = area;
        self
    }

    pub fn with_radii(mut self, erode: u32, dilate: u32) -> Self {
        self.erode_radius = erode;
        self.dilate_radius = dilate;
        self
    }

    pub fn with_top_margin(mut self, margin: u32) -> Self {
        self.top_margin = margin;
        self
    }

    pub fn with_artifact_max_area(mut self, area: u64) -> Self {
        self.artifact_max_area = area;
        self
    }

    pub fn with_tiny_gap_area(mut self, area: u64) -> Self {
        self.tiny_gap_area = area;
        self
    }
}

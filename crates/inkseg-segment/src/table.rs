//! Component table
//!
//! A [`ComponentTable`] owns the label map of a filled mask, one
//! [`ComponentRecord`] per surviving label, and the union mask of those
//! labels. After construction a table only shrinks: every erase
//! operation computes a keep-predicate over the records and hands it to
//! [`ComponentTable::select`].
//!
//! # Invariants
//!
//! - `labels_bw[p]` is foreground exactly where `labels[p] != 0`
//! - every label in the map has exactly one record, and vice versa
//! - records are ordered by id
//!
//! # Main component
//!
//! The largest component is trusted as the primary printed feature unless
//! it sits within `main_margin` of an edge and none of its contour's
//! extreme rows or columns holds more than `main_edge_points` points. The
//! first verdict is cached for the table's lifetime.

use crate::config::TableOptions;
use crate::error::invalid;
use crate::SegmentResult;
use inkseg_core::{Box, FG, LabelMap, Mask};
use inkseg_region::{
    ConnectedComponent, ConnectivityType, extreme_counts, label_connected_components, roughness,
    trace_outer_border,
};
use tracing::debug;

/// Cached verdict on the largest component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrustLargest {
    /// Not evaluated yet
    #[default]
    Unknown,
    /// The largest component is the main component
    Trusted,
    /// The largest component looks like a border artifact
    Distrusted,
}

/// Geometry of one labeled component
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentRecord {
    /// Label in the table's [`LabelMap`]
    pub id: u32,
    /// Bounding box `(x0, y0, w, h)`
    pub bbox: Box,
    /// Pixel count
    pub area: u64,
    /// Mean pixel position `(xc, yc)`
    pub centroid: (f64, f64),
    /// Contour roughness, once measured
    pub roughness: Option<f64>,
}

impl From<ConnectedComponent> for ComponentRecord {
    fn from(c: ConnectedComponent) -> Self {
        Self {
            id: c.label,
            bbox: c.bounds,
            area: c.pixel_count,
            centroid: c.centroid,
            roughness: None,
        }
    }
}

/// Labeled components of one mask
#[derive(Debug, Clone)]
pub struct ComponentTable {
    labels: LabelMap,
    records: Vec<ComponentRecord>,
    labels_bw: Mask,
    options: TableOptions,
    trust_largest: TrustLargest,
    has_contours: bool,
}

impl ComponentTable {
    /// Label `mask` with 8-connectivity and erase components below
    /// `options.min_area` (the main component is protected).
    pub fn from_mask(mask: &Mask, options: TableOptions) -> SegmentResult<Self> {
        let (labels, components) = label_connected_components(mask, ConnectivityType::EightWay)?;
        let mut table = Self {
            labels_bw: labels.to_mask(),
            labels,
            records: components.into_iter().map(ComponentRecord::from).collect(),
            options,
            trust_largest: TrustLargest::Unknown,
            has_contours: false,
        };
        let min_area = table.options.min_area;
        table.erase_small(min_area, true);
        debug!(components = table.len(), min_area, "component table built");
        Ok(table)
    }

    // ---- accessors ----

    /// Whether any component survives.
    pub fn success(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn width(&self) -> u32 {
        self.labels.width()
    }

    pub fn height(&self) -> u32 {
        self.labels.height()
    }

    pub fn records(&self) -> &[ComponentRecord] {
        &self.records
    }

    pub fn record(&self, id: u32) -> Option<&ComponentRecord> {
        self.records
            .binary_search_by_key(&id, |r| r.id)
            .ok()
            .map(|i| &self.records[i])
    }

    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }

    /// Union mask of the surviving components.
    pub fn labels_bw(&self) -> &Mask {
        &self.labels_bw
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn trust_largest(&self) -> TrustLargest {
        self.trust_largest
    }

    /// Whether roughness has been measured for the current records.
    pub fn has_contours(&self) -> bool {
        self.has_contours
    }

    // ---- queries ----

    /// The component with the largest area (lowest id on ties).
    pub fn largest(&self) -> Option<&ComponentRecord> {
        self.records
            .iter()
            .fold(None, |best: Option<&ComponentRecord>, r| match best {
                Some(b) if b.area >= r.area => Some(b),
                _ => Some(r),
            })
    }

    /// Whether a record's bbox lies closer than `margin` to any edge.
    pub fn touches_border(&self, record: &ComponentRecord, margin: u32) -> bool {
        record
            .bbox
            .near_border(self.width(), self.height(), margin)
    }

    /// Id of the main component, or `None` if the largest component is
    /// not trustworthy (or the table is empty).
    pub fn main_component(&mut self) -> Option<u32> {
        let largest = self.largest()?;
        let (id, bbox) = (largest.id, largest.bbox);
        match self.trust_largest {
            TrustLargest::Trusted => return Some(id),
            TrustLargest::Distrusted => return None,
            TrustLargest::Unknown => {}
        }

        let trusted = if !bbox.near_border(self.width(), self.height(), self.options.main_margin) {
            true
        } else {
            let counts = extreme_counts(&trace_outer_border(&self.labels, id));
            debug!(id, ?counts, "largest component touches border");
            counts.max() > self.options.main_edge_points
        };
        self.trust_largest = if trusted {
            TrustLargest::Trusted
        } else {
            TrustLargest::Distrusted
        };
        debug!(id, trusted, "main component verdict");
        trusted.then_some(id)
    }

    /// Mask of a single component.
    pub fn single_mask(&self, id: u32) -> Mask {
        self.labels.mask_of(id)
    }

    /// Union of the masks of `ids`.
    pub fn reconstruct_mask(&self, ids: &[u32]) -> Mask {
        let mut wanted = vec![false; self.labels.max_label() as usize + 1];
        for &id in ids {
            if let Some(w) = wanted.get_mut(id as usize) {
                *w = true;
            }
        }
        self.labels.mask_where(|l| wanted[l as usize])
    }

    /// Whether `mask` shares any pixel with this table's components.
    pub fn component_is_in(&self, mask: &Mask) -> SegmentResult<bool> {
        Ok(mask.overlaps(&self.labels_bw)?)
    }

    /// Union of this table's components that overlap `other`'s foreground.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::InvalidInput`](crate::SegmentError) when the
    /// tables cover different pixel grids.
    pub fn common_mask(&self, other: &ComponentTable) -> SegmentResult<Mask> {
        if !self.labels_bw.sizes_equal(&other.labels_bw) {
            return Err(invalid(format!(
                "tables differ in size: {}x{} vs {}x{}",
                self.width(),
                self.height(),
                other.width(),
                other.height()
            )));
        }
        let mut hit = vec![false; self.labels.max_label() as usize + 1];
        for (&l, &o) in self.labels.data().iter().zip(other.labels_bw.data()) {
            if l != 0 && o == FG {
                hit[l as usize] = true;
            }
        }
        Ok(self.labels.mask_where(|l| hit[l as usize]))
    }

    // ---- selection ----

    /// Keep the records satisfying `keep`, erase the rest.
    ///
    /// With `checks`, the main component is never erased. Selecting on an
    /// empty table does nothing.
    pub fn select(&mut self, keep: impl Fn(&ComponentRecord) -> bool, checks: bool) {
        if self.records.is_empty() {
            return;
        }
        let mut doomed: Vec<u32> = self
            .records
            .iter()
            .filter(|r| !keep(r))
            .map(|r| r.id)
            .collect();
        if doomed.is_empty() {
            return;
        }
        if checks && let Some(main) = self.main_component() {
            let before = doomed.len();
            doomed.retain(|&id| id != main);
            if doomed.len() < before {
                debug!(id = main, "main component protected");
            }
        }

        let mut erase = vec![false; self.labels.max_label() as usize + 1];
        for &id in &doomed {
            erase[id as usize] = true;
        }
        self.labels.erase_where(|l| erase[l as usize]);
        self.records.retain(|r| !erase[r.id as usize]);
        self.labels_bw = self.labels.to_mask();
        debug!(removed = doomed.len(), kept = self.records.len(), "select");
    }

    pub fn erase_small(&mut self, min_area: u64, checks: bool) {
        self.select(|r| r.area >= min_area, checks);
    }

    pub fn erase_large(&mut self, max_area: u64, checks: bool) {
        self.select(|r| r.area <= max_area, checks);
    }

    /// Erase components smaller than `fraction` of the largest area.
    pub fn erase_smallest_relative(&mut self, fraction: f64, checks: bool) {
        let Some(max) = self.largest().map(|r| r.area) else {
            return;
        };
        let floor = fraction * max as f64;
        self.select(|r| r.area as f64 >= floor, checks);
    }

    /// Erase satellites below the configured fraction of the largest area.
    pub fn erase_satellites(&mut self, checks: bool) {
        self.erase_smallest_relative(self.options.satellite_fraction, checks);
    }

    /// Erase components closer than `margin` to any edge.
    pub fn erase_border(&mut self, margin: u32, checks: bool) {
        let (w, h) = (self.width(), self.height());
        self.select(|r| !r.bbox.near_border(w, h, margin), checks);
    }

    /// Erase components at least `W - margin` wide.
    pub fn erase_full_width(&mut self, margin: u32, checks: bool) {
        let limit = self.width() as i32 - margin as i32;
        self.select(|r| r.bbox.w < limit, checks);
    }

    pub fn erase_left_right_border(&mut self, margin: u32, checks: bool) {
        let (m, w) = (margin as i32, self.width() as i32);
        self.select(|r| r.bbox.x > m && r.bbox.right() < w - m, checks);
    }

    pub fn erase_top_bottom_border(&mut self, margin: u32, checks: bool) {
        let (m, h) = (margin as i32, self.height() as i32);
        self.select(|r| r.bbox.y > m && r.bbox.bottom() < h - m, checks);
    }

    pub fn erase_top_border(&mut self, margin: u32, checks: bool) {
        let m = margin as i32;
        self.select(|r| r.bbox.y > m, checks);
    }

    /// Erase jagged components when the dominant one is smooth.
    ///
    /// Roughness is measured for every record. If the smoothest component
    /// is also the largest and its roughness is at most
    /// `roughness_ceiling`, every component rougher than it by more than
    /// `roughness_band` is erased.
    pub fn remove_rough_objects(&mut self, checks: bool) {
        if self.records.len() <= 1 {
            return;
        }
        for r in &mut self.records {
            r.roughness = Some(roughness(&trace_outer_border(&self.labels, r.id)));
        }
        self.has_contours = true;

        let Some(smoothest) = self
            .records
            .iter()
            .filter_map(|r| r.roughness.map(|v| (r.id, v)))
            .fold(None, |best: Option<(u32, f64)>, (id, v)| match best {
                Some((_, b)) if b <= v => best,
                _ => Some((id, v)),
            })
        else {
            return;
        };
        let Some(largest) = self.largest().map(|r| r.id) else {
            return;
        };
        if smoothest.0 != largest || smoothest.1 > self.options.roughness_ceiling {
            debug!(
                smoothest = smoothest.0,
                largest,
                roughness = smoothest.1,
                "rough-object removal skipped"
            );
            return;
        }
        let limit = smoothest.1 + self.options.roughness_band;
        self.select(|r| r.roughness.is_none_or(|v| v <= limit), checks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn squares() -> Mask {
        Mask::from_fn(100, 100, |x, y| {
            let small = (5..15).contains(&x) && (5..15).contains(&y);
            let big = (40..90).contains(&x) && (30..80).contains(&y);
            small || big
        })
        .unwrap()
    }

    fn opts(min_area: u64) -> TableOptions {
        TableOptions::default().with_min_area(min_area)
    }

    #[test]
    fn test_empty_mask() {
        let mut t = ComponentTable::from_mask(&Mask::new(100, 100).unwrap(), opts(0)).unwrap();
        assert!(!t.success());
        assert_eq!(t.len(), 0);
        assert_eq!(t.main_component(), None);
        t.erase_small(10, true);
        t.remove_rough_objects(true);
        assert!(t.labels_bw().is_all_clear());
    }

    #[test]
    fn test_construction_erases_below_floor() {
        let t = ComponentTable::from_mask(&squares(), opts(150)).unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t.records()[0].area, 2500);
        assert_eq!(t.labels_bw().count(), 2500);
    }

    #[test]
    fn test_erase_small_keeps_big_square() {
        let mut t = ComponentTable::from_mask(&squares(), opts(0)).unwrap();
        assert_eq!(t.len(), 2);
        t.erase_small(50 * 50, true);
        assert_eq!(t.len(), 1);
        assert_eq!(t.records()[0].bbox, Box::new_unchecked(40, 30, 50, 50));
    }

    #[test]
    fn test_erase_satellites_uses_configured_fraction() {
        let mut t = ComponentTable::from_mask(&squares(), opts(0)).unwrap();
        t.erase_satellites(false);
        assert_eq!(t.len(), 1);
        assert_eq!(t.records()[0].area, 2500);

        let loose = opts(0).with_satellite_fraction(0.01);
        let mut t = ComponentTable::from_mask(&squares(), loose).unwrap();
        t.erase_satellites(false);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_select_protects_main() {
        let mut t = ComponentTable::from_mask(&squares(), opts(0)).unwrap();
        t.select(|_| false, true);
        assert_eq!(t.len(), 1);
        assert_eq!(t.records()[0].area, 2500);

        let mut t = ComponentTable::from_mask(&squares(), opts(0)).unwrap();
        t.select(|_| false, false);
        assert!(t.is_empty());
        assert!(!t.success());

        let mut t = ComponentTable::from_mask(&squares(), opts(0)).unwrap();
        t.select(|_| true, true);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_erase_border_margin() {
        let m = Mask::from_fn(100, 100, |x, y| x < 20 && (40..60).contains(&y)).unwrap();
        let mut t = ComponentTable::from_mask(&m, opts(0)).unwrap();
        t.erase_border(0, false);
        assert_eq!(t.len(), 1);
        t.erase_border(5, false);
        assert_eq!(t.len(), 0);
    }

    #[test]
    fn test_edge_specific_erasers() {
        let m = Mask::from_fn(100, 100, |x, y| {
            let top = (40..60).contains(&x) && y < 5;
            let left = x < 3 && (40..60).contains(&y);
            let middle = (40..60).contains(&x) && (40..60).contains(&y);
            top || left || middle
        })
        .unwrap();
        let mut t = ComponentTable::from_mask(&m, opts(0)).unwrap();
        assert_eq!(t.len(), 3);
        t.erase_top_border(0, false);
        assert_eq!(t.len(), 2);
        t.erase_left_right_border(0, false);
        assert_eq!(t.len(), 1);
        t.erase_top_bottom_border(0, false);
        t.erase_full_width(0, false);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn test_erase_relative_and_large() {
        let mut t = ComponentTable::from_mask(&squares(), opts(0)).unwrap();
        t.erase_large(200, false);
        assert_eq!(t.len(), 1);
        assert_eq!(t.records()[0].area, 100);

        let mut t = ComponentTable::from_mask(&squares(), opts(0)).unwrap();
        t.erase_smallest_relative(0.01, false);
        assert_eq!(t.len(), 2);
        t.erase_smallest_relative(0.2, false);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn test_main_component_border_truncated() {
        // a tall bar cut by the left edge: 60 points on its left column
        let m = Mask::from_fn(100, 100, |x, y| x < 10 && (20..80).contains(&y)).unwrap();
        let mut t = ComponentTable::from_mask(&m, opts(0)).unwrap();
        assert_eq!(t.main_component(), Some(1));
        assert_eq!(t.trust_largest(), TrustLargest::Trusted);
    }

    #[test]
    fn test_main_component_small_border_speck_distrusted() {
        let m = Mask::from_fn(100, 100, |x, y| x < 4 && (2..8).contains(&y)).unwrap();
        let mut t = ComponentTable::from_mask(&m, opts(0)).unwrap();
        assert_eq!(t.main_component(), None);
        assert_eq!(t.trust_largest(), TrustLargest::Distrusted);
        // cached
        assert_eq!(t.main_component(), None);
    }

    #[test]
    fn test_main_component_interior_trusted() {
        let mut t = ComponentTable::from_mask(&squares(), opts(0)).unwrap();
        assert_eq!(t.main_component(), t.largest().map(|r| r.id));
    }

    #[test]
    fn test_reconstruct_round_trip() {
        let t = ComponentTable::from_mask(&squares(), opts(0)).unwrap();
        let ids: Vec<u32> = t.records().iter().map(|r| r.id).collect();
        assert_eq!(&t.reconstruct_mask(&ids), t.labels_bw());
        assert!(t.reconstruct_mask(&[]).is_all_clear());
        assert_eq!(t.single_mask(ids[0]).count(), t.records()[0].area);
    }

    #[test]
    fn test_common_mask() {
        let a = ComponentTable::from_mask(&squares(), opts(0)).unwrap();
        let b_mask = Mask::from_fn(100, 100, |x, y| x == 50 && y == 50).unwrap();
        let b = ComponentTable::from_mask(&b_mask, opts(0)).unwrap();
        let common = a.common_mask(&b).unwrap();
        assert_eq!(common.count(), 2500);
        assert!(b.component_is_in(&common).unwrap());
        assert!(!b.component_is_in(&a.single_mask(1)).unwrap());

        let other = ComponentTable::from_mask(&Mask::new(10, 10).unwrap(), opts(0)).unwrap();
        assert!(a.common_mask(&other).is_err());
    }

    #[test]
    fn test_remove_rough_objects() {
        let m = Mask::from_fn(120, 80, |x, y| {
            let square = (60..100).contains(&x) && (20..60).contains(&y);
            // comb: 3-row spine with 1-pixel teeth every other column
            let spine = (10..31).contains(&x) && (50..53).contains(&y);
            let teeth = (10..31).contains(&x) && x % 2 == 0 && (40..50).contains(&y);
            square || spine || teeth
        })
        .unwrap();
        let mut t = ComponentTable::from_mask(&m, opts(0)).unwrap();
        assert_eq!(t.len(), 2);
        t.remove_rough_objects(true);
        assert!(t.has_contours());
        assert_eq!(t.len(), 1);
        assert_eq!(t.records()[0].area, 1600);
        assert!(t.records()[0].roughness.is_some_and(|r| r < 1e-9));
    }
}

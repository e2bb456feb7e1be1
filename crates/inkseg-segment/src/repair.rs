//! Morphological repair
//!
//! Cleans a raw threshold mask before labeling. The stages run in this
//! order:
//!
//! 1. Nozzle exclusion (plus the fixed reflection edges)
//! 2. Top sealing of tall images
//! 3. Signed close/open
//! 4. Sharp-edge removal
//! 5. Hole filling, by the configured [`FillMode`]
//! 6. Top unsealing, close/open again, nozzle exclusion again
//!
//! [`MorphologicalRepairer::empty_vertical_spaces`] is a later, optional
//! pass that runs on a labeled mask.

use crate::config::{FillMode, RepairOptions};
use crate::nozzle::{CropRect, NozzleMasker, NozzleMode};
use crate::SegmentResult;
use inkseg_core::{Box, FPix, Mask, Pix};
use inkseg_filter::laplacian;
use inkseg_morph::{Sel, close, close_or_open, dilate, erode, open};
use inkseg_region::{
    ConnectivityType, clear_border, fill_component_interior, fill_holes, fill_holes_below,
    label_connected_components,
};
use tracing::debug;

/// Side of the square that thins the sharp-edge mask
const SHARP_ERODE_SIZE: u32 = 2;

/// Height of the vertical brick that keeps only vertical strokes
const VERTICAL_STROKE_HEIGHT: u32 = 15;

/// Width of the horizontal brick that bridges narrow gaps between strokes
const GAP_BRIDGE_WIDTH: u32 = 5;

/// Result of [`MorphologicalRepairer::repair`]
#[derive(Debug, Clone)]
pub struct Repaired {
    /// The repaired, filled mask
    pub filled: Mask,
    /// Laplacian of the gray image, present when sharp edges were removed
    pub edges: Option<FPix>,
}

/// Applies the repair stages to threshold masks
pub struct MorphologicalRepairer<'a> {
    options: RepairOptions,
    nozzle: Option<(&'a dyn NozzleMasker, CropRect)>,
}

impl<'a> MorphologicalRepairer<'a> {
    /// # Errors
    ///
    /// Returns [`SegmentError::InvalidInput`](crate::SegmentError) for
    /// invalid options.
    pub fn new(options: RepairOptions) -> SegmentResult<Self> {
        options.validate()?;
        Ok(Self {
            options,
            nozzle: None,
        })
    }

    /// Attach a nozzle provider for the crop the masks cover.
    pub fn with_nozzle(mut self, masker: &'a dyn NozzleMasker, crop: CropRect) -> Self {
        self.nozzle = Some((masker, crop));
        self
    }

    pub fn options(&self) -> &RepairOptions {
        &self.options
    }

    /// Run every repair stage on `thresh`. `gray` feeds the Laplacian.
    pub fn repair(&self, thresh: &Mask, gray: &Pix) -> SegmentResult<Repaired> {
        let opts = &self.options;
        let mut mask = self.exclude_nozzle(thresh, true)?;
        if opts.close_top {
            mask = close_vertical_top(&mask, true, opts);
        }
        mask = close_or_open(&mask, opts.closing)?;

        let mut edges = None;
        if opts.remove_sharp {
            let lap = laplacian(gray)?;
            let sel = Sel::create_square(SHARP_ERODE_SIZE)?;
            let sharp = erode(&lap.mask_below(-opts.sharp_crit), &sel)?;
            debug!(removed = sharp.and(&mask)?.count(), "sharp edges");
            mask.subtract_assign(&sharp)?;
            edges = Some(lap);
        }

        let sharp = edges.as_ref().map(|lap| lap.mask_below(-opts.sharp_crit));
        let mut filled = fill(&mask, opts, sharp.as_ref())?;
        debug!(
            mode = ?opts.fill_mode,
            before = mask.count(),
            after = filled.count(),
            "fill"
        );

        if opts.close_top {
            filled = close_vertical_top(&filled, false, opts);
        }
        filled = close_or_open(&filled, opts.closing)?;
        filled = self.exclude_nozzle(&filled, false)?;
        Ok(Repaired { filled, edges })
    }

    /// Clear the background between vertical printed lines from `labeled`.
    ///
    /// Vertical strokes are taken from `thresh` with the nozzle, grown by
    /// `vertical_nozzle_dilate`, cut out. Row gaps between strokes and the
    /// narrow gaps a horizontal close bridges are removed from `labeled`.
    pub fn empty_vertical_spaces(&self, thresh: &Mask, labeled: &Mask) -> SegmentResult<Mask> {
        let mut base = thresh.clone();
        if let Some((masker, crop)) = self.nozzle {
            let all = Mask::from_fn(thresh.width(), thresh.height(), |_, _| true)?;
            let mut nozzle = masker.mask_nozzle(&all, &crop, NozzleMode::Only)?;
            let grow = self.options.vertical_nozzle_dilate;
            if grow > 0 {
                nozzle = dilate(&nozzle, &Sel::create_square(2 * grow + 1)?)?;
            }
            base.subtract_assign(&nozzle)?;
        }

        let strokes = open(&base, &Sel::create_brick(1, VERTICAL_STROKE_HEIGHT)?)?;
        let bridged = close(&strokes, &Sel::create_brick(GAP_BRIDGE_WIDTH, 1)?)?;
        let mut cut = open(&row_gaps(&bridged)?, &Sel::create_square(3)?)?;
        cut.or_assign(&bridged.subtract(&strokes)?)?;
        let cut = open(&cut, &Sel::create_square(2)?)?;

        let out = labeled.subtract(&cut)?;
        debug!(removed = labeled.count() - out.count(), "vertical spaces emptied");
        Ok(out)
    }

    fn exclude_nozzle(&self, mask: &Mask, clear_edges: bool) -> SegmentResult<Mask> {
        let Some((masker, crop)) = self.nozzle.filter(|_| self.options.exclude_nozzle) else {
            return Ok(mask.clone());
        };
        let mut out = masker.mask_nozzle(mask, &crop, NozzleMode::Exclude)?;
        if clear_edges {
            clear_reflection_edges(&mut out);
        }
        Ok(out)
    }
}

/// Clear the top row and the left/right columns over the top quarter.
pub fn clear_reflection_edges(mask: &mut Mask) {
    let (w, h) = (mask.width() as i32, mask.height() as i32);
    mask.fill_rect(&Box::new_unchecked(0, 0, w, 1), false);
    mask.fill_rect(&Box::new_unchecked(0, 0, 1, h / 4), false);
    mask.fill_rect(&Box::new_unchecked(w - 1, 0, 1, h / 4), false);
}

/// Seal (`seal == true`) or unseal the top of a tall image.
///
/// Images shorter than twice their width are returned unchanged. The top
/// band `[1, top_cutoff * H)` (inner columns) is cleared, then a bar of
/// `seal_thickness` rows is painted over (or cleared from) the first
/// foreground row, if that row's span is narrower than
/// `seal_max_fraction * W`. With `close_bottom` the same bar is applied
/// `seal_thickness` rows above the last foreground row.
pub fn close_vertical_top(mask: &Mask, seal: bool, options: &RepairOptions) -> Mask {
    let (w, h) = (mask.width(), mask.height());
    let mut out = mask.clone();
    if h < 2 * w {
        return out;
    }
    let band_end = (h as f64 * options.top_cutoff) as i32;
    if band_end > 1 && w > 2 {
        out.fill_rect(&Box::new_unchecked(1, 1, w as i32 - 2, band_end - 1), false);
    }

    let (Some(top), Some(bottom)) = (out.first_foreground_row(), out.last_foreground_row()) else {
        return out;
    };
    seal_row(&mut out, top, seal, options);
    if options.close_bottom {
        seal_row(&mut out, bottom.saturating_sub(options.seal_thickness), seal, options);
    }
    out
}

fn seal_row(mask: &mut Mask, row: u32, seal: bool, options: &RepairOptions) {
    let Some((first, last)) = mask.row_span(row) else {
        return;
    };
    if ((last - first) as f64) < options.seal_max_fraction * mask.width() as f64 {
        let bar = Box::from_corners(
            first as i32,
            row as i32,
            last as i32 + 1,
            (row + options.seal_thickness) as i32,
        );
        mask.fill_rect(&bar, seal);
    }
}

/// Background pixels lying between the first and last foreground pixel
/// of their row.
fn row_gaps(mask: &Mask) -> SegmentResult<Mask> {
    let mut gaps = Mask::new(mask.width(), mask.height())?;
    for y in 0..mask.height() {
        if let Some((first, last)) = mask.row_span(y) {
            for x in first..=last {
                if !mask.get(x, y) {
                    gaps.set(x, y, true);
                }
            }
        }
    }
    Ok(gaps)
}

/// Fill a mask according to `options.fill_mode`.
///
/// `sharp` is the sharp-edge mask used by [`FillMode::FillByContours`];
/// filled pixels on it that were not already foreground are cleared.
pub fn fill(mask: &Mask, options: &RepairOptions, sharp: Option<&Mask>) -> SegmentResult<Mask> {
    let conn = ConnectivityType::EightWay;
    let filled = match options.fill_mode {
        FillMode::RemoveBorder => {
            fill_holes_below(&clear_border(mask, conn)?, options.hollow_min_area, conn)?
        }
        FillMode::FillSimple => fill_holes(mask, conn)?,
        FillMode::FillWithHoles => fill_holes_below(mask, options.hollow_min_area, conn)?,
        FillMode::FillByContours => {
            let (labels, components) = label_connected_components(mask, conn)?;
            let mut out = Mask::new(mask.width(), mask.height())?;
            for c in &components {
                fill_component_interior(&labels, c, conn, &mut out)?;
            }
            if let Some(sharp) = sharp {
                out.subtract_assign(&sharp.subtract(mask)?)?;
            }
            out
        }
    };
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nozzle::RectNozzle;

    /// Tall 20x60 image with a U-shaped tube open at the top.
    fn open_tube() -> Mask {
        Mask::from_fn(20, 60, |x, y| {
            let walls = (x == 8 || x == 11) && (10..50).contains(&y);
            let bottom = (8..12).contains(&x) && y == 50;
            walls || bottom
        })
        .unwrap()
    }

    fn ring() -> Mask {
        Mask::from_fn(40, 40, |x, y| {
            let outer = (5..35).contains(&x) && (5..35).contains(&y);
            let hole = (10..30).contains(&x) && (10..30).contains(&y);
            let pin = (18..20).contains(&x) && (18..20).contains(&y);
            (outer && !hole) || pin
        })
        .unwrap()
    }

    #[test]
    fn test_close_vertical_top_seals_tube() {
        let opts = RepairOptions::default().with_fill_mode(FillMode::FillSimple);
        let sealed = close_vertical_top(&open_tube(), true, &opts);
        assert!(sealed.get(9, 11));
        let filled = fill(&sealed, &opts, None).unwrap();
        assert!(filled.get(9, 30));
        assert!(filled.get(10, 45));

        let unsealed = close_vertical_top(&filled, false, &opts);
        assert!(!unsealed.get(9, 10));
        assert!(unsealed.get(9, 30));
    }

    #[test]
    fn test_close_vertical_top_skips_wide_images() {
        let wide = Mask::from_fn(40, 40, |x, y| x == 20 && y > 5).unwrap();
        let out = close_vertical_top(&wide, true, &RepairOptions::default());
        assert_eq!(out, wide);
    }

    #[test]
    fn test_fill_modes() {
        let m = ring();
        let mut opts = RepairOptions::default();

        opts.fill_mode = FillMode::FillSimple;
        assert_eq!(fill(&m, &opts, None).unwrap().count(), 900);

        // hole of 400 - 4 pixels is below the default hollow area
        opts.fill_mode = FillMode::FillWithHoles;
        assert_eq!(fill(&m, &opts, None).unwrap().count(), 900);
        opts.hollow_min_area = 100;
        assert_eq!(fill(&m, &opts, None).unwrap().count(), m.count());

        opts.fill_mode = FillMode::FillByContours;
        let by_contours = fill(&m, &opts, None).unwrap();
        assert_eq!(by_contours.count(), 900);

        opts.fill_mode = FillMode::RemoveBorder;
        let touching = Mask::from_fn(40, 40, |x, y| x < 3 || ((20..25).contains(&x) && y == 20)).unwrap();
        assert_eq!(fill(&touching, &opts, None).unwrap().count(), 5);
    }

    #[test]
    fn test_remove_border_fills_pinhole() {
        let square = Mask::from_fn(40, 40, |x, y| {
            let body = (10..30).contains(&x) && (10..30).contains(&y);
            let pin = (19..21).contains(&x) && (19..21).contains(&y);
            body && !pin
        })
        .unwrap();
        let opts = RepairOptions::default().with_fill_mode(FillMode::RemoveBorder);
        assert_eq!(square.count(), 396);
        assert_eq!(fill(&square, &opts, None).unwrap().count(), 400);

        // a hollow at the hollow area is left open
        let opts = opts.with_hollow_min_area(4);
        assert_eq!(fill(&square, &opts, None).unwrap().count(), 396);
    }

    #[test]
    fn test_fill_by_contours_many_specks() {
        let specks = Mask::from_fn(200, 200, |x, y| x % 4 == 1 && y % 4 == 1).unwrap();
        let opts = RepairOptions::default().with_fill_mode(FillMode::FillByContours);
        let out = fill(&specks, &opts, None).unwrap();
        assert_eq!(out.count(), 2500);
        assert_eq!(out, specks);
    }

    #[test]
    fn test_close_bottom_seals_tube_open_at_both_ends() {
        let tube =
            Mask::from_fn(20, 60, |x, y| (x == 8 || x == 11) && (10..50).contains(&y)).unwrap();
        let top_only = RepairOptions::default().with_fill_mode(FillMode::FillSimple);
        let sealed = close_vertical_top(&tube, true, &top_only);
        assert!(!fill(&sealed, &top_only, None).unwrap().get(9, 30));

        let both = top_only.with_close_bottom(true);
        let sealed = close_vertical_top(&tube, true, &both);
        assert!(sealed.get(9, 46));
        let filled = fill(&sealed, &both, None).unwrap();
        assert!(filled.get(9, 30));
        assert!(filled.get(10, 45));

        let unsealed = close_vertical_top(&filled, false, &both);
        assert!(!unsealed.get(9, 46));
        assert!(unsealed.get(9, 30));
    }

    /// Two 6-wide vertical lines `gap` apart, rows 5..95 of a 40x100 mask.
    fn two_lines(gap: u32) -> Mask {
        Mask::from_fn(40, 100, |x, y| {
            let right = 16 + gap;
            ((10..16).contains(&x) || (right..right + 6).contains(&x)) && (5..95).contains(&y)
        })
        .unwrap()
    }

    /// The filled span covering both lines and the gap between them.
    fn spanned(gap: u32) -> Mask {
        Mask::from_fn(40, 100, |x, y| {
            (10..22 + gap).contains(&x) && (5..95).contains(&y)
        })
        .unwrap()
    }

    #[test]
    fn test_empty_vertical_spaces_clears_gaps() {
        let repairer = MorphologicalRepairer::new(RepairOptions::default()).unwrap();

        // wide gap: the row gaps are cut
        let out = repairer.empty_vertical_spaces(&two_lines(8), &spanned(8)).unwrap();
        assert_eq!(out, two_lines(8));

        // narrow gap: the horizontal close bridges it, the bridge is cut
        let out = repairer.empty_vertical_spaces(&two_lines(4), &spanned(4)).unwrap();
        assert_eq!(out, two_lines(4));

        // horizontal rungs between the lines are not strokes
        let (lines, span) = (two_lines(4), spanned(4));
        let ladder =
            Mask::from_fn(40, 100, |x, y| lines.get(x, y) || (span.get(x, y) && y % 6 == 0))
                .unwrap();
        let out = repairer.empty_vertical_spaces(&ladder, &span).unwrap();
        assert_eq!(out, lines);
    }

    #[test]
    fn test_empty_vertical_spaces_spares_nozzle() {
        let nozzle = RectNozzle::new(Box::new_unchecked(0, 0, 40, 30));
        let repairer = MorphologicalRepairer::new(RepairOptions::default())
            .unwrap()
            .with_nozzle(&nozzle, CropRect::full(40, 100));
        let out = repairer.empty_vertical_spaces(&two_lines(8), &spanned(8)).unwrap();
        // rows above 35 are within the grown nozzle and keep the gap
        assert!(out.get(20, 10));
        assert!(out.get(20, 32));
        assert!(!out.get(20, 60));
        assert!(out.get(12, 60));
    }

    #[test]
    fn test_fill_by_contours_respects_sharp_edges() {
        let m = ring();
        let opts = RepairOptions::default().with_fill_mode(FillMode::FillByContours);
        let sharp = Mask::from_fn(40, 40, |x, _| x == 15).unwrap();
        let out = fill(&m, &opts, Some(&sharp)).unwrap();
        assert!(!out.get(15, 20));
        assert!(out.get(15, 7));
        assert!(out.get(16, 20));
    }

    #[test]
    fn test_repair_excludes_nozzle_and_edges() {
        let thresh = Mask::from_fn(40, 40, |_, _| true).unwrap();
        let gray = Pix::from_gray_fn(40, 40, |_, _| 100).unwrap();
        let nozzle = RectNozzle::new(Box::new_unchecked(10, 0, 20, 10));
        let opts = RepairOptions::default()
            .with_fill_mode(FillMode::FillSimple)
            .with_close_top(false);
        let repairer = MorphologicalRepairer::new(opts)
            .unwrap()
            .with_nozzle(&nozzle, CropRect::full(40, 40));
        let out = repairer.repair(&thresh, &gray).unwrap().filled;
        assert!(!out.get(15, 5));
        assert!(!out.get(0, 5));
        assert!(!out.get(39, 5));
        assert!(out.get(0, 20));
        assert!(out.get(20, 20));
    }

    #[test]
    fn test_repair_without_nozzle_is_plain_fill() {
        let m = ring();
        let gray = Pix::from_gray_fn(40, 40, |_, _| 100).unwrap();
        let opts = RepairOptions::default().with_fill_mode(FillMode::FillSimple);
        let out = MorphologicalRepairer::new(opts).unwrap().repair(&m, &gray).unwrap();
        assert_eq!(out.filled.count(), 900);
        assert!(out.edges.is_none());
    }

    #[test]
    fn test_remove_sharp_subtracts_bright_block() {
        // every pixel of a 2x2 bright block has two dark neighbors
        let gray = Pix::from_gray_fn(30, 30, |x, y| {
            if (14..16).contains(&x) && (14..16).contains(&y) { 220 } else { 30 }
        })
        .unwrap();
        let thresh = Mask::from_fn(30, 30, |x, y| (8..22).contains(&x) && (8..22).contains(&y)).unwrap();
        let opts = RepairOptions::default()
            .with_fill_mode(FillMode::FillWithHoles)
            .with_hollow_min_area(1)
            .with_remove_sharp(true, 20.0);
        let out = MorphologicalRepairer::new(opts).unwrap().repair(&thresh, &gray).unwrap();
        assert!(out.edges.is_some());
        assert!(!out.filled.get(15, 15));
        assert_eq!(out.filled.count(), thresh.count() - 1);
    }
}

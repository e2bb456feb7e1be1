//! Binary morphological operations
//!
//! Erosion, dilation, opening and closing of a [`Mask`]. Each SEL row is
//! decomposed into horizontal runs and tested against per-row prefix
//! counts of the source, so the cost per pixel is one lookup per run
//! rather than one per hit.

use crate::sel::SelRun;
use crate::{MorphResult, Sel};
use inkseg_core::{BG, FG, Mask};

/// How erosion treats pixels outside the image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryCondition {
    /// Outside pixels count as foreground for erosion, so objects that
    /// touch the border are not eaten away from the outside
    #[default]
    Symmetric,
    /// Outside pixels are background for both erosion and dilation
    Asymmetric,
}

/// Per-row prefix counts of foreground pixels.
struct RowCounts {
    width: i32,
    stride: usize,
    counts: Vec<u32>,
}

impl RowCounts {
    fn new(mask: &Mask) -> Self {
        let stride = mask.width() as usize + 1;
        let mut counts = vec![0u32; stride * mask.height() as usize];
        for y in 0..mask.height() {
            let base = y as usize * stride;
            for (x, &v) in mask.row(y).iter().enumerate() {
                counts[base + x + 1] = counts[base + x] + u32::from(v == FG);
            }
        }
        Self {
            width: mask.width() as i32,
            stride,
            counts,
        }
    }

    /// Foreground count and in-image length of `[x0, x1]` in row `y`.
    fn span(&self, y: i32, x0: i32, x1: i32) -> (u32, u32) {
        let lo = x0.max(0);
        let hi = x1.min(self.width - 1);
        if lo > hi {
            return (0, 0);
        }
        let base = y as usize * self.stride;
        let n = self.counts[base + hi as usize + 1] - self.counts[base + lo as usize];
        (n, (hi - lo + 1) as u32)
    }
}

fn from_rows(mask: &Mask, f: impl Fn(i32, i32) -> bool) -> MorphResult<Mask> {
    let (w, h) = (mask.width(), mask.height());
    let mut data = Vec::with_capacity(w as usize * h as usize);
    for y in 0..h as i32 {
        for x in 0..w as i32 {
            data.push(if f(x, y) { FG } else { BG });
        }
    }
    Ok(Mask::from_nonzero(w, h, data)?)
}

/// Dilate a mask
///
/// Dilation expands foreground regions: a pixel is set when any hit of
/// the reflected SEL lands on source foreground.
pub fn dilate(mask: &Mask, sel: &Sel) -> MorphResult<Mask> {
    let rows = RowCounts::new(mask);
    let runs = sel.runs();
    let h = mask.height() as i32;
    from_rows(mask, |x, y| {
        runs.iter().any(|&SelRun { dy, dx_min, dx_max }| {
            let sy = y - dy;
            sy >= 0 && sy < h && rows.span(sy, x - dx_max, x - dx_min).0 > 0
        })
    })
}

/// Erode a mask with the default (symmetric) boundary condition
///
/// Erosion shrinks foreground regions: a pixel survives only when every
/// hit of the SEL lands on foreground.
pub fn erode(mask: &Mask, sel: &Sel) -> MorphResult<Mask> {
    erode_with(mask, sel, BoundaryCondition::Symmetric)
}

/// Erode a mask with an explicit boundary condition
pub fn erode_with(mask: &Mask, sel: &Sel, bc: BoundaryCondition) -> MorphResult<Mask> {
    let rows = RowCounts::new(mask);
    let runs = sel.runs();
    let (w, h) = (mask.width() as i32, mask.height() as i32);
    let asym = bc == BoundaryCondition::Asymmetric;
    from_rows(mask, |x, y| {
        runs.iter().all(|&SelRun { dy, dx_min, dx_max }| {
            let sy = y + dy;
            let (x0, x1) = (x + dx_min, x + dx_max);
            if asym && (sy < 0 || sy >= h || x0 < 0 || x1 >= w) {
                return false;
            }
            if sy < 0 || sy >= h {
                return true;
            }
            let (n, len) = rows.span(sy, x0, x1);
            n == len
        })
    })
}

/// Open a mask
///
/// Opening = Erosion followed by Dilation.
/// Removes small foreground objects and smooths contours.
pub fn open(mask: &Mask, sel: &Sel) -> MorphResult<Mask> {
    let eroded = erode(mask, sel)?;
    dilate(&eroded, sel)
}

/// Close a mask
///
/// Closing = Dilation followed by Erosion.
/// Fills small holes and connects nearby objects.
pub fn close(mask: &Mask, sel: &Sel) -> MorphResult<Mask> {
    let dilated = dilate(mask, sel)?;
    erode(&dilated, sel)
}

/// Dilate with a disk of `radius`.
pub fn dilate_disk(mask: &Mask, radius: u32) -> MorphResult<Mask> {
    if radius == 0 {
        return Ok(mask.clone());
    }
    dilate(mask, &Sel::create_disk(radius)?)
}

/// Erode with a disk of `radius`.
pub fn erode_disk(mask: &Mask, radius: u32) -> MorphResult<Mask> {
    if radius == 0 {
        return Ok(mask.clone());
    }
    erode(mask, &Sel::create_disk(radius)?)
}

/// Open with a disk of `radius`.
pub fn open_disk(mask: &Mask, radius: u32) -> MorphResult<Mask> {
    if radius == 0 {
        return Ok(mask.clone());
    }
    open(mask, &Sel::create_disk(radius)?)
}

/// Close with a disk of `radius`.
pub fn close_disk(mask: &Mask, radius: u32) -> MorphResult<Mask> {
    if radius == 0 {
        return Ok(mask.clone());
    }
    close(mask, &Sel::create_disk(radius)?)
}

/// Close for a positive `radius`, open for a negative one, copy for zero.
pub fn close_or_open(mask: &Mask, radius: i32) -> MorphResult<Mask> {
    match radius {
        r if r > 0 => close_disk(mask, r.unsigned_abs()),
        r if r < 0 => open_disk(mask, r.unsigned_abs()),
        _ => Ok(mask.clone()),
    }
}

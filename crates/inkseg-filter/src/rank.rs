//! Rank filtering operations
//!
//! Order-statistic filters over a square window, computed with a
//! sliding 256-bin histogram per row. Pixels beyond the image edge
//! replicate the nearest edge pixel.

use crate::error::{check_grayscale, check_odd_window};
use crate::{FilterError, FilterResult};
use inkseg_core::{Channels, Pix};

/// Apply a rank filter to a gray image.
///
/// `rank` in `[0, 1]` selects the order statistic: 0 is the window
/// minimum, 0.5 the median and 1 the maximum.
///
/// # Errors
///
/// Returns [`FilterError::UnsupportedChannels`] for color input and
/// [`FilterError::InvalidParameters`] for an even window or a rank
/// outside `[0, 1]`.
pub fn rank_filter(pix: &Pix, size: u32, rank: f32) -> FilterResult<Pix> {
    check_grayscale(pix)?;
    check_odd_window(size)?;
    if !(0.0..=1.0).contains(&rank) {
        return Err(FilterError::InvalidParameters(format!(
            "rank must be in [0, 1], got {rank}"
        )));
    }
    if size == 1 {
        return Ok(pix.clone());
    }

    let w = pix.width() as i32;
    let h = pix.height() as i32;
    let half = (size / 2) as i32;
    let target = ((size * size - 1) as f32 * rank).round() as u32;
    let src = pix.data();
    let at = |x: i32, y: i32| src[(y.clamp(0, h - 1) * w + x.clamp(0, w - 1)) as usize];

    let mut out = vec![0u8; src.len()];
    let mut hist = [0u32; 256];
    for y in 0..h {
        hist.fill(0);
        for dy in -half..=half {
            for dx in -half..=half {
                hist[at(dx, y + dy) as usize] += 1;
            }
        }
        for x in 0..w {
            if x > 0 {
                for dy in -half..=half {
                    hist[at(x - half - 1, y + dy) as usize] -= 1;
                    hist[at(x + half, y + dy) as usize] += 1;
                }
            }
            out[(y * w + x) as usize] = select_rank(&hist, target);
        }
    }

    Ok(Pix::from_raw(pix.width(), pix.height(), Channels::Gray, out)?)
}

/// Apply a median filter with an odd square window.
///
/// # Errors
///
/// See [`rank_filter`].
pub fn median_filter(pix: &Pix, size: u32) -> FilterResult<Pix> {
    rank_filter(pix, size, 0.5)
}

fn select_rank(hist: &[u32; 256], target: u32) -> u8 {
    let mut seen = 0u32;
    for (v, &n) in hist.iter().enumerate() {
        seen += n;
        if seen > target {
            return v as u8;
        }
    }
    255
}

//! Color segmentation
//!
//! Unsupervised two-class splits for images where a single global gray
//! threshold is not enough:
//!
//! 1. **Two-cluster**: k-means with k = 2 over pixel colors; the minority
//!    cluster becomes foreground
//! 2. **Channel difference**: red-over-blue ink on a bright substrate,
//!    separated with two Otsu thresholds

use crate::error::check_rgb;
use crate::threshold::compute_otsu_threshold;
use crate::{ColorError, ColorResult};
use inkseg_core::{BG, FG, Mask, Pix, RgbComponent};
use inkseg_filter::median_filter;
use std::collections::HashMap;

// =============================================================================
// Constants
// =============================================================================

/// Median window applied to the red-blue difference image
const DIFFERENCE_BLUR: u32 = 5;

// =============================================================================
// Options
// =============================================================================

/// Options for two-cluster segmentation
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterOptions {
    /// Maximum number of assign/update rounds
    pub max_iterations: u32,
    /// Stop once no center moves further than this (in 8-bit units)
    pub epsilon: f64,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            epsilon: 0.5,
        }
    }
}

impl ClusterOptions {
    pub fn with_max_iterations(mut self, n: u32) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// # Errors
    ///
    /// Returns [`ColorError::InvalidParameters`] when no iteration is
    /// allowed or epsilon is negative.
    pub fn validate(&self) -> ColorResult<()> {
        if self.max_iterations == 0 {
            return Err(ColorError::InvalidParameters(
                "cluster iterations must be positive".into(),
            ));
        }
        if !(self.epsilon >= 0.0) {
            return Err(ColorError::InvalidParameters(format!(
                "cluster epsilon must be non-negative, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Two-cluster split
// =============================================================================

type Color = [f64; 3];

fn pack(p: &[u8]) -> u32 {
    match *p {
        [v] => u32::from_be_bytes([0, v, v, v]),
        [r, g, b] => u32::from_be_bytes([0, r, g, b]),
        _ => 0,
    }
}

fn unpack(key: u32) -> Color {
    let [_, r, g, b] = key.to_be_bytes();
    [r as f64, g as f64, b as f64]
}

fn luma(c: &Color) -> f64 {
    0.299 * c[0] + 0.587 * c[1] + 0.114 * c[2]
}

fn dist2(a: &Color, b: &Color) -> f64 {
    (0..3).map(|i| (a[i] - b[i]) * (a[i] - b[i])).sum()
}

/// Index of the nearest center; ties go to cluster 0.
fn nearest(c: &Color, centers: &[Color; 2]) -> usize {
    usize::from(dist2(c, &centers[1]) < dist2(c, &centers[0]))
}

/// Split an image into two color clusters and return the smaller one.
///
/// Clustering runs on the distinct colors weighted by their pixel
/// counts, starting from the darkest and brightest color. The cluster
/// with fewer pixels is foreground (the darker one on a tie); a result
/// covering more than half the image is inverted. An image with a single
/// color has no foreground.
///
/// # Errors
///
/// Returns [`ColorError::InvalidParameters`] for invalid options.
pub fn two_cluster_segment(pix: &Pix, options: &ClusterOptions) -> ColorResult<Mask> {
    options.validate()?;
    let spp = pix.channels().count() as usize;

    let mut counts: HashMap<u32, u64> = HashMap::new();
    for p in pix.data().chunks_exact(spp) {
        *counts.entry(pack(p)).or_default() += 1;
    }
    let mut colors: Vec<(u32, Color, u64)> = counts
        .into_iter()
        .map(|(key, n)| (key, unpack(key), n))
        .collect();
    colors.sort_unstable_by_key(|&(key, _, _)| key);

    let by_luma = |a: &&(u32, Color, u64), b: &&(u32, Color, u64)| luma(&a.1).total_cmp(&luma(&b.1));
    let (Some(darkest), Some(brightest)) = (
        colors.iter().min_by(by_luma),
        colors.iter().max_by(by_luma),
    ) else {
        return Ok(Mask::new(pix.width(), pix.height())?);
    };
    let mut centers = [darkest.1, brightest.1];

    for _ in 0..options.max_iterations {
        let mut sums = [[0.0f64; 3]; 2];
        let mut weights = [0.0f64; 2];
        for (_, c, n) in &colors {
            let k = nearest(c, &centers);
            for i in 0..3 {
                sums[k][i] += c[i] * *n as f64;
            }
            weights[k] += *n as f64;
        }
        let mut shift = 0.0f64;
        for k in 0..2 {
            if weights[k] > 0.0 {
                let next = sums[k].map(|s| s / weights[k]);
                shift = shift.max(dist2(&next, &centers[k]).sqrt());
                centers[k] = next;
            }
        }
        if shift <= options.epsilon {
            break;
        }
    }

    let mut sizes = [0u64; 2];
    let assignment: HashMap<u32, usize> = colors
        .iter()
        .map(|(key, c, n)| {
            let k = nearest(c, &centers);
            sizes[k] += n;
            (*key, k)
        })
        .collect();
    let fg_cluster = match sizes[0].cmp(&sizes[1]) {
        std::cmp::Ordering::Less => 0,
        std::cmp::Ordering::Greater => 1,
        std::cmp::Ordering::Equal => usize::from(luma(&centers[1]) < luma(&centers[0])),
    };

    let data = pix
        .data()
        .chunks_exact(spp)
        .map(|p| {
            if assignment.get(&pack(p)) == Some(&fg_cluster) {
                FG
            } else {
                BG
            }
        })
        .collect();
    let mask = Mask::from_nonzero(pix.width(), pix.height(), data)?;
    if mask.foreground_fraction() > 0.5 {
        return Ok(mask.invert());
    }
    Ok(mask)
}

// =============================================================================
// Channel difference
// =============================================================================

/// Segment reddish ink by its red-over-blue excess.
///
/// `d = R - B` (saturating) is median-blurred. Foreground is the
/// non-background region (red above its Otsu threshold) minus the pixels
/// whose difference is at or below the Otsu threshold of `d`.
///
/// # Errors
///
/// Returns [`ColorError::UnsupportedChannels`] for gray input.
pub fn channel_difference_threshold(pix: &Pix) -> ColorResult<Mask> {
    check_rgb(pix)?;
    let diff = median_filter(
        &pix.channel_difference(RgbComponent::Red, RgbComponent::Blue)?,
        DIFFERENCE_BLUR,
    )?;
    let red = pix.channel(RgbComponent::Red)?;
    let t_diff = compute_otsu_threshold(&diff)?;
    let t_red = compute_otsu_threshold(&red)?;

    let data = red
        .data()
        .iter()
        .zip(diff.data())
        .map(|(&r, &d)| if r > t_red && d > t_diff { FG } else { BG })
        .collect();
    Ok(Mask::from_nonzero(pix.width(), pix.height(), data)?)
}

//! Binary thresholding
//!
//! Converts gray images to foreground masks. Ink is dark on a bright
//! substrate, so every method here is an *inverse* binarization: a pixel
//! becomes foreground when it is at or below the threshold.
//!
//! - Fixed threshold
//! - Fixed-intensity search (lower the threshold until the mask is sparse)
//! - Otsu's method (automatic global threshold)
//! - Adaptive (local mean or Gaussian) thresholding

use crate::error::check_grayscale;
use crate::{ColorError, ColorResult};
use inkseg_core::{BG, FG, FPix, Mask, Pix};
use inkseg_filter::{block_mean, gaussian_blur};

// =============================================================================
// Options
// =============================================================================

/// Options for the fixed-intensity threshold search
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdSearchOptions {
    /// Threshold the search starts from
    pub ceiling: u8,
    /// Lowest threshold the search may reach
    pub floor: u8,
    /// Amount the threshold is lowered per step
    pub step: u8,
    /// Foreground fraction at or above which the mask counts as
    /// "too much" and the threshold is lowered again
    pub whiteness_ceiling: f64,
}

impl Default for ThresholdSearchOptions {
    fn default() -> Self {
        Self {
            ceiling: 200,
            floor: 50,
            step: 10,
            whiteness_ceiling: 80.0 / 255.0,
        }
    }
}

impl ThresholdSearchOptions {
    pub fn with_ceiling(mut self, ceiling: u8) -> Self {
        self.ceiling = ceiling;
        self
    }

    pub fn with_floor(mut self, floor: u8) -> Self {
        self.floor = floor;
        self
    }

    pub fn with_step(mut self, step: u8) -> Self {
        self.step = step;
        self
    }

    pub fn with_whiteness_ceiling(mut self, fraction: f64) -> Self {
        self.whiteness_ceiling = fraction;
        self
    }

    /// Check that the search bounds describe a finite, non-empty walk.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::InvalidParameters`] for a zero step, a floor
    /// above the ceiling or a whiteness ceiling outside `(0, 1]`.
    pub fn validate(&self) -> ColorResult<()> {
        if self.step == 0 {
            return Err(ColorError::InvalidParameters(
                "threshold search step must be positive".into(),
            ));
        }
        if self.floor > self.ceiling {
            return Err(ColorError::InvalidParameters(format!(
                "threshold search floor {} is above ceiling {}",
                self.floor, self.ceiling
            )));
        }
        if !(self.whiteness_ceiling > 0.0 && self.whiteness_ceiling <= 1.0) {
            return Err(ColorError::InvalidParameters(format!(
                "whiteness ceiling must be in (0, 1], got {}",
                self.whiteness_ceiling
            )));
        }
        Ok(())
    }

    /// Upper bound on the number of threshold evaluations.
    pub fn max_steps(&self) -> u32 {
        self.ceiling.saturating_sub(self.floor) as u32 / self.step.max(1) as u32 + 1
    }
}

/// Options for adaptive thresholding
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptiveThresholdOptions {
    /// Size of the local window (must be odd, at least 3)
    pub window_size: u32,
    /// Constant subtracted from the local mean
    pub c: f32,
    /// Method for computing local threshold
    pub method: AdaptiveMethod,
}

/// Method for adaptive threshold computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdaptiveMethod {
    /// Use mean of local window
    Mean,
    /// Use Gaussian-weighted mean
    Gaussian,
}

impl Default for AdaptiveThresholdOptions {
    fn default() -> Self {
        Self {
            window_size: 11,
            c: 6.0,
            method: AdaptiveMethod::Gaussian,
        }
    }
}

impl AdaptiveThresholdOptions {
    pub fn with_window_size(mut self, size: u32) -> Self {
        self.window_size = size;
        self
    }

    pub fn with_c(mut self, c: f32) -> Self {
        self.c = c;
        self
    }

    pub fn with_method(mut self, method: AdaptiveMethod) -> Self {
        self.method = method;
        self
    }

    /// # Errors
    ///
    /// Returns [`ColorError::InvalidParameters`] for an even or too small
    /// window.
    pub fn validate(&self) -> ColorResult<()> {
        if self.window_size < 3 || self.window_size % 2 == 0 {
            return Err(ColorError::InvalidParameters(format!(
                "adaptive window must be odd and >= 3, got {}",
                self.window_size
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Fixed thresholds
// =============================================================================

/// Foreground wherever `gray <= threshold`.
///
/// # Errors
///
/// Returns [`ColorError::UnsupportedChannels`] for color input.
pub fn threshold_inv(pix: &Pix, threshold: u8) -> ColorResult<Mask> {
    check_grayscale(pix)?;
    let data = pix
        .data()
        .iter()
        .map(|&v| if v <= threshold { FG } else { BG })
        .collect();
    Ok(Mask::from_nonzero(pix.width(), pix.height(), data)?)
}

/// Outcome of [`fixed_threshold_search`]
#[derive(Debug, Clone)]
pub struct ThresholdSearch {
    /// Mask at the threshold the search stopped at
    pub mask: Mask,
    /// Threshold the search stopped at
    pub threshold: u8,
    /// Foreground fraction of `mask`
    pub fraction: f64,
    /// Number of times the threshold was lowered
    pub steps: u32,
}

/// Lower a global threshold until the mask stops looking "too white".
///
/// Starting at `ceiling`, the threshold drops by `step` while the
/// foreground fraction is at or above `whiteness_ceiling`, never going
/// below `floor`. Fractions come from the cumulative histogram, so only
/// the final mask is materialized.
///
/// # Errors
///
/// Returns an error for color input or invalid options.
pub fn fixed_threshold_search(
    pix: &Pix,
    options: &ThresholdSearchOptions,
) -> ColorResult<ThresholdSearch> {
    check_grayscale(pix)?;
    options.validate()?;

    let hist = pix.gray_histogram();
    let mut cumulative = [0u64; 256];
    let mut acc = 0u64;
    for (i, &n) in hist.iter().enumerate() {
        acc += n as u64;
        cumulative[i] = acc;
    }
    let total = acc as f64;
    let fraction_at = |t: u8| cumulative[t as usize] as f64 / total;

    let mut threshold = options.ceiling;
    let mut fraction = fraction_at(threshold);
    let mut steps = 0;
    let max_steps = options.max_steps();
    while fraction >= options.whiteness_ceiling && threshold > options.floor && steps < max_steps {
        threshold = threshold.saturating_sub(options.step).max(options.floor);
        fraction = fraction_at(threshold);
        steps += 1;
    }

    Ok(ThresholdSearch {
        mask: threshold_inv(pix, threshold)?,
        threshold,
        fraction,
        steps,
    })
}

// =============================================================================
// Otsu
// =============================================================================

/// Otsu's threshold of a 256-bin histogram.
///
/// Returns the largest value of the darker class. A histogram with a
/// single occupied bin returns that bin.
pub fn otsu_from_histogram(hist: &[u32; 256]) -> u8 {
    let total: f64 = hist.iter().map(|&n| n as f64).sum();
    let weighted: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &n)| i as f64 * n as f64)
        .sum();

    let mut w0 = 0.0;
    let mut sum0 = 0.0;
    let mut best: Option<(u8, f64)> = None;
    for (t, &n) in hist.iter().enumerate() {
        w0 += n as f64;
        sum0 += t as f64 * n as f64;
        let w1 = total - w0;
        if w0 == 0.0 || w1 == 0.0 {
            continue;
        }
        let m0 = sum0 / w0;
        let m1 = (weighted - sum0) / w1;
        let between = w0 * w1 * (m0 - m1) * (m0 - m1);
        if best.is_none_or(|(_, b)| between > b) {
            best = Some((t as u8, between));
        }
    }

    match best {
        Some((t, _)) => t,
        None => hist.iter().position(|&n| n > 0).unwrap_or(0) as u8,
    }
}

/// Compute Otsu's threshold for a gray image.
///
/// # Errors
///
/// Returns [`ColorError::UnsupportedChannels`] for color input.
pub fn compute_otsu_threshold(pix: &Pix) -> ColorResult<u8> {
    check_grayscale(pix)?;
    Ok(otsu_from_histogram(&pix.gray_histogram()))
}

/// Inverse binarization at Otsu's threshold.
pub fn threshold_otsu(pix: &Pix) -> ColorResult<Mask> {
    let t = compute_otsu_threshold(pix)?;
    threshold_inv(pix, t)
}

// =============================================================================
// Adaptive
// =============================================================================

/// Apply adaptive thresholding.
///
/// A pixel is foreground when it is at least `c` darker than the mean
/// (or Gaussian-weighted mean) of its `window_size` neighborhood.
///
/// # Errors
///
/// Returns an error for color input or an invalid window.
pub fn adaptive_threshold(pix: &Pix, options: &AdaptiveThresholdOptions) -> ColorResult<Mask> {
    check_grayscale(pix)?;
    options.validate()?;
    let local: FPix = match options.method {
        AdaptiveMethod::Mean => block_mean(pix, options.window_size)?,
        AdaptiveMethod::Gaussian => gaussian_blur(pix, options.window_size)?,
    };
    let data = pix
        .data()
        .iter()
        .zip(local.data())
        .map(|(&v, &m)| if v as f32 <= m - options.c { FG } else { BG })
        .collect();
    Ok(Mask::from_nonzero(pix.width(), pix.height(), data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Pix {
        // 256 columns, one per gray level
        Pix::from_gray_fn(256, 2, |x, _| x as u8).unwrap()
    }

    #[test]
    fn test_threshold_inv_is_inclusive() {
        let mask = threshold_inv(&ramp(), 9).unwrap();
        assert_eq!(mask.count(), 20);
        assert!(mask.get(9, 0));
        assert!(!mask.get(10, 0));
    }

    #[test]
    fn test_search_stops_below_whiteness() {
        // fraction(t) = (t + 1) / 256 is still >= 80/255 at t = 80
        let result = fixed_threshold_search(&ramp(), &ThresholdSearchOptions::default()).unwrap();
        assert_eq!(result.threshold, 70);
        assert_eq!(result.steps, 13);
        assert!(result.fraction < 80.0 / 255.0);
        assert_eq!(result.mask.count(), 2 * 71);
    }

    #[test]
    fn test_search_respects_floor() {
        let dark = Pix::from_gray_fn(10, 10, |_, _| 5).unwrap();
        let opts = ThresholdSearchOptions::default().with_floor(60);
        let result = fixed_threshold_search(&dark, &opts).unwrap();
        assert_eq!(result.threshold, 60);
        assert_eq!(result.fraction, 1.0);
        assert!(result.steps <= opts.max_steps());
    }

    #[test]
    fn test_search_no_steps_when_sparse() {
        let bright = Pix::from_gray_fn(10, 10, |x, _| if x == 0 { 0 } else { 250 }).unwrap();
        let result = fixed_threshold_search(&bright, &ThresholdSearchOptions::default()).unwrap();
        assert_eq!(result.threshold, 200);
        assert_eq!(result.steps, 0);
        assert_eq!(result.mask.count(), 10);
    }

    #[test]
    fn test_search_options_validate() {
        assert!(ThresholdSearchOptions::default().with_step(0).validate().is_err());
        assert!(
            ThresholdSearchOptions::default()
                .with_floor(210)
                .validate()
                .is_err()
        );
        assert!(
            ThresholdSearchOptions::default()
                .with_whiteness_ceiling(0.0)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_otsu_bimodal() {
        let pix = Pix::from_gray_fn(20, 10, |x, _| if x < 5 { 30 } else { 220 }).unwrap();
        let t = compute_otsu_threshold(&pix).unwrap();
        assert!((30..220).contains(&t));
        assert_eq!(threshold_otsu(&pix).unwrap().count(), 50);
    }

    #[test]
    fn test_otsu_single_bin() {
        let mut hist = [0u32; 256];
        hist[77] = 12;
        assert_eq!(otsu_from_histogram(&hist), 77);
    }

    #[test]
    fn test_adaptive_flat_is_empty() {
        let pix = Pix::from_gray_fn(30, 30, |_, _| 128).unwrap();
        for method in [AdaptiveMethod::Mean, AdaptiveMethod::Gaussian] {
            let opts = AdaptiveThresholdOptions::default().with_method(method);
            assert!(adaptive_threshold(&pix, &opts).unwrap().is_all_clear());
        }
    }

    #[test]
    fn test_adaptive_finds_dark_line() {
        let pix = Pix::from_gray_fn(40, 40, |x, _| if x == 20 { 40 } else { 200 }).unwrap();
        let mask = adaptive_threshold(&pix, &AdaptiveThresholdOptions::default()).unwrap();
        assert!(mask.get(20, 10));
        assert!(!mask.get(5, 10));
        assert!(
            adaptive_threshold(&pix, &AdaptiveThresholdOptions::default().with_window_size(4))
                .is_err()
        );
    }

    #[test]
    fn test_rejects_color() {
        let rgb = Pix::new(4, 4, inkseg_core::Channels::Rgb).unwrap();
        assert!(matches!(
            threshold_inv(&rgb, 10),
            Err(ColorError::UnsupportedChannels { .. })
        ));
    }
}

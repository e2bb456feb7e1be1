//! Block means using integral images (summed area tables)
//!
//! A block mean costs O(1) per pixel regardless of window size once the
//! integral image is built. Windows are clipped at the image boundary
//! and normalized by the number of pixels actually inside.

use crate::FilterResult;
use crate::error::{check_grayscale, check_odd_window};
use inkseg_core::{FPix, Pix};

/// Summed area table of an 8-bit gray image.
///
/// Stored with one extra leading row and column of zeros so that
/// `sum(x0, y0, x1, y1)` needs no edge cases.
#[derive(Debug, Clone)]
pub struct IntegralImage {
    width: u32,
    height: u32,
    sums: Vec<u64>,
}

impl IntegralImage {
    /// Build the table: `a(x, y) = v(x, y) + a(x-1, y) + a(x, y-1) - a(x-1, y-1)`.
    ///
    /// # Errors
    ///
    /// Returns an error for color input.
    pub fn new(pix: &Pix) -> FilterResult<Self> {
        check_grayscale(pix)?;
        let w = pix.width() as usize;
        let h = pix.height() as usize;
        let stride = w + 1;
        let mut sums = vec![0u64; stride * (h + 1)];
        for y in 0..h {
            let row = pix.row_data(y as u32);
            let mut run = 0u64;
            for x in 0..w {
                run += row[x] as u64;
                sums[(y + 1) * stride + x + 1] = sums[y * stride + x + 1] + run;
            }
        }
        Ok(Self {
            width: pix.width(),
            height: pix.height(),
            sums,
        })
    }

    /// Sum over the half-open rectangle `[x0, x1) x [y0, y1)`.
    ///
    /// Coordinates are clamped to the image.
    pub fn sum(&self, x0: u32, y0: u32, x1: u32, y1: u32) -> u64 {
        let x0 = x0.min(self.width) as usize;
        let x1 = x1.min(self.width) as usize;
        let y0 = y0.min(self.height) as usize;
        let y1 = y1.min(self.height) as usize;
        if x0 >= x1 || y0 >= y1 {
            return 0;
        }
        let stride = self.width as usize + 1;
        let at = |x: usize, y: usize| self.sums[y * stride + x];
        at(x1, y1) + at(x0, y0) - at(x0, y1) - at(x1, y0)
    }
}

/// Mean of the `size x size` window centered on every pixel.
///
/// # Errors
///
/// Returns an error for color input or an even window size.
pub fn block_mean(pix: &Pix, size: u32) -> FilterResult<FPix> {
    check_odd_window(size)?;
    let acc = IntegralImage::new(pix)?;
    let (w, h) = (pix.width(), pix.height());
    let half = size / 2;
    let mut out = FPix::new(w, h)?;
    let data = out.data_mut();
    for y in 0..h {
        let y0 = y.saturating_sub(half);
        let y1 = (y + half + 1).min(h);
        for x in 0..w {
            let x0 = x.saturating_sub(half);
            let x1 = (x + half + 1).min(w);
            let n = ((x1 - x0) * (y1 - y0)) as f64;
            data[(y * w + x) as usize] = (acc.sum(x0, y0, x1, y1) as f64 / n) as f32;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_sum() {
        let pix = Pix::from_gray_fn(4, 3, |_, _| 2).unwrap();
        let acc = IntegralImage::new(&pix).unwrap();
        assert_eq!(acc.sum(0, 0, 4, 3), 24);
        assert_eq!(acc.sum(1, 1, 3, 2), 4);
        assert_eq!(acc.sum(2, 2, 2, 3), 0);
        assert_eq!(acc.sum(0, 0, 100, 100), 24);
    }

    #[test]
    fn test_block_mean_constant() {
        let pix = Pix::from_gray_fn(9, 9, |_, _| 77).unwrap();
        let mean = block_mean(&pix, 5).unwrap();
        assert!(mean.data().iter().all(|&v| (v - 77.0).abs() < 1e-4));
    }

    #[test]
    fn test_block_mean_clips_at_corner() {
        let pix = Pix::from_gray_fn(3, 3, |x, y| (x + 3 * y) as u8).unwrap();
        let mean = block_mean(&pix, 3).unwrap();
        // corner window covers 0, 1, 3, 4
        assert!((mean.get(0, 0).unwrap() - 2.0).abs() < 1e-6);
        assert!((mean.get(1, 1).unwrap() - 4.0).abs() < 1e-6);
    }
}

//! Intensity statistics
//!
//! Used to reject degenerate input (empty or flat images) before any
//! threshold strategy runs.

use super::Pix;

/// Summary statistics of all samples in an image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityStats {
    pub min: u8,
    pub max: u8,
    pub mean: f64,
    pub variance: f64,
}

impl Pix {
    /// Compute min, max, mean and variance over every sample.
    pub fn intensity_stats(&self) -> IntensityStats {
        let data = self.data();
        let n = data.len() as f64;
        let mut min = u8::MAX;
        let mut max = u8::MIN;
        let mut sum = 0u64;
        let mut sum_sq = 0u64;
        for &v in data {
            min = min.min(v);
            max = max.max(v);
            sum += v as u64;
            sum_sq += (v as u64) * (v as u64);
        }
        let mean = sum as f64 / n;
        let variance = (sum_sq as f64 / n - mean * mean).max(0.0);
        IntensityStats {
            min,
            max,
            mean,
            variance,
        }
    }

    /// Check whether every pixel has the same value in all channels.
    pub fn is_uniform(&self) -> bool {
        let spp = self.channels().count() as usize;
        let data = self.data();
        let first = &data[..spp.min(data.len())];
        data.chunks_exact(spp).all(|p| p == first)
    }

    /// 256-bin histogram of a gray image's samples.
    pub fn gray_histogram(&self) -> [u32; 256] {
        let mut hist = [0u32; 256];
        for &v in self.data() {
            hist[v as usize] += 1;
        }
        hist
    }
}

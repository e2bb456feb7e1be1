//! Convolution kernels
//!
//! Kernels are stored row-major with an explicit center. Only the shapes
//! the pipeline needs have constructors: 1-D Gaussians for separable
//! smoothing and the 4-neighbor Laplacian.

use crate::{FilterError, FilterResult};

/// A 2D convolution kernel
#[derive(Debug, Clone)]
pub struct Kernel {
    width: u32,
    height: u32,
    cx: u32,
    cy: u32,
    data: Vec<f32>,
}

impl Kernel {
    /// Create a kernel from row-major values, centered in the middle.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidKernel`] if the size is zero or
    /// `data` has the wrong length.
    pub fn from_slice(width: u32, height: u32, data: &[f32]) -> FilterResult<Self> {
        if width == 0 || height == 0 {
            return Err(FilterError::InvalidKernel(format!(
                "zero-sized kernel {width}x{height}"
            )));
        }
        if data.len() != (width * height) as usize {
            return Err(FilterError::InvalidKernel(format!(
                "expected {} values, got {}",
                width * height,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            cx: width / 2,
            cy: height / 2,
            data: data.to_vec(),
        })
    }

    /// Create a normalized horizontal 1-D Gaussian of odd `size`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidKernel`] for an even or zero size
    /// or a non-positive sigma.
    pub fn gaussian_1d(size: u32, sigma: f32) -> FilterResult<Self> {
        if size == 0 || size % 2 == 0 {
            return Err(FilterError::InvalidKernel(format!(
                "gaussian size must be odd, got {size}"
            )));
        }
        if sigma <= 0.0 {
            return Err(FilterError::InvalidKernel(format!(
                "gaussian sigma must be positive, got {sigma}"
            )));
        }
        let half = (size / 2) as i32;
        let denom = 2.0 * sigma * sigma;
        let data: Vec<f32> = (-half..=half)
            .map(|i| (-((i * i) as f32) / denom).exp())
            .collect();
        let mut kernel = Self::from_slice(size, 1, &data)?;
        kernel.normalize();
        Ok(kernel)
    }

    /// The 4-neighbor Laplacian `[0 1 0; 1 -4 1; 0 1 0]`.
    pub fn laplacian() -> Self {
        Self {
            width: 3,
            height: 3,
            cx: 1,
            cy: 1,
            data: vec![0.0, 1.0, 0.0, 1.0, -4.0, 1.0, 0.0, 1.0, 0.0],
        }
    }

    /// Get the kernel width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the kernel height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the center X coordinate.
    #[inline]
    pub fn center_x(&self) -> u32 {
        self.cx
    }

    /// Get the center Y coordinate.
    #[inline]
    pub fn center_y(&self) -> u32 {
        self.cy
    }

    /// Get the kernel data.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Get a value at (x, y).
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.data[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Normalize the kernel so that values sum to 1.
    ///
    /// A kernel that sums to zero is left unchanged.
    pub fn normalize(&mut self) {
        let sum = self.sum();
        if sum.abs() > f32::EPSILON {
            for v in &mut self.data {
                *v /= sum;
            }
        }
    }

    /// Get the sum of all kernel values.
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_is_normalized_and_symmetric() {
        let k = Kernel::gaussian_1d(5, 1.1).unwrap();
        assert!((k.sum() - 1.0).abs() < 1e-5);
        assert_eq!(k.get(0, 0), k.get(4, 0));
        assert!(k.get(2, 0).unwrap() > k.get(1, 0).unwrap());
        assert_eq!(k.center_x(), 2);
    }

    #[test]
    fn test_gaussian_rejects_bad_params() {
        assert!(Kernel::gaussian_1d(4, 1.0).is_err());
        assert!(Kernel::gaussian_1d(3, 0.0).is_err());
    }

    #[test]
    fn test_laplacian_sums_to_zero() {
        let k = Kernel::laplacian();
        assert_eq!(k.sum(), 0.0);
        assert_eq!(k.get(1, 1), Some(-4.0));
        assert_eq!(k.get(3, 0), None);
    }

    #[test]
    fn test_from_slice_checks_length() {
        assert!(Kernel::from_slice(3, 3, &[0.0; 8]).is_err());
        assert!(Kernel::from_slice(0, 3, &[]).is_err());
    }
}

//! FPix - Floating-point images
//!
//! Used for signed filter responses such as the Laplacian, where the
//! 8-bit range of [`Pix`](crate::Pix) would clip negative values.

use crate::error::{Error, Result};
use crate::mask::{BG, FG, Mask};

/// Single-channel `f32` image
#[derive(Debug, Clone, PartialEq)]
pub struct FPix {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl FPix {
    /// Create a zero-filled FPix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        Ok(Self {
            width,
            height,
            data: vec![0.0; width as usize * height as usize],
        })
    }

    /// Get the width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the raw values.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Get mutable access to the raw values.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Value at (x, y), or `None` outside the image.
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.data[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Set the value at (x, y). Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, val: f32) {
        if x < self.width && y < self.height {
            self.data[(y * self.width + x) as usize] = val;
        }
    }

    /// Mask of the pixels whose value is strictly below `threshold`.
    pub fn mask_below(&self, threshold: f32) -> Mask {
        let data = self
            .data
            .iter()
            .map(|&v| if v < threshold { FG } else { BG })
            .collect();
        Mask::from_normalized(self.width, self.height, data)
    }
}

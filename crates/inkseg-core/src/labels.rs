//! LabelMap - Labeled component images
//!
//! A `LabelMap` stores one `u32` per pixel: 0 is background and every
//! positive value identifies a connected component. Labels are
//! contiguous right after labeling; erasing components leaves gaps.

use crate::error::{Error, Result};
use crate::mask::{BG, FG, Mask};

/// Per-pixel component identifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    width: u32,
    height: u32,
    data: Vec<u32>,
}

impl LabelMap {
    /// Create an all-background label map.
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
            data: vec![0; width as usize * height as usize],
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

    /// Get the raw labels.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.data
    }

    /// Get mutable access to the raw labels.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u32] {
        &mut self.data
    }

    /// Label at (x, y); out-of-bounds reads as background.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u32 {
        if x < self.width && y < self.height {
            self.data[(y * self.width + x) as usize]
        } else {
            0
        }
    }

    /// Signed lookup; anything outside the map is background.
    #[inline]
    pub fn get_signed(&self, x: i32, y: i32) -> u32 {
        if x < 0 || y < 0 {
            0
        } else {
            self.get(x as u32, y as u32)
        }
    }

    /// Set the label at (x, y). Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, label: u32) {
        if x < self.width && y < self.height {
            self.data[(y * self.width + x) as usize] = label;
        }
    }

    /// Largest label present (0 if empty).
    pub fn max_label(&self) -> u32 {
        self.data.iter().copied().max().unwrap_or(0)
    }

    /// Union of all labeled pixels as a mask.
    pub fn to_mask(&self) -> Mask {
        self.mask_where(|l| l != 0)
    }

    /// Mask of the pixels carrying `label`.
    pub fn mask_of(&self, label: u32) -> Mask {
        self.mask_where(|l| l != 0 && l == label)
    }

    /// Mask of the pixels whose label satisfies `pred` (never called with 0).
    pub fn mask_where(&self, pred: impl Fn(u32) -> bool) -> Mask {
        let data = self
            .data
            .iter()
            .map(|&l| if l != 0 && pred(l) { FG } else { BG })
            .collect();
        Mask::from_normalized(self.width, self.height, data)
    }

    /// Reset every pixel whose label satisfies `pred` to background.
    ///
    /// Returns the number of cleared pixels.
    pub fn erase_where(&mut self, pred: impl Fn(u32) -> bool) -> u64 {
        let mut cleared = 0;
        for l in self.data.iter_mut() {
            if *l != 0 && pred(*l) {
                *l = 0;
                cleared += 1;
            }
        }
        cleared
    }
}

//! Mask - Binary foreground masks
//!
//! A `Mask` is a single-channel `W x H` buffer whose samples are
//! restricted to `{0, 255}`; 255 marks foreground (ink). Every
//! constructor normalizes its input so that invariant always holds.
//!
//! Unlike [`Pix`](crate::Pix), masks are plain owned values: pipeline
//! stages take a mask, derive a new one, and hand it on.

mod ops;

use crate::box_::Box;
use crate::error::{Error, Result};

/// Foreground sample value
pub const FG: u8 = 255;
/// Background sample value
pub const BG: u8 = 0;

/// Binary mask with samples in `{0, 255}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Mask {
    /// Create an all-background mask.
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
            data: vec![BG; width as usize * height as usize],
        })
    }

    /// Wrap a buffer, mapping every nonzero sample to foreground.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] for a zero-area mask and
    /// [`Error::BufferLength`] if `data` is not `width * height` long.
    pub fn from_nonzero(width: u32, height: u32, mut data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(Error::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        for v in data.iter_mut() {
            if *v != BG {
                *v = FG;
            }
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wrap a buffer that is already normalized and correctly sized.
    pub(crate) fn from_normalized(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize);
        Self {
            width,
            height,
            data,
        }
    }

    /// Build a mask by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> bool) -> Result<Self> {
        let mut mask = Self::new(width, height)?;
        for y in 0..height {
            for x in 0..width {
                if f(x, y) {
                    mask.data[(y * width + x) as usize] = FG;
                }
            }
        }
        Ok(mask)
    }

    /// Get the mask width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the mask height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the raw samples (each 0 or 255).
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the samples of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = (y * self.width) as usize;
        &self.data[start..start + self.width as usize]
    }

    /// Check whether (x, y) is foreground. Out-of-bounds is background.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.data[(y * self.width + x) as usize] == FG
    }

    /// Signed lookup; anything outside the mask is background.
    #[inline]
    pub fn get_signed(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && self.get(x as u32, y as u32)
    }

    /// Set (x, y) to foreground or background. Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, on: bool) {
        if x < self.width && y < self.height {
            self.data[(y * self.width + x) as usize] = if on { FG } else { BG };
        }
    }

    /// Number of foreground pixels.
    pub fn count(&self) -> u64 {
        self.data.iter().filter(|&&v| v == FG).count() as u64
    }

    /// Fraction of the mask that is foreground, in `[0, 1]`.
    pub fn foreground_fraction(&self) -> f64 {
        self.count() as f64 / self.data.len() as f64
    }

    /// Check whether no pixel is foreground.
    pub fn is_all_clear(&self) -> bool {
        self.data.iter().all(|&v| v == BG)
    }

    /// Check whether two masks share the same geometry.
    pub fn sizes_equal(&self, other: &Mask) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Require the same geometry as `other`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] when the sizes differ.
    pub fn check_same_size(&self, other: &Mask) -> Result<()> {
        if self.sizes_equal(other) {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                expected: (self.width, self.height),
                actual: (other.width, other.height),
            })
        }
    }

    /// Set every pixel of `rect` (clipped to the mask) to `on`.
    pub fn fill_rect(&mut self, rect: &Box, on: bool) {
        let Some(r) = rect.clip_to(self.width, self.height) else {
            return;
        };
        let val = if on { FG } else { BG };
        for y in r.y..r.bottom() {
            let start = (y as u32 * self.width) as usize;
            self.data[start + r.x as usize..start + r.right() as usize].fill(val);
        }
    }

    /// First row that holds any foreground.
    pub fn first_foreground_row(&self) -> Option<u32> {
        (0..self.height).find(|&y| self.row(y).contains(&FG))
    }

    /// Last row that holds any foreground.
    pub fn last_foreground_row(&self) -> Option<u32> {
        (0..self.height).rev().find(|&y| self.row(y).contains(&FG))
    }

    /// First and last foreground column of row `y`.
    pub fn row_span(&self, y: u32) -> Option<(u32, u32)> {
        if y >= self.height {
            return None;
        }
        let row = self.row(y);
        let first = row.iter().position(|&v| v == FG)?;
        let last = row.iter().rposition(|&v| v == FG)?;
        Some((first as u32, last as u32))
    }

    /// Iterate over foreground coordinates in raster order.
    pub fn foreground(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let w = self.width;
        self.data
            .iter()
            .enumerate()
            .filter(|(_, v)| **v == FG)
            .map(move |(i, _)| (i as u32 % w, i as u32 / w))
    }

    /// Bounding box of the foreground, if any.
    pub fn foreground_bounds(&self) -> Option<Box> {
        let mut it = self.foreground();
        let (x0, y0) = it.next()?;
        let (mut xmin, mut xmax, mut ymax) = (x0, x0, y0);
        for (x, y) in it {
            xmin = xmin.min(x);
            xmax = xmax.max(x);
            ymax = ymax.max(y);
        }
        Some(Box::from_corners(
            xmin as i32,
            y0 as i32,
            xmax as i32 + 1,
            ymax as i32 + 1,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_nonzero_normalizes() {
        let mask = Mask::from_nonzero(3, 1, vec![0, 1, 200]).unwrap();
        assert_eq!(mask.data(), &[0, 255, 255]);
        assert_eq!(mask.count(), 2);
    }

    #[test]
    fn test_from_nonzero_checks_length() {
        assert!(Mask::from_nonzero(3, 3, vec![0; 8]).is_err());
        assert!(Mask::from_nonzero(0, 3, vec![]).is_err());
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut mask = Mask::new(10, 10).unwrap();
        mask.fill_rect(&Box::new_unchecked(8, 8, 5, 5), true);
        assert_eq!(mask.count(), 4);
        assert!(mask.get(9, 9));
        mask.fill_rect(&Box::new_unchecked(-2, -2, 100, 100), false);
        assert!(mask.is_all_clear());
    }

    #[test]
    fn test_first_row_and_span() {
        let mask = Mask::from_fn(10, 6, |x, y| y >= 2 && (3..7).contains(&x)).unwrap();
        assert_eq!(mask.first_foreground_row(), Some(2));
        assert_eq!(mask.last_foreground_row(), Some(5));
        assert_eq!(Mask::new(3, 3).unwrap().last_foreground_row(), None);
        assert_eq!(mask.row_span(2), Some((3, 6)));
        assert_eq!(mask.row_span(0), None);
        assert_eq!(
            mask.foreground_bounds(),
            Some(Box::new_unchecked(3, 2, 4, 4))
        );
    }

    #[test]
    fn test_get_out_of_bounds_is_background() {
        let mask = Mask::from_fn(2, 2, |_, _| true).unwrap();
        assert!(!mask.get(2, 0));
        assert!(!mask.get_signed(-1, 0));
        assert!(mask.get_signed(1, 1));
    }
}

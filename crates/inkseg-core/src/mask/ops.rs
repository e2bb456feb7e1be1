//! Pixel-wise mask arithmetic
//!
//! All binary operations require equal geometry and return a new mask.
//! `or` is the saturating add of two {0,255} buffers, `subtract` the
//! saturating difference.

use super::{BG, FG, Mask};
use crate::error::Result;

impl Mask {
    fn zip_with(&self, other: &Mask, f: impl Fn(bool, bool) -> bool) -> Result<Mask> {
        self.check_same_size(other)?;
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| if f(a == FG, b == FG) { FG } else { BG })
            .collect();
        Ok(Mask {
            width: self.width,
            height: self.height,
            data,
        })
    }

    /// Union of two masks.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` when the sizes differ.
    pub fn or(&self, other: &Mask) -> Result<Mask> {
        self.zip_with(other, |a, b| a || b)
    }

    /// Intersection of two masks.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` when the sizes differ.
    pub fn and(&self, other: &Mask) -> Result<Mask> {
        self.zip_with(other, |a, b| a && b)
    }

    /// Pixels of `self` that are not in `other`.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` when the sizes differ.
    pub fn subtract(&self, other: &Mask) -> Result<Mask> {
        self.zip_with(other, |a, b| a && !b)
    }

    /// In-place union.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` when the sizes differ.
    pub fn or_assign(&mut self, other: &Mask) -> Result<()> {
        self.check_same_size(other)?;
        for (a, &b) in self.data.iter_mut().zip(&other.data) {
            if b == FG {
                *a = FG;
            }
        }
        Ok(())
    }

    /// In-place difference.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` when the sizes differ.
    pub fn subtract_assign(&mut self, other: &Mask) -> Result<()> {
        self.check_same_size(other)?;
        for (a, &b) in self.data.iter_mut().zip(&other.data) {
            if b == FG {
                *a = BG;
            }
        }
        Ok(())
    }

    /// Complement of the mask.
    pub fn invert(&self) -> Mask {
        Mask {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| FG - v).collect(),
        }
    }

    /// Check whether any foreground pixel is shared with `other`.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` when the sizes differ.
    pub fn overlaps(&self, other: &Mask) -> Result<bool> {
        self.check_same_size(other)?;
        Ok(self
            .data
            .iter()
            .zip(&other.data)
            .any(|(&a, &b)| a == FG && b == FG))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn left_half() -> Mask {
        Mask::from_fn(4, 2, |x, _| x < 2).unwrap()
    }

    fn first_row() -> Mask {
        Mask::from_fn(4, 2, |_, y| y == 0).unwrap()
    }

    #[test]
    fn test_set_algebra() {
        let a = left_half();
        let b = first_row();
        assert_eq!(a.or(&b).unwrap().count(), 6);
        assert_eq!(a.and(&b).unwrap().count(), 2);
        assert_eq!(a.subtract(&b).unwrap().count(), 2);
        assert_eq!(b.subtract(&a).unwrap().count(), 2);
        assert_eq!(a.invert().count(), 4);
        assert!(a.overlaps(&b).unwrap());
        assert!(!a.overlaps(&a.invert()).unwrap());
    }

    #[test]
    fn test_in_place_ops() {
        let mut a = left_half();
        a.or_assign(&first_row()).unwrap();
        assert_eq!(a.count(), 6);
        a.subtract_assign(&first_row()).unwrap();
        assert_eq!(a.count(), 2);
    }

    #[test]
    fn test_size_mismatch() {
        let a = left_half();
        let b = Mask::new(3, 3).unwrap();
        assert!(a.or(&b).is_err());
        assert!(a.clone().or_assign(&b).is_err());
    }
}

//! Box - Rectangle regions
//!
//! Bounding boxes of components and crop rectangles are expressed as
//! `(x, y, w, h)` with the right and bottom edges exclusive.

use crate::error::{Error, Result};

/// A rectangle region
///
/// This is a simple Copy type since it's small and frequently copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Box {
    /// Left x coordinate
    pub x: i32,
    /// Top y coordinate
    pub y: i32,
    /// Width
    pub w: i32,
    /// Height
    pub h: i32,
}

impl Box {
    /// Create a new box
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is negative.
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Result<Self> {
        if w < 0 || h < 0 {
            return Err(Error::InvalidParameter(format!(
                "box dimensions must be non-negative: w={}, h={}",
                w, h
            )));
        }
        Ok(Self { x, y, w, h })
    }

    /// Create a box without validation
    pub const fn new_unchecked(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Create a box from two corner points (second corner exclusive)
    pub fn from_corners(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        let (x, w) = if x1 <= x2 {
            (x1, x2 - x1)
        } else {
            (x2, x1 - x2)
        };
        let (y, h) = if y1 <= y2 {
            (y1, y2 - y1)
        } else {
            (y2, y1 - y2)
        };
        Self { x, y, w, h }
    }

    /// Get the right x coordinate (exclusive)
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Get the bottom y coordinate (exclusive)
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Get the area
    #[inline]
    pub fn area(&self) -> i64 {
        self.w as i64 * self.h as i64
    }

    /// Check if the box is empty (zero area)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Check if this box overlaps with another
    pub fn overlaps(&self, other: &Box) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Compute the intersection of two boxes
    pub fn intersect(&self, other: &Box) -> Option<Box> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Box {
                x,
                y,
                w: right - x,
                h: bottom - y,
            })
        } else {
            None
        }
    }

    /// Clip the box to an image of the given size.
    ///
    /// Returns `None` when nothing of the box lies inside the image.
    pub fn clip_to(&self, width: u32, height: u32) -> Option<Box> {
        self.intersect(&Box::new_unchecked(0, 0, width as i32, height as i32))
    }

    /// Translate the box by `(dx, dy)`
    pub fn translated(&self, dx: i32, dy: i32) -> Box {
        Box {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Grow the box by `by` pixels on every side
    pub fn expanded(&self, by: i32) -> Box {
        Box {
            x: self.x - by,
            y: self.y - by,
            w: self.w + 2 * by,
            h: self.h + 2 * by,
        }
    }

    /// Check whether the box lies closer than `margin` pixels to any edge
    /// of a `width` x `height` image.
    ///
    /// With `margin == 0` nothing is near the border.
    pub fn near_border(&self, width: u32, height: u32, margin: u32) -> bool {
        let m = margin as i32;
        self.x < m
            || self.y < m
            || self.right() > width as i32 - m
            || self.bottom() > height as i32 - m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_new_rejects_negative() {
        assert!(Box::new(0, 0, -1, 5).is_err());
        assert!(Box::new(0, 0, 3, 5).is_ok());
    }

    #[test]
    fn test_box_intersect() {
        let a = Box::new_unchecked(0, 0, 10, 10);
        let b = Box::new_unchecked(5, 5, 10, 10);
        assert_eq!(a.intersect(&b), Some(Box::new_unchecked(5, 5, 5, 5)));

        let c = Box::new_unchecked(20, 20, 2, 2);
        assert_eq!(a.intersect(&c), None);
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_box_clip_to() {
        let b = Box::new_unchecked(-3, 8, 10, 10);
        assert_eq!(b.clip_to(12, 12), Some(Box::new_unchecked(0, 8, 7, 4)));
        assert_eq!(Box::new_unchecked(20, 0, 2, 2).clip_to(12, 12), None);
    }

    #[test]
    fn test_box_near_border() {
        let b = Box::new_unchecked(0, 40, 10, 10);
        assert!(b.near_border(100, 100, 5));
        assert!(!b.near_border(100, 100, 0));

        let inner = Box::new_unchecked(5, 5, 90, 90);
        assert!(!inner.near_border(100, 100, 5));
        assert!(inner.near_border(100, 100, 6));
    }
}

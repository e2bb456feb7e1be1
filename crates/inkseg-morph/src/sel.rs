//! Structuring Element (SEL) for morphological operations
//!
//! A structuring element defines the neighborhood used in morphological
//! operations. Only hit positions matter for the binary operations here,
//! so a SEL is a grid of booleans with an origin.

use crate::{MorphError, MorphResult};

/// Structuring Element (SEL)
///
/// The origin (cx, cy) is the reference point for the operation.
#[derive(Debug, Clone)]
pub struct Sel {
    width: u32,
    height: u32,
    cx: u32,
    cy: u32,
    hits: Vec<bool>,
}

/// A horizontal run of hits in one SEL row, relative to the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SelRun {
    pub dy: i32,
    pub dx_min: i32,
    pub dx_max: i32,
}

impl Sel {
    fn filled(width: u32, height: u32, hit: impl Fn(i32, i32) -> bool) -> MorphResult<Self> {
        if width == 0 || height == 0 {
            return Err(MorphError::InvalidSel(format!(
                "zero-sized sel {width}x{height}"
            )));
        }
        let (cx, cy) = (width / 2, height / 2);
        let mut hits = Vec::with_capacity((width * height) as usize);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                hits.push(hit(x - cx as i32, y - cy as i32));
            }
        }
        Ok(Self {
            width,
            height,
            cx,
            cy,
            hits,
        })
    }

    /// Create a rectangular "brick" structuring element with all hits,
    /// origin at the center.
    pub fn create_brick(width: u32, height: u32) -> MorphResult<Self> {
        Self::filled(width, height, |_, _| true)
    }

    /// Create a square structuring element with all hits
    pub fn create_square(size: u32) -> MorphResult<Self> {
        Self::create_brick(size, size)
    }

    /// Create a disk of the given radius: every offset with
    /// `dx² + dy² <= radius²`. Radius 0 is the single-pixel identity SEL.
    pub fn create_disk(radius: u32) -> MorphResult<Self> {
        let size = 2 * radius + 1;
        let r2 = (radius * radius) as i32;
        Self::filled(size, size, |dx, dy| dx * dx + dy * dy <= r2)
    }

    /// Get the width
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the origin x coordinate
    #[inline]
    pub fn origin_x(&self) -> u32 {
        self.cx
    }

    /// Get the origin y coordinate
    #[inline]
    pub fn origin_y(&self) -> u32 {
        self.cy
    }

    /// Check whether (x, y) is a hit.
    #[inline]
    pub fn is_hit(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.hits[(y * self.width + x) as usize]
    }

    /// Count the number of hit elements
    pub fn hit_count(&self) -> usize {
        self.hits.iter().filter(|&&h| h).count()
    }

    /// Iterate over hit positions relative to origin
    pub fn hit_offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let cx = self.cx as i32;
        let cy = self.cy as i32;
        let width = self.width;

        self.hits.iter().enumerate().filter_map(move |(idx, &hit)| {
            hit.then(|| {
                let x = (idx as u32 % width) as i32;
                let y = (idx as u32 / width) as i32;
                (x - cx, y - cy)
            })
        })
    }

    /// Decompose the hits into maximal horizontal runs.
    pub(crate) fn runs(&self) -> Vec<SelRun> {
        let cx = self.cx as i32;
        let cy = self.cy as i32;
        let mut runs = Vec::new();
        for y in 0..self.height {
            let mut x = 0;
            while x < self.width {
                if !self.is_hit(x, y) {
                    x += 1;
                    continue;
                }
                let start = x;
                while x < self.width && self.is_hit(x, y) {
                    x += 1;
                }
                runs.push(SelRun {
                    dy: y as i32 - cy,
                    dx_min: start as i32 - cx,
                    dx_max: x as i32 - 1 - cx,
                });
            }
        }
        runs
    }
}

//! Nozzle masking
//!
//! Nozzle detection lives outside this crate. The pipeline only needs a
//! way to blank (or isolate) nozzle pixels in a mask that covers a crop
//! of the camera frame, which [`NozzleMasker`] abstracts.

use crate::SegmentResult;
use crate::error::invalid;
use inkseg_core::{Box, Mask};

/// Region of interest in frame coordinates: `[x0, xf) x [y0, yf)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x0: u32,
    pub y0: u32,
    pub xf: u32,
    pub yf: u32,
}

impl CropRect {
    /// # Errors
    ///
    /// Returns [`SegmentError::InvalidInput`](crate::SegmentError) for an
    /// empty rectangle.
    pub fn new(x0: u32, y0: u32, xf: u32, yf: u32) -> SegmentResult<Self> {
        if xf <= x0 || yf <= y0 {
            return Err(invalid(format!(
                "empty crop rectangle ({x0}, {y0})..({xf}, {yf})"
            )));
        }
        Ok(Self { x0, y0, xf, yf })
    }

    /// Crop covering a whole `width x height` frame.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x0: 0,
            y0: 0,
            xf: width,
            yf: height,
        }
    }

    pub fn width(&self) -> u32 {
        self.xf.saturating_sub(self.x0)
    }

    pub fn height(&self) -> u32 {
        self.yf.saturating_sub(self.y0)
    }

    /// Map a frame-coordinate box into the crop.
    pub fn to_crop(&self, frame_box: &Box) -> Box {
        frame_box.translated(-(self.x0 as i32), -(self.y0 as i32))
    }
}

/// What [`NozzleMasker::mask_nozzle`] returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NozzleMode {
    /// The input with nozzle pixels cleared
    #[default]
    Exclude,
    /// Only the input's nozzle pixels
    Only,
}

/// Source of nozzle geometry
pub trait NozzleMasker: Send + Sync {
    /// Apply the nozzle to `mask`, which covers `crop` of the frame.
    fn mask_nozzle(&self, mask: &Mask, crop: &CropRect, mode: NozzleMode) -> SegmentResult<Mask>;
}

/// A nozzle modelled as an axis-aligned rectangle in frame coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct RectNozzle {
    /// Nozzle body in frame coordinates
    pub rect: Box,
    /// Pixels added on every side
    pub dilate: u32,
    /// Restrict the nozzle to its lowest rows
    pub bottom_rows: Option<u32>,
}

impl RectNozzle {
    pub fn new(rect: Box) -> Self {
        Self {
            rect,
            dilate: 0,
            bottom_rows: None,
        }
    }

    pub fn with_dilate(mut self, pixels: u32) -> Self {
        self.dilate = pixels;
        self
    }

    pub fn with_bottom_only(mut self, rows: u32) -> Self {
        self.bottom_rows = Some(rows);
        self
    }

    /// Nozzle footprint inside the crop, before clipping.
    pub fn footprint(&self, crop: &CropRect) -> Box {
        let body = crop.to_crop(&self.rect.expanded(self.dilate as i32));
        match self.bottom_rows {
            Some(rows) if (rows as i32) < body.h => Box::new_unchecked(
                body.x,
                body.bottom() - rows as i32,
                body.w,
                rows as i32,
            ),
            _ => body,
        }
    }
}

impl NozzleMasker for RectNozzle {
    fn mask_nozzle(&self, mask: &Mask, crop: &CropRect, mode: NozzleMode) -> SegmentResult<Mask> {
        let footprint = self.footprint(crop);
        match mode {
            NozzleMode::Exclude => {
                let mut out = mask.clone();
                out.fill_rect(&footprint, false);
                Ok(out)
            }
            NozzleMode::Only => {
                let mut region = Mask::new(mask.width(), mask.height())?;
                region.fill_rect(&footprint, true);
                Ok(mask.and(&region)?)
            }
        }
    }
}

//! Channel conversions
//!
//! - RGB to gray (luma)
//! - Single channel extraction
//! - Saturating channel difference

use super::{Channels, Pix, PixData};
use crate::error::{Error, Result};
use std::sync::Arc;

/// Color channel selector for RGB images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RgbComponent {
    Red = 0,
    Green = 1,
    Blue = 2,
}

impl Pix {
    /// Convert to a gray image.
    ///
    /// Gray input is returned as a cheap clone. RGB input uses the
    /// integer luma weights 0.299 / 0.587 / 0.114.
    pub fn to_gray(&self) -> Pix {
        if self.is_gray() {
            return self.clone();
        }
        let data: Vec<u8> = self
            .data()
            .chunks_exact(3)
            .map(|p| {
                let l = 19595 * p[0] as u32 + 38470 * p[1] as u32 + 7471 * p[2] as u32;
                ((l + 32768) >> 16) as u8
            })
            .collect();
        Pix {
            inner: Arc::new(PixData {
                width: self.width(),
                height: self.height(),
                channels: Channels::Gray,
                data,
            }),
        }
    }

    /// Extract one channel of an RGB image as a gray image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedChannels`] for a gray image.
    pub fn channel(&self, component: RgbComponent) -> Result<Pix> {
        if self.is_gray() {
            return Err(Error::UnsupportedChannels(
                "channel extraction requires an RGB image",
            ));
        }
        let c = component as usize;
        let data: Vec<u8> = self.data().chunks_exact(3).map(|p| p[c]).collect();
        Pix::from_raw(self.width(), self.height(), Channels::Gray, data)
    }

    /// Saturating difference `a - b` of two channels of an RGB image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedChannels`] for a gray image.
    pub fn channel_difference(&self, a: RgbComponent, b: RgbComponent) -> Result<Pix> {
        if self.is_gray() {
            return Err(Error::UnsupportedChannels(
                "channel difference requires an RGB image",
            ));
        }
        let (ia, ib) = (a as usize, b as usize);
        let data: Vec<u8> = self
            .data()
            .chunks_exact(3)
            .map(|p| p[ia].saturating_sub(p[ib]))
            .collect();
        Pix::from_raw(self.width(), self.height(), Channels::Gray, data)
    }
}

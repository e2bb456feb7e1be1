//! PIX - The source image container
//!
//! `Pix` holds the raw gray or color capture that is being segmented.
//! The segmentation engine never mutates a `Pix`; every derived buffer
//! (gray conversion, blurred copy, masks) is a new allocation.
//!
//! # Pixel layout
//!
//! - One byte per sample, 8-bit depth
//! - Rows are stored contiguously without padding
//! - Color images are interleaved RGB
//!
//! # Ownership model
//!
//! `Pix` uses `Arc` for efficient cloning (shared ownership).
//! To modify pixel data, convert to `PixMut` via [`Pix::try_into_mut`]
//! or [`Pix::to_mut`], then convert back with `Into<Pix>`.

mod access;
pub mod convert;
pub mod statistics;

use crate::error::{Error, Result};
use std::sync::Arc;

/// Samples per pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Channels {
    /// Single-channel gray image
    Gray = 1,
    /// Interleaved red, green, blue
    Rgb = 3,
}

impl Channels {
    /// Create `Channels` from a raw sample count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChannels`] if `count` is not 1 or 3.
    pub fn from_count(count: u32) -> Result<Self> {
        match count {
            1 => Ok(Channels::Gray),
            3 => Ok(Channels::Rgb),
            _ => Err(Error::InvalidChannels(count)),
        }
    }

    /// Get the number of samples per pixel
    #[inline]
    pub fn count(self) -> u32 {
        self as u32
    }
}

/// Internal PIX data
#[derive(Debug)]
struct PixData {
    width: u32,
    height: u32,
    channels: Channels,
    data: Vec<u8>,
}

impl PixData {
    fn zeroed(width: u32, height: u32, channels: Channels) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let len = width as usize * height as usize * channels.count() as usize;
        Ok(Self {
            width,
            height,
            channels,
            data: vec![0u8; len],
        })
    }
}

/// PIX - Immutable image container
///
/// # Examples
///
/// ```
/// use inkseg_core::{Channels, Pix};
///
/// let pix = Pix::new(640, 480, Channels::Gray).unwrap();
/// assert_eq!(pix.width(), 640);
/// assert_eq!(pix.height(), 480);
/// ```
#[derive(Debug, Clone)]
pub struct Pix {
    inner: Arc<PixData>,
}

impl Pix {
    /// Create a new zero-filled PIX.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32, channels: Channels) -> Result<Self> {
        Ok(Pix {
            inner: Arc::new(PixData::zeroed(width, height, channels)?),
        })
    }

    /// Wrap an existing sample buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] for a zero-area image and
    /// [`Error::BufferLength`] if `data` does not hold exactly
    /// `width * height * channels` samples.
    pub fn from_raw(width: u32, height: u32, channels: Channels, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected = width as usize * height as usize * channels.count() as usize;
        if data.len() != expected {
            return Err(Error::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Pix {
            inner: Arc::new(PixData {
                width,
                height,
                channels,
                data,
            }),
        })
    }

    /// Build a gray image by evaluating `f(x, y)` for every pixel.
    pub fn from_gray_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> u8,
    ) -> Result<Self> {
        let mut inner = PixData::zeroed(width, height, Channels::Gray)?;
        for y in 0..height {
            for x in 0..width {
                inner.data[(y * width + x) as usize] = f(x, y);
            }
        }
        Ok(Pix {
            inner: Arc::new(inner),
        })
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the channel layout.
    #[inline]
    pub fn channels(&self) -> Channels {
        self.inner.channels
    }

    /// Check whether this is a single-channel image.
    #[inline]
    pub fn is_gray(&self) -> bool {
        self.inner.channels == Channels::Gray
    }

    /// Get the raw sample data.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Get the samples of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row_data(&self, y: u32) -> &[u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &self.inner.data[start..start + stride]
    }

    /// Number of samples per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.inner.width as usize * self.inner.channels.count() as usize
    }

    /// Get the reference count of the shared data.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Check if two images have the same width and height.
    pub fn sizes_equal(&self, other: &Pix) -> bool {
        self.inner.width == other.inner.width && self.inner.height == other.inner.height
    }

    /// Try to get mutable access to the image data.
    ///
    /// Succeeds only if there is exactly one reference to the data.
    pub fn try_into_mut(self) -> std::result::Result<PixMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(PixMut { inner: data }),
            Err(arc) => Err(Pix { inner: arc }),
        }
    }

    /// Create a mutable copy of this PIX.
    pub fn to_mut(&self) -> PixMut {
        PixMut {
            inner: PixData {
                width: self.inner.width,
                height: self.inner.height,
                channels: self.inner.channels,
                data: self.inner.data.clone(),
            },
        }
    }
}

/// Mutable PIX
///
/// Allows modification of image data. Convert back to an immutable
/// [`Pix`] using `Into<Pix>`.
#[derive(Debug)]
pub struct PixMut {
    inner: PixData,
}

impl PixMut {
    /// Get the image width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the channel layout.
    #[inline]
    pub fn channels(&self) -> Channels {
        self.inner.channels
    }

    /// Get the raw sample data.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Get mutable access to the raw sample data.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.inner.data
    }
}

impl From<PixMut> for Pix {
    fn from(pix: PixMut) -> Self {
        Pix {
            inner: Arc::new(pix.inner),
        }
    }
}

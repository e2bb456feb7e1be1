//! Pixel access functions
//!
//! Gray accessors address the single sample of a gray image; RGB
//! accessors address the interleaved triple of a color image. Asking a
//! gray image for RGB (or the reverse) yields `None` / an error rather
//! than a silent conversion.

use super::{Channels, Pix, PixMut};
use crate::error::{Error, Result};

impl Pix {
    /// Get a gray value at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds or the image is
    /// not gray.
    pub fn get_gray(&self, x: u32, y: u32) -> Option<u8> {
        if !self.is_gray() || x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.data()[(y * self.width() + x) as usize])
    }

    /// Get RGB values at (x, y).
    ///
    /// Only valid for color images.
    pub fn get_rgb(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if self.channels() != Channels::Rgb || x >= self.width() || y >= self.height() {
            return None;
        }
        let i = 3 * (y * self.width() + x) as usize;
        let d = self.data();
        Some((d[i], d[i + 1], d[i + 2]))
    }
}

impl PixMut {
    /// Set a gray value at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates are out of bounds
    /// and [`Error::UnsupportedChannels`] for a color image.
    pub fn set_gray(&mut self, x: u32, y: u32, val: u8) -> Result<()> {
        if self.channels() != Channels::Gray {
            return Err(Error::UnsupportedChannels("set_gray requires a gray image"));
        }
        let idx = self.index(x, y)?;
        self.data_mut()[idx] = val;
        Ok(())
    }

    /// Set RGB values at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates are out of bounds
    /// and [`Error::UnsupportedChannels`] for a gray image.
    pub fn set_rgb(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) -> Result<()> {
        if self.channels() != Channels::Rgb {
            return Err(Error::UnsupportedChannels("set_rgb requires an RGB image"));
        }
        let i = 3 * self.index(x, y)?;
        let d = self.data_mut();
        d[i] = r;
        d[i + 1] = g;
        d[i + 2] = b;
        Ok(())
    }

    fn index(&self, x: u32, y: u32) -> Result<usize> {
        if x >= self.width() {
            return Err(Error::IndexOutOfBounds {
                index: x as usize,
                len: self.width() as usize,
            });
        }
        if y >= self.height() {
            return Err(Error::IndexOutOfBounds {
                index: y as usize,
                len: self.height() as usize,
            });
        }
        Ok((y * self.width() + x) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_access() {
        let mut pm = Pix::new(4, 3, Channels::Gray).unwrap().to_mut();
        pm.set_gray(3, 2, 77).unwrap();
        assert!(pm.set_gray(4, 0, 1).is_err());
        assert!(pm.set_rgb(0, 0, 1, 2, 3).is_err());

        let pix: Pix = pm.into();
        assert_eq!(pix.get_gray(3, 2), Some(77));
        assert_eq!(pix.get_gray(4, 2), None);
        assert_eq!(pix.get_rgb(3, 2), None);
    }

    #[test]
    fn test_rgb_access() {
        let mut pm = Pix::new(2, 2, Channels::Rgb).unwrap().to_mut();
        pm.set_rgb(1, 1, 10, 20, 30).unwrap();
        let pix: Pix = pm.into();
        assert_eq!(pix.get_rgb(1, 1), Some((10, 20, 30)));
        assert_eq!(pix.get_gray(1, 1), None);
    }
}

//! inkseg-io - Image file access for callers of the segmentation engine
//!
//! The engine itself never touches the file system. This crate is the
//! caller-side convenience layer: decode a capture into a [`Pix`],
//! and write masks or images back out for inspection. Decoding and
//! encoding are delegated to the `image` crate, so every format it
//! supports (PNG, JPEG, TIFF, BMP, ...) is available.

mod error;

pub use error::{IoError, IoResult};

use image::{DynamicImage, GrayImage, RgbImage};
use inkseg_core::{Channels, Mask, Pix};
use std::path::Path;

/// Read an image file.
///
/// Gray (and gray+alpha) files become single-channel images; every
/// other color type is converted to interleaved RGB.
///
/// # Errors
///
/// Returns [`IoError::Codec`] if the file cannot be decoded.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Pix> {
    let img = image::open(path.as_ref())?;
    pix_from_dynamic(&img)
}

/// Convert a decoded image into a [`Pix`].
///
/// # Errors
///
/// Returns [`IoError::Core`] for a zero-area image.
pub fn pix_from_dynamic(img: &DynamicImage) -> IoResult<Pix> {
    if img.color().has_color() {
        pix_from_rgb(&img.to_rgb8())
    } else {
        pix_from_gray(&img.to_luma8())
    }
}

/// Convert an 8-bit gray buffer into a gray [`Pix`].
///
/// # Errors
///
/// Returns [`IoError::Core`] for a zero-area image.
pub fn pix_from_gray(img: &GrayImage) -> IoResult<Pix> {
    Ok(Pix::from_raw(
        img.width(),
        img.height(),
        Channels::Gray,
        img.as_raw().clone(),
    )?)
}

/// Convert an 8-bit RGB buffer into an RGB [`Pix`].
///
/// # Errors
///
/// Returns [`IoError::Core`] for a zero-area image.
pub fn pix_from_rgb(img: &RgbImage) -> IoResult<Pix> {
    Ok(Pix::from_raw(
        img.width(),
        img.height(),
        Channels::Rgb,
        img.as_raw().clone(),
    )?)
}

/// Convert a [`Pix`] into a decoded `image` buffer.
///
/// # Errors
///
/// Returns [`IoError::InvalidData`] if the sample buffer does not
/// match the image geometry.
pub fn pix_to_dynamic(pix: &Pix) -> IoResult<DynamicImage> {
    let (w, h) = (pix.width(), pix.height());
    let data = pix.data().to_vec();
    let img = match pix.channels() {
        Channels::Gray => GrayImage::from_raw(w, h, data).map(DynamicImage::ImageLuma8),
        Channels::Rgb => RgbImage::from_raw(w, h, data).map(DynamicImage::ImageRgb8),
    };
    img.ok_or_else(|| IoError::InvalidData(format!("buffer does not fit {w}x{h}")))
}

/// Convert a mask into an 8-bit gray buffer (0 / 255).
///
/// # Errors
///
/// Returns [`IoError::InvalidData`] if the mask buffer does not match
/// its geometry.
pub fn mask_to_gray(mask: &Mask) -> IoResult<GrayImage> {
    GrayImage::from_raw(mask.width(), mask.height(), mask.data().to_vec()).ok_or_else(|| {
        IoError::InvalidData(format!(
            "mask buffer does not fit {}x{}",
            mask.width(),
            mask.height()
        ))
    })
}

/// Write a [`Pix`]; the format follows the file extension.
///
/// # Errors
///
/// Returns [`IoError::Codec`] if encoding fails.
pub fn write_pix<P: AsRef<Path>>(pix: &Pix, path: P) -> IoResult<()> {
    pix_to_dynamic(pix)?.save(path.as_ref())?;
    Ok(())
}

/// Write a mask as an 8-bit gray image; the format follows the file
/// extension. Use a lossless format so the mask reads back exactly.
///
/// # Errors
///
/// Returns [`IoError::Codec`] if encoding fails.
pub fn write_mask<P: AsRef<Path>>(mask: &Mask, path: P) -> IoResult<()> {
    mask_to_gray(mask)?.save(path.as_ref())?;
    Ok(())
}

/// Read a mask written by [`write_mask`] (any nonzero sample is foreground).
///
/// # Errors
///
/// Returns [`IoError::Codec`] if the file cannot be decoded.
pub fn read_mask<P: AsRef<Path>>(path: P) -> IoResult<Mask> {
    let gray = image::open(path.as_ref())?.to_luma8();
    let (w, h) = gray.dimensions();
    Ok(Mask::from_nonzero(w, h, gray.into_raw())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_roundtrip_in_memory() {
        let pix = Pix::from_gray_fn(4, 3, |x, y| (x * 10 + y) as u8).unwrap();
        let dynamic = pix_to_dynamic(&pix).unwrap();
        let back = pix_from_dynamic(&dynamic).unwrap();
        assert!(back.is_gray());
        assert_eq!(back.data(), pix.data());
    }

    #[test]
    fn test_rgb_stays_rgb() {
        let pix = Pix::from_raw(1, 2, Channels::Rgb, vec![10, 20, 30, 40, 50, 60]).unwrap();
        let back = pix_from_dynamic(&pix_to_dynamic(&pix).unwrap()).unwrap();
        assert_eq!(back.channels(), Channels::Rgb);
        assert_eq!(back.get_rgb(0, 1), Some((40, 50, 60)));
    }

    #[test]
    fn test_mask_to_gray() {
        let mask = Mask::from_fn(3, 3, |x, y| x == y).unwrap();
        let gray = mask_to_gray(&mask).unwrap();
        assert_eq!(gray.get_pixel(1, 1).0[0], 255);
        assert_eq!(gray.get_pixel(0, 1).0[0], 0);
    }

    #[test]
    fn test_write_and_read_files() {
        let dir = std::env::temp_dir();
        let pix_path = dir.join(format!("inkseg_io_pix_{}.png", std::process::id()));
        let pix = Pix::from_gray_fn(5, 4, |x, y| (x * 40 + y) as u8).unwrap();
        write_pix(&pix, &pix_path).unwrap();
        let back = read_image(&pix_path).unwrap();
        assert!(back.is_gray());
        assert_eq!(back.data(), pix.data());

        let mask_path = dir.join(format!("inkseg_io_mask_{}.png", std::process::id()));
        let mask = Mask::from_fn(6, 6, |x, _| x % 2 == 0).unwrap();
        write_mask(&mask, &mask_path).unwrap();
        assert_eq!(read_mask(&mask_path).unwrap(), mask);

        let _ = std::fs::remove_file(pix_path);
        let _ = std::fs::remove_file(mask_path);
    }
}

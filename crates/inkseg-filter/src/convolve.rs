//! Separable convolution
//!
//! Border handling replicates the nearest edge pixel. The output is an
//! [`FPix`] so that callers comparing against the smoothed value (the
//! adaptive threshold) see the unrounded result.

use crate::error::{check_grayscale, check_odd_window};
use crate::{FilterError, FilterResult, Kernel};
use inkseg_core::{FPix, Pix};

/// Convolve a gray image with a horizontal then a vertical 1-D kernel.
///
/// `kernel_x` must be a single row and `kernel_y` is read as a column
/// (its values are taken in order, whatever its stored shape).
///
/// # Errors
///
/// Returns [`FilterError::InvalidKernel`] if `kernel_x` has more than
/// one row, or an error for color input.
pub fn convolve_sep(pix: &Pix, kernel_x: &Kernel, kernel_y: &Kernel) -> FilterResult<FPix> {
    check_grayscale(pix)?;
    if kernel_x.height() != 1 {
        return Err(FilterError::InvalidKernel(format!(
            "horizontal kernel must have one row, got {}",
            kernel_x.height()
        )));
    }

    let w = pix.width() as i32;
    let h = pix.height() as i32;
    let src = pix.data();

    let kx = kernel_x.data();
    let cx = kernel_x.center_x() as i32;
    let mut tmp = vec![0f32; src.len()];
    for y in 0..h {
        let row = &src[(y * w) as usize..((y + 1) * w) as usize];
        for x in 0..w {
            let mut sum = 0.0f32;
            for (i, &k) in kx.iter().enumerate() {
                let sx = (x + i as i32 - cx).clamp(0, w - 1);
                sum += row[sx as usize] as f32 * k;
            }
            tmp[(y * w + x) as usize] = sum;
        }
    }

    let ky = kernel_y.data();
    let cy = (ky.len() / 2) as i32;
    let mut out = FPix::new(pix.width(), pix.height())?;
    let data = out.data_mut();
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0.0f32;
            for (i, &k) in ky.iter().enumerate() {
                let sy = (y + i as i32 - cy).clamp(0, h - 1);
                sum += tmp[(sy * w + x) as usize] * k;
            }
            data[(y * w + x) as usize] = sum;
        }
    }

    Ok(out)
}

/// Standard deviation matched to a Gaussian window of odd `size`:
/// `0.3 * ((size - 1) / 2 - 1) + 0.8`.
pub fn gaussian_sigma_for_size(size: u32) -> f32 {
    0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Gaussian-weighted local mean over an odd `size x size` window.
///
/// # Errors
///
/// Returns an error for color input or an even window size.
pub fn gaussian_blur(pix: &Pix, size: u32) -> FilterResult<FPix> {
    check_odd_window(size)?;
    let kernel = Kernel::gaussian_1d(size, gaussian_sigma_for_size(size))?;
    convolve_sep(pix, &kernel, &kernel)
}

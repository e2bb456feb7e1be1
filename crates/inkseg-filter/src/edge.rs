//! Second-derivative edge response
//!
//! The Laplacian is evaluated with the 4-neighbor kernel and mirror
//! borders (`dcb|abcd|cba`, the edge pixel itself is not repeated), so
//! a flat image yields exactly zero everywhere.
//!
//! On a dark-ink-on-light-background image the response is strongly
//! negative on the bright side of a sharp light-to-dark step.

use crate::error::check_grayscale;
use crate::{FilterResult, Kernel};
use inkseg_core::{FPix, Pix};

fn reflect101(i: i32, n: i32) -> i32 {
    if n == 1 {
        return 0;
    }
    let mut i = i;
    if i < 0 {
        i = -i;
    }
    if i >= n {
        i = 2 * (n - 1) - i;
    }
    i
}

/// Apply the 3x3 Laplacian to a gray image.
///
/// # Errors
///
/// Returns an error for color input.
pub fn laplacian(pix: &Pix) -> FilterResult<FPix> {
    check_grayscale(pix)?;
    let kernel = Kernel::laplacian();
    let w = pix.width() as i32;
    let h = pix.height() as i32;
    let src = pix.data();
    let mut out = FPix::new(pix.width(), pix.height())?;
    let data = out.data_mut();

    let (kcx, kcy) = (kernel.center_x() as i32, kernel.center_y() as i32);
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0.0f32;
            for ky in 0..kernel.height() {
                for kx in 0..kernel.width() {
                    let k = kernel.get(kx, ky).unwrap_or(0.0);
                    if k == 0.0 {
                        continue;
                    }
                    let sx = reflect101(x + kx as i32 - kcx, w);
                    let sy = reflect101(y + ky as i32 - kcy, h);
                    sum += src[(sy * w + sx) as usize] as f32 * k;
                }
            }
            data[(y * w + x) as usize] = sum;
        }
    }
    Ok(out)
}

//! Filter regression test
//!
//! Exercises the neighborhood filters on a synthetic capture: a dark
//! ink bar on a light background with salt noise.

use inkseg_core::Pix;
use inkseg_filter::{IntegralImage, block_mean, gaussian_blur, laplacian, median_filter};
use inkseg_test::RegParams;

/// 40x30 light background, dark vertical bar at columns 15..25,
/// isolated bright specks inside the bar.
fn ink_bar() -> Pix {
    Pix::from_gray_fn(40, 30, |x, y| {
        if (15..25).contains(&x) {
            if (x + y) % 11 == 0 { 250 } else { 30 }
        } else {
            220
        }
    })
    .unwrap()
}

#[test]
fn filter_reg() {
    let mut rp = RegParams::new("filter");
    let pix = ink_bar();

    // --- Test 1: median removes isolated specks but keeps the bar ---
    let med = median_filter(&pix, 3).unwrap();
    let specks = (0..30)
        .flat_map(|y| (16..24).map(move |x| (x, y)))
        .filter(|&(x, y)| med.get_gray(x, y) != Some(30))
        .count();
    rp.compare_values(0.0, specks as f64, 0.0);
    rp.compare_values(220.0, med.get_gray(5, 5).unwrap() as f64, 0.0);

    // --- Test 2: block mean matches a direct integral query ---
    let acc = IntegralImage::new(&pix).unwrap();
    let mean = block_mean(&pix, 5).unwrap();
    let direct = acc.sum(8, 8, 13, 13) as f64 / 25.0;
    rp.compare_values(direct, mean.get(10, 10).unwrap() as f64, 1e-4);

    // --- Test 3: Gaussian mean stays within the input range ---
    let g = gaussian_blur(&pix, 11).unwrap();
    let in_range = g.data().iter().all(|&v| (30.0..=250.0).contains(&v));
    rp.check(in_range, "gaussian output within input range");

    // --- Test 4: Laplacian is negative on the bright side of each bar edge ---
    let lap = laplacian(&med).unwrap();
    rp.check(lap.get(14, 14).unwrap() < -20.0, "left edge, background side");
    rp.check(lap.get(25, 14).unwrap() < -20.0, "right edge, background side");
    rp.check(lap.get(15, 14).unwrap() > 20.0, "left edge, ink side");
    rp.compare_values(0.0, lap.get(5, 10).unwrap() as f64, 0.0);

    assert!(rp.cleanup(), "filter regression test failed");
}

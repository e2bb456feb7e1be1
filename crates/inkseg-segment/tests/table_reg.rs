//! Component table regression test
//!
//! Covers the table lifecycle on synthetic masks: construction floor,
//! mask round trip, erase monotonicity, main-component protection,
//! border erasers and relabeling idempotence.

use inkseg_core::Mask;
use inkseg_segment::{ComponentTable, TableOptions, TrustLargest};
use inkseg_test::RegParams;

/// 100x100 with a 10x10 and a 50x50 square.
fn two_squares() -> Mask {
    Mask::from_fn(100, 100, |x, y| {
        let small = (5..15).contains(&x) && (5..15).contains(&y);
        let big = (40..90).contains(&x) && (30..80).contains(&y);
        small || big
    })
    .unwrap()
}

/// 100x100 scatter: interior block, left-edge bar, top speck, satellite.
fn scatter() -> Mask {
    Mask::from_fn(100, 100, |x, y| {
        let block = (30..70).contains(&x) && (30..70).contains(&y);
        let bar = x < 4 && (40..60).contains(&y);
        let speck = (80..83).contains(&x) && y < 3;
        let satellite = (80..86).contains(&x) && (80..86).contains(&y);
        block || bar || speck || satellite
    })
    .unwrap()
}

fn unfiltered() -> TableOptions {
    TableOptions::default().with_min_area(0)
}

#[test]
fn table_reg() {
    let mut rp = RegParams::new("table");

    // --- Test 1: all-zero mask ---
    let blank = Mask::new(100, 100).unwrap();
    let mut empty = ComponentTable::from_mask(&blank, unfiltered()).unwrap();
    rp.check(!empty.success(), "empty mask has no components");
    rp.compare_values(0.0, empty.len() as f64, 0.0);
    empty.erase_border(5, true);
    empty.erase_smallest_relative(0.5, true);
    empty.remove_rough_objects(true);
    rp.check(empty.main_component().is_none(), "no main component on empty table");
    rp.check(empty.labels_bw().is_all_clear(), "empty table stays empty");

    // --- Test 2: two squares, area floor 50 ---
    let mut t = ComponentTable::from_mask(&two_squares(), unfiltered()).unwrap();
    rp.compare_values(2.0, t.len() as f64, 0.0);
    t.erase_small(50 * 50, true);
    rp.compare_values(1.0, t.len() as f64, 0.0);
    rp.compare_values(2500.0, t.records()[0].area as f64, 0.0);
    let floored =
        ComponentTable::from_mask(&two_squares(), TableOptions::default().with_min_area(2500))
            .unwrap();
    rp.compare_values(1.0, floored.len() as f64, 0.0);

    // --- Test 3: mask round trip ---
    let t = ComponentTable::from_mask(&scatter(), unfiltered()).unwrap();
    let mut union = Mask::new(100, 100).unwrap();
    for r in t.records() {
        union.or_assign(&t.single_mask(r.id)).unwrap();
    }
    rp.compare_masks(t.labels_bw(), &union);
    let ids: Vec<u32> = t.records().iter().map(|r| r.id).collect();
    rp.compare_masks(t.labels_bw(), &t.reconstruct_mask(&ids));
    rp.write_mask_and_check(t.labels_bw()).unwrap();

    // --- Test 4: erase monotonicity ---
    let mut keep_all = t.clone();
    keep_all.select(|_| true, true);
    rp.compare_masks(t.labels_bw(), keep_all.labels_bw());
    let mut wipe = t.clone();
    wipe.select(|_| false, false);
    rp.check(!wipe.success(), "always-false without checks empties the table");
    let mut protected = t.clone();
    protected.select(|_| false, true);
    rp.compare_values(1.0, protected.len() as f64, 0.0);
    rp.compare_values(1600.0, protected.records()[0].area as f64, 0.0);
    rp.check(
        protected.trust_largest() == TrustLargest::Trusted,
        "interior block trusted",
    );

    // --- Test 5: border margins ---
    let mut margin0 = t.clone();
    margin0.erase_border(0, false);
    rp.compare_values(t.len() as f64, margin0.len() as f64, 0.0);
    let mut margin5 = t.clone();
    margin5.erase_border(5, false);
    rp.compare_values(2.0, margin5.len() as f64, 0.0);
    rp.check(
        margin5.records().iter().all(|r| !margin5.touches_border(r, 5)),
        "no survivor near the border",
    );

    let mut top = t.clone();
    top.erase_top_border(0, false);
    rp.compare_values(3.0, top.len() as f64, 0.0);
    let mut sides = t.clone();
    sides.erase_left_right_border(0, false);
    rp.compare_values(3.0, sides.len() as f64, 0.0);
    let mut relative = t.clone();
    relative.erase_smallest_relative(0.05, false);
    rp.compare_values(2.0, relative.len() as f64, 0.0);

    // --- Test 6: relabeling is idempotent ---
    let again = ComponentTable::from_mask(t.labels_bw(), unfiltered()).unwrap();
    let shape = |t: &ComponentTable| -> Vec<_> {
        t.records().iter().map(|r| (r.bbox, r.area)).collect()
    };
    rp.check(shape(&t) == shape(&again), "relabel keeps boxes and areas");

    // --- Test 7: main component cut by the border ---
    let edge = Mask::from_fn(100, 100, |x, y| x < 8 && (10..90).contains(&y)).unwrap();
    let mut cut = ComponentTable::from_mask(&edge, unfiltered()).unwrap();
    rp.check(cut.main_component() == Some(1), "truncated line is trusted");
    let speck = Mask::from_fn(100, 100, |x, y| x < 3 && y < 3).unwrap();
    let mut speck = ComponentTable::from_mask(&speck, unfiltered()).unwrap();
    rp.check(speck.main_component().is_none(), "corner speck distrusted");
    speck.select(|_| false, true);
    rp.check(!speck.success(), "distrusted largest is not protected");

    assert!(rp.cleanup(), "table regression test failed");
}

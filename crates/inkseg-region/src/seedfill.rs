//! Seed fill operations
//!
//! Flood fill, hole filling and border clearing on masks. A hole is a
//! background region that cannot reach the image border; background
//! regions are traced with the connectivity complementary to the
//! foreground's so that diagonal gaps do not leak.

use crate::conncomp::{ConnectedComponent, ConnectivityType, label_connected_components};
use crate::error::{RegionError, RegionResult};
use inkseg_core::{Box, LabelMap, Mask};
use std::collections::VecDeque;

/// Flood fill a mask in place starting from a seed point
///
/// Every pixel connected to the seed with the seed's value is set to
/// `on`. Returns the number of pixels that changed.
///
/// # Errors
///
/// Returns [`RegionError::InvalidSeed`] if the seed is out of bounds.
pub fn floodfill(
    mask: &mut Mask,
    seed_x: u32,
    seed_y: u32,
    on: bool,
    connectivity: ConnectivityType,
) -> RegionResult<u64> {
    let (w, h) = (mask.width(), mask.height());
    if seed_x >= w || seed_y >= h {
        return Err(RegionError::InvalidSeed {
            x: seed_x,
            y: seed_y,
        });
    }
    let old = mask.get(seed_x, seed_y);
    if old == on {
        return Ok(0);
    }

    let mut filled = 0u64;
    let mut queue = VecDeque::new();
    mask.set(seed_x, seed_y, on);
    queue.push_back((seed_x as i32, seed_y as i32));
    while let Some((x, y)) = queue.pop_front() {
        filled += 1;
        for &(dx, dy) in connectivity.offsets() {
            let (nx, ny) = (x + dx, y + dy);
            if nx < 0 || ny < 0 || nx >= w as i32 || ny >= h as i32 {
                continue;
            }
            if mask.get(nx as u32, ny as u32) == old {
                mask.set(nx as u32, ny as u32, on);
                queue.push_back((nx, ny));
            }
        }
    }
    Ok(filled)
}

fn touches_edge(bounds: &Box, width: u32, height: u32) -> bool {
    bounds.x == 0 || bounds.y == 0 || bounds.right() == width as i32 || bounds.bottom() == height as i32
}

/// Label the holes of a mask
///
/// Returns the background label map (traced with the complementary
/// connectivity) and the background components that do not touch the
/// image border.
pub fn find_holes(
    mask: &Mask,
    connectivity: ConnectivityType,
) -> RegionResult<(LabelMap, Vec<ConnectedComponent>)> {
    let (labels, comps) = label_connected_components(&mask.invert(), connectivity.complement())?;
    let holes = comps
        .into_iter()
        .filter(|c| !touches_edge(&c.bounds, mask.width(), mask.height()))
        .collect();
    Ok((labels, holes))
}

/// Fill every hole of a mask
pub fn fill_holes(mask: &Mask, connectivity: ConnectivityType) -> RegionResult<Mask> {
    fill_holes_where(mask, connectivity, |_| true)
}

/// Fill the holes whose area is strictly below `max_area`
///
/// Larger enclosed hollows are left open.
pub fn fill_holes_below(
    mask: &Mask,
    max_area: u64,
    connectivity: ConnectivityType,
) -> RegionResult<Mask> {
    fill_holes_where(mask, connectivity, |hole| hole.pixel_count < max_area)
}

fn fill_holes_where(
    mask: &Mask,
    connectivity: ConnectivityType,
    fill: impl Fn(&ConnectedComponent) -> bool,
) -> RegionResult<Mask> {
    let (labels, holes) = find_holes(mask, connectivity)?;
    let mut chosen = vec![false; labels.max_label() as usize + 1];
    for hole in holes.iter().filter(|h| fill(h)) {
        chosen[hole.label as usize] = true;
    }
    let mut out = mask.clone();
    out.or_assign(&labels.mask_where(|l| chosen[l as usize]))?;
    Ok(out)
}

/// Remove every foreground component that touches the image border
pub fn clear_border(mask: &Mask, connectivity: ConnectivityType) -> RegionResult<Mask> {
    let (labels, comps) = label_connected_components(mask, connectivity)?;
    let mut keep = vec![false; comps.len() + 1];
    for c in &comps {
        keep[c.label as usize] = !touches_edge(&c.bounds, mask.width(), mask.height());
    }
    Ok(labels.mask_where(|l| keep[l as usize]))
}

/// Solid fill of one labeled component into `out`: the component plus
/// every pixel it encloses on its own, i.e. the region inside its outer
/// contour. Returns the number of pixels set.
///
/// Only the component's bounding box grown by one pixel is visited; the
/// frame of that box is outside by construction. `out` must have the
/// size of `labels`.
///
/// # Errors
///
/// Returns a core `DimensionMismatch` error if `out` and `labels` differ
/// in size.
pub fn fill_component_interior(
    labels: &LabelMap,
    component: &ConnectedComponent,
    connectivity: ConnectivityType,
    out: &mut Mask,
) -> RegionResult<u64> {
    if (out.width(), out.height()) != (labels.width(), labels.height()) {
        return Err(inkseg_core::Error::DimensionMismatch {
            expected: (labels.width(), labels.height()),
            actual: (out.width(), out.height()),
        }
        .into());
    }
    let frame = component.bounds.expanded(1);
    let (fw, fh) = (frame.w as u32, frame.h as u32);
    let inside = |x: u32, y: u32| {
        labels.get_signed(frame.x + x as i32, frame.y + y as i32) == component.label
    };

    // non-component pixels the frame cannot reach are enclosed
    let mut enclosed = Mask::from_fn(fw, fh, |x, y| !inside(x, y))?;
    floodfill(&mut enclosed, 0, 0, false, connectivity.complement())?;

    let (w, h) = (out.width() as i32, out.height() as i32);
    let mut set = 0u64;
    for y in 0..fh {
        for x in 0..fw {
            if inside(x, y) || enclosed.get(x, y) {
                let (gx, gy) = (frame.x + x as i32, frame.y + y as i32);
                if (0..w).contains(&gx) && (0..h).contains(&gy) {
                    out.set(gx as u32, gy as u32, true);
                    set += 1;
                }
            }
        }
    }
    Ok(set)
}

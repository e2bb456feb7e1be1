//! Connected component analysis
//!
//! Two-pass labeling with a union-find over provisional labels. Final
//! labels are contiguous (`1..=n`) and numbered in raster order of each
//! component's first pixel, so labeling is a pure function of the mask.

use crate::error::RegionResult;
use inkseg_core::{Box, LabelMap, Mask};

/// Connectivity type for component analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityType {
    /// 4-way connectivity (up, down, left, right)
    FourWay,
    /// 8-way connectivity (includes diagonals)
    #[default]
    EightWay,
}

impl ConnectivityType {
    /// The connectivity that background regions have when foreground
    /// uses `self`; pairing them avoids leaks through diagonal gaps.
    pub fn complement(self) -> Self {
        match self {
            Self::FourWay => Self::EightWay,
            Self::EightWay => Self::FourWay,
        }
    }

    /// Neighbor offsets.
    pub fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            Self::FourWay => &[(-1, 0), (1, 0), (0, -1), (0, 1)],
            Self::EightWay => &[
                (-1, -1),
                (0, -1),
                (1, -1),
                (-1, 0),
                (1, 0),
                (-1, 1),
                (0, 1),
                (1, 1),
            ],
        }
    }

    /// Offsets of the neighbors already visited in a raster scan.
    fn causal_offsets(self) -> &'static [(i32, i32)] {
        match self {
            Self::FourWay => &[(-1, 0), (0, -1)],
            Self::EightWay => &[(-1, 0), (-1, -1), (0, -1), (1, -1)],
        }
    }
}

/// A connected component in a mask
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectedComponent {
    /// Label of this component in the accompanying [`LabelMap`]
    pub label: u32,
    /// Number of pixels in this component
    pub pixel_count: u64,
    /// Bounding box of this component
    pub bounds: Box,
    /// Mean pixel position (x, y)
    pub centroid: (f64, f64),
}

/// Union-find over provisional labels.
struct DisjointSet {
    parent: Vec<u32>,
}

impl DisjointSet {
    fn new() -> Self {
        Self { parent: vec![0] }
    }

    fn make(&mut self) -> u32 {
        let id = self.parent.len() as u32;
        self.parent.push(id);
        id
    }

    fn find(&mut self, mut x: u32) -> u32 {
        while self.parent[x as usize] != x {
            let grand = self.parent[self.parent[x as usize] as usize];
            self.parent[x as usize] = grand;
            x = grand;
        }
        x
    }

    fn union(&mut self, a: u32, b: u32) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi as usize] = lo;
        }
    }
}

#[derive(Default)]
struct Accum {
    count: u64,
    sx: u64,
    sy: u64,
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl Accum {
    fn add(&mut self, x: u32, y: u32) {
        if self.count == 0 {
            (self.x0, self.y0, self.x1, self.y1) = (x, y, x, y);
        } else {
            self.x0 = self.x0.min(x);
            self.x1 = self.x1.max(x);
            self.y0 = self.y0.min(y);
            self.y1 = self.y1.max(y);
        }
        self.count += 1;
        self.sx += x as u64;
        self.sy += y as u64;
    }

    fn finish(&self, label: u32) -> ConnectedComponent {
        ConnectedComponent {
            label,
            pixel_count: self.count,
            bounds: Box::from_corners(
                self.x0 as i32,
                self.y0 as i32,
                self.x1 as i32 + 1,
                self.y1 as i32 + 1,
            ),
            centroid: (
                self.sx as f64 / self.count as f64,
                self.sy as f64 / self.count as f64,
            ),
        }
    }
}

/// Label all connected components of a mask
///
/// Returns the label map and one [`ConnectedComponent`] per label,
/// ordered by label.
pub fn label_connected_components(
    mask: &Mask,
    connectivity: ConnectivityType,
) -> RegionResult<(LabelMap, Vec<ConnectedComponent>)> {
    let (w, h) = (mask.width(), mask.height());
    let mut labels = LabelMap::new(w, h)?;
    let mut sets = DisjointSet::new();

    for y in 0..h {
        for x in 0..w {
            if !mask.get(x, y) {
                continue;
            }
            let mut assigned = 0u32;
            for &(dx, dy) in connectivity.causal_offsets() {
                let n = labels.get_signed(x as i32 + dx, y as i32 + dy);
                if n == 0 {
                    continue;
                }
                if assigned == 0 {
                    assigned = n;
                } else if n != assigned {
                    sets.union(assigned, n);
                }
            }
            if assigned == 0 {
                assigned = sets.make();
            }
            labels.set(x, y, assigned);
        }
    }

    // Second pass: resolve roots and renumber in raster order.
    let mut final_of = vec![0u32; sets.parent.len()];
    let mut accums: Vec<Accum> = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let provisional = labels.get(x, y);
            if provisional == 0 {
                continue;
            }
            let root = sets.find(provisional) as usize;
            if final_of[root] == 0 {
                accums.push(Accum::default());
                final_of[root] = accums.len() as u32;
            }
            let label = final_of[root];
            accums[label as usize - 1].add(x, y);
            labels.set(x, y, label);
        }
    }

    let components = accums
        .iter()
        .enumerate()
        .map(|(i, a)| a.finish(i as u32 + 1))
        .collect();
    Ok((labels, components))
}

/// Find all connected components of a mask
pub fn find_connected_components(
    mask: &Mask,
    connectivity: ConnectivityType,
) -> RegionResult<Vec<ConnectedComponent>> {
    Ok(label_connected_components(mask, connectivity)?.1)
}

/// Recompute per-label statistics of an existing label map
///
/// Labels that no longer occur are skipped, so the result may have
/// gaps in its label sequence.
pub fn component_stats(labels: &LabelMap) -> Vec<ConnectedComponent> {
    let mut accums: Vec<Accum> = Vec::new();
    accums.resize_with(labels.max_label() as usize + 1, Accum::default);
    for y in 0..labels.height() {
        for x in 0..labels.width() {
            let l = labels.get(x, y);
            if l != 0 {
                accums[l as usize].add(x, y);
            }
        }
    }
    accums
        .iter()
        .enumerate()
        .filter(|(_, a)| a.count > 0)
        .map(|(l, a)| a.finish(l as u32))
        .collect()
}

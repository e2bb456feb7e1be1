//! Border tracing for connected components
//!
//! Outer borders are traced with Moore-neighbor tracing over a
//! [`LabelMap`]: start at the component's first raster pixel, sweep the
//! eight neighbors clockwise from the last background pixel seen, and
//! stop when the walk re-enters the start pixel heading to the same
//! second point. The result lists border pixels in clockwise order; a
//! one-pixel-wide part is walked on both sides.
//!
//! Geometry on traced borders (closed perimeter, convex hull, roughness,
//! extreme-point counts) lives here as well.

use inkseg_core::LabelMap;

/// Direction for border traversal (8-connected, clockwise from West)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// West (-1, 0)
    West = 0,
    /// Northwest (-1, -1)
    NorthWest = 1,
    /// North (0, -1)
    North = 2,
    /// Northeast (1, -1)
    NorthEast = 3,
    /// East (1, 0)
    East = 4,
    /// Southeast (1, 1)
    SouthEast = 5,
    /// South (0, 1)
    South = 6,
    /// Southwest (-1, 1)
    SouthWest = 7,
}

/// X offset for each direction
const XPOSTAB: [i32; 8] = [-1, -1, 0, 1, 1, 1, 0, -1];

/// Y offset for each direction
const YPOSTAB: [i32; 8] = [0, -1, -1, -1, 0, 1, 1, 1];

/// Direction lookup table: DIRTAB[1+dy][1+dx] gives direction index
const DIRTAB: [[i32; 3]; 3] = [[1, 2, 3], [0, -1, 4], [7, 6, 5]];

impl Direction {
    /// Get the x offset for this direction
    #[inline]
    pub fn dx(self) -> i32 {
        XPOSTAB[self as usize]
    }

    /// Get the y offset for this direction
    #[inline]
    pub fn dy(self) -> i32 {
        YPOSTAB[self as usize]
    }

    /// Get direction from x,y offsets
    pub fn from_offset(dx: i32, dy: i32) -> Option<Self> {
        if dx.abs() > 1 || dy.abs() > 1 {
            return None;
        }
        let idx = DIRTAB[(1 + dy) as usize][(1 + dx) as usize];
        (idx >= 0).then(|| Self::from_index(idx as usize))
    }

    /// Create direction from index (taken modulo 8)
    #[inline]
    fn from_index(idx: usize) -> Self {
        match idx % 8 {
            0 => Direction::West,
            1 => Direction::NorthWest,
            2 => Direction::North,
            3 => Direction::NorthEast,
            4 => Direction::East,
            5 => Direction::SouthEast,
            6 => Direction::South,
            _ => Direction::SouthWest,
        }
    }

    /// The direction `steps` positions further clockwise
    #[inline]
    pub fn rotated(self, steps: usize) -> Self {
        Self::from_index(self as usize + steps)
    }
}

/// A point on a border
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BorderPoint {
    /// X coordinate
    pub x: i32,
    /// Y coordinate
    pub y: i32,
}

impl BorderPoint {
    /// Create a new border point
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move in the given direction
    #[inline]
    pub fn moved(self, dir: Direction) -> Self {
        Self {
            x: self.x + dir.dx(),
            y: self.y + dir.dy(),
        }
    }

    fn distance(self, other: BorderPoint) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        dx.hypot(dy)
    }
}

/// Trace the outer border of the component carrying `label`.
///
/// Returns an empty vector if the label does not occur.
pub fn trace_outer_border(labels: &LabelMap, label: u32) -> Vec<BorderPoint> {
    if label == 0 {
        return Vec::new();
    }
    let Some(first) = labels.data().iter().position(|&l| l == label) else {
        return Vec::new();
    };
    let w = labels.width() as usize;
    let start = BorderPoint::new((first % w) as i32, (first / w) as i32);
    let is_fg = |p: BorderPoint| labels.get_signed(p.x, p.y) == label;

    let mut points = vec![start];
    let mut cur = start;
    // the raster-first pixel always has background to its west
    let mut back = Direction::West;
    // every border pixel is entered at most from each of 8 directions
    let max_steps = 8 * labels.data().iter().filter(|&&l| l == label).count() + 8;

    for _ in 0..max_steps {
        let Some(step) = (1..=8).map(|i| back.rotated(i)).find(|&d| is_fg(cur.moved(d))) else {
            // isolated pixel
            return points;
        };
        let next = cur.moved(step);
        if cur == start && points.len() > 1 && next == points[1] {
            break;
        }
        // the last background pixel checked becomes the backtrack of `next`
        let checked = cur.moved(step.rotated(7));
        back = Direction::from_offset(checked.x - next.x, checked.y - next.y)
            .unwrap_or(Direction::West);
        points.push(next);
        cur = next;
    }

    if points.len() > 1 && points.last() == Some(&start) {
        points.pop();
    }
    points
}

/// Length of the closed polyline through `points`.
pub fn perimeter(points: &[BorderPoint]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let open: f64 = points.windows(2).map(|p| p[0].distance(p[1])).sum();
    open + points[points.len() - 1].distance(points[0])
}

fn cross(o: BorderPoint, a: BorderPoint, b: BorderPoint) -> i64 {
    (a.x - o.x) as i64 * (b.y - o.y) as i64 - (a.y - o.y) as i64 * (b.x - o.x) as i64
}

/// Convex hull of a point set (monotone chain), without collinear points.
pub fn convex_hull(points: &[BorderPoint]) -> Vec<BorderPoint> {
    let mut pts: Vec<BorderPoint> = points.to_vec();
    pts.sort_by_key(|p| (p.x, p.y));
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }

    let mut hull: Vec<BorderPoint> = Vec::with_capacity(pts.len() * 2);
    for &p in &pts {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0 {
            hull.pop();
        }
        hull.push(p);
    }
    let lower_len = hull.len() + 1;
    for &p in pts.iter().rev().skip(1) {
        while hull.len() >= lower_len && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0 {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop();
    hull
}

/// Roughness of a border: perimeter over convex-hull perimeter, minus one.
///
/// A convex shape scores 0. Degenerate borders (a point or a segment)
/// also score 0.
pub fn roughness(points: &[BorderPoint]) -> f64 {
    let hull = perimeter(&convex_hull(points));
    if hull <= f64::EPSILON {
        return 0.0;
    }
    (perimeter(points) / hull - 1.0).max(0.0)
}

/// Number of border points lying on each extreme column and row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtremeCounts {
    /// Points on the leftmost column
    pub left: usize,
    /// Points on the rightmost column
    pub right: usize,
    /// Points on the top row
    pub top: usize,
    /// Points on the bottom row
    pub bottom: usize,
}

impl ExtremeCounts {
    /// The largest of the four counts
    pub fn max(&self) -> usize {
        self.left.max(self.right).max(self.top).max(self.bottom)
    }
}

/// Count border points on the min/max column and row.
pub fn extreme_counts(points: &[BorderPoint]) -> ExtremeCounts {
    let Some(first) = points.first() else {
        return ExtremeCounts::default();
    };
    let (mut x0, mut x1, mut y0, mut y1) = (first.x, first.x, first.y, first.y);
    for p in points {
        x0 = x0.min(p.x);
        x1 = x1.max(p.x);
        y0 = y0.min(p.y);
        y1 = y1.max(p.y);
    }
    ExtremeCounts {
        left: points.iter().filter(|p| p.x == x0).count(),
        right: points.iter().filter(|p| p.x == x1).count(),
        top: points.iter().filter(|p| p.y == y0).count(),
        bottom: points.iter().filter(|p| p.y == y1).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conncomp::{ConnectivityType, label_connected_components};
    use inkseg_core::Mask;

    fn labels_of(mask: &Mask) -> LabelMap {
        label_connected_components(mask, ConnectivityType::EightWay)
            .unwrap()
            .0
    }

    #[test]
    fn test_direction_table() {
        assert_eq!(Direction::from_offset(-1, 0), Some(Direction::West));
        assert_eq!(Direction::from_offset(1, 1), Some(Direction::SouthEast));
        assert_eq!(Direction::from_offset(0, 0), None);
        assert_eq!(Direction::SouthWest.rotated(1), Direction::West);
    }

    #[test]
    fn test_trace_square() {
        let mask = Mask::from_fn(10, 10, |x, y| (2..6).contains(&x) && (3..7).contains(&y)).unwrap();
        let border = trace_outer_border(&labels_of(&mask), 1);
        assert_eq!(border.len(), 12);
        assert_eq!(border[0], BorderPoint::new(2, 3));
        assert_eq!(border[1], BorderPoint::new(3, 3));
        assert!((perimeter(&border) - 12.0).abs() < 1e-9);
        assert_eq!(convex_hull(&border).len(), 4);
        assert!(roughness(&border).abs() < 1e-9);
    }

    #[test]
    fn test_trace_single_pixel_and_line() {
        let dot = Mask::from_fn(5, 5, |x, y| x == 2 && y == 2).unwrap();
        assert_eq!(trace_outer_border(&labels_of(&dot), 1).len(), 1);

        let line = Mask::from_fn(6, 3, |x, y| y == 1 && (1..5).contains(&x)).unwrap();
        let border = trace_outer_border(&labels_of(&line), 1);
        // walked out and back
        assert_eq!(border.len(), 6);
        assert!((perimeter(&border) - 6.0).abs() < 1e-9);
        assert_eq!(roughness(&border), 0.0);
    }

    #[test]
    fn test_trace_touching_border() {
        let mask = Mask::from_fn(6, 6, |_, y| y >= 3).unwrap();
        let border = trace_outer_border(&labels_of(&mask), 1);
        let counts = extreme_counts(&border);
        assert_eq!(counts.bottom, 6);
        assert_eq!(counts.top, 6);
        assert_eq!(counts.left, 3);
    }

    #[test]
    fn test_comb_is_rough() {
        // a bar with tall teeth: perimeter far exceeds the hull's
        let mask = Mask::from_fn(21, 20, |x, y| y >= 16 || (x % 4 == 0 && y >= 2)).unwrap();
        let border = trace_outer_border(&labels_of(&mask), 1);
        assert!(roughness(&border) > 1.0);
    }

    #[test]
    fn test_missing_label() {
        let mask = Mask::new(4, 4).unwrap();
        assert!(trace_outer_border(&labels_of(&mask), 1).is_empty());
    }
}

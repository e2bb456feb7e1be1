//! inkseg-region - Region processing for masks
//!
//! This crate provides:
//!
//! - **Connected component analysis** - labeling with per-component
//!   area, bounding box and centroid
//! - **Seed fill operations** - flood fill, hole filling (all or
//!   size-bounded), border clearing, per-component solid fill
//! - **Border tracing** - outer contours and the geometry measured on
//!   them (perimeter, convex hull, roughness, extreme-point counts)
//!
//! # Examples
//!
//! ```
//! use inkseg_core::Mask;
//! use inkseg_region::{ConnectivityType, find_connected_components};
//!
//! let mask = Mask::from_fn(100, 100, |x, y| (x == 10 && y == 10) || (x == 50 && y == 50)).unwrap();
//! let components = find_connected_components(&mask, ConnectivityType::EightWay).unwrap();
//! assert_eq!(components.len(), 2);
//! ```

pub mod ccbord;
pub mod conncomp;
pub mod error;
pub mod seedfill;

pub use error::{RegionError, RegionResult};

pub use ccbord::{
    BorderPoint, Direction, ExtremeCounts, convex_hull, extreme_counts, perimeter, roughness,
    trace_outer_border,
};
pub use conncomp::{
    ConnectedComponent, ConnectivityType, component_stats, find_connected_components,
    label_connected_components,
};
pub use seedfill::{
    clear_border, fill_component_interior, fill_holes, fill_holes_below, find_holes, floodfill,
};

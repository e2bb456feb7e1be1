//! inkseg-morph - Binary morphology on masks
//!
//! This crate provides:
//!
//! - Structuring elements ([`Sel`]): bricks, squares and disks
//! - Erosion, dilation, opening and closing of a [`Mask`]
//! - Disk-shaped shorthands and a signed close/open helper used by the
//!   repair stage (positive radius closes, negative radius opens)
//!
//! [`Mask`]: inkseg_core::Mask

pub mod binary;
mod error;
pub mod sel;

pub use error::{MorphError, MorphResult};
pub use sel::Sel;

pub use binary::{
    BoundaryCondition, close, close_disk, close_or_open, dilate, dilate_disk, erode, erode_disk,
    erode_with, open, open_disk,
};

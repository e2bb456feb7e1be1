//! inkseg Core - Basic data structures for ink segmentation
//!
//! This crate provides the buffers every stage of the segmentation
//! engine passes around:
//!
//! - [`Pix`] / [`PixMut`] - The source capture (gray or RGB, 8-bit)
//! - [`Mask`] - Binary foreground mask with samples in `{0, 255}`
//! - [`LabelMap`] - Per-pixel connected-component identifiers
//! - [`FPix`] - Floating-point image for signed filter responses
//! - [`Box`] - Rectangle regions

pub mod box_;
pub mod error;
pub mod fpix;
pub mod labels;
pub mod mask;
pub mod pix;

pub use box_::Box;
pub use error::{Error, Result};
pub use fpix::FPix;
pub use labels::LabelMap;
pub use mask::{BG, FG, Mask};
pub use pix::convert::RgbComponent;
pub use pix::statistics::IntensityStats;
pub use pix::{Channels, Pix, PixMut};

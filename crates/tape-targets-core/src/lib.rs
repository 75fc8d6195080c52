//! Core types and utilities for tape target detection.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any concrete image type or contour extractor; the detector and
//! the stereo reconstructor build on top of it.

mod corners;
mod homography;
mod line;
mod logger;

pub use corners::{Bounds, TargetCorners};
pub use homography::{homography_from_4pt, Homography};
pub use line::Line;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;

//! High-level facade crate for the `tape-targets-*` workspace.
//!
//! This crate provides:
//! - stable, convenient re-exports of the underlying crates
//! - frame helpers for raw capture buffers and image files
//! - the line-delimited JSON wire messages
//! - JSON config/report helpers and an overlay renderer used by the CLI
//!
//! ## Quickstart
//!
//! ```no_run
//! use tape_targets::detect::TapeDetector;
//! use tape_targets::stereo::{CalibrationConstants, StereoReconstructor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let left = tape_targets::frame::load_rgb("left.png")?;
//! let right = tape_targets::frame::load_rgb("right.png")?;
//!
//! let detector = TapeDetector::default();
//! let (l, r) = (detector.detect(&left), detector.detect(&right));
//!
//! let stereo = StereoReconstructor::new(CalibrationConstants::default());
//! match stereo.reconstruct(&l.targets, &r.targets) {
//!     Ok(est) => println!("distance {:.1}, offset {:.1}", est.distance, est.lateral_offset),
//!     Err(err) => println!("no range: {err}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `tape_targets::core`: corner sets, lines, homographies, logger.
//! - `tape_targets::detect`: mask, candidates, resolver, corner strategies, overlay.
//! - `tape_targets::stereo`: calibration constants and disparity ranging.

pub use tape_targets_core as core;
pub use tape_targets_detect as detect;
pub use tape_targets_stereo as stereo;

pub use tape_targets_core::TargetCorners;
pub use tape_targets_detect::{DetectionResult, TapeDetector, TapeDetectorParams};
pub use tape_targets_stereo::{CalibrationConstants, StereoEstimate, StereoReconstructor};

pub mod alignment;
pub mod frame;
pub mod io;
pub mod messages;
pub mod render;

//! Stereo range estimation from paired tape target detections.
//!
//! Each camera contributes two targets (eight corners). Corners are paired by
//! position, the mean horizontal disparity is turned into a distance with the
//! rig's baseline and focal scale, and an empirical linear fit corrects the
//! result. Calibration is a plain value handed to the reconstructor.

mod calibration;
mod error;
mod reconstruct;

pub use calibration::CalibrationConstants;
pub use error::{CalibrationError, StereoError};
pub use reconstruct::{StereoEstimate, StereoReconstructor, TARGETS_PER_VIEW};

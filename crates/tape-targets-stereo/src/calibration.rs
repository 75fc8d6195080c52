//! Calibration constants, loaded once and passed in explicitly.

use std::fs;
use std::path::Path;

use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

use crate::error::CalibrationError;

/// Rig constants for disparity-to-distance conversion.
///
/// Defaults are the values measured on a 480 px wide dual-camera rig with
/// distances in inches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConstants {
    /// Distance between the two optical centres.
    pub baseline: f64,
    /// Focal length in pixels, folded with any unit scale.
    pub focal_scale: f64,
    /// Empirical correction `distance = fit_slope * raw + fit_intercept`.
    pub fit_slope: f64,
    pub fit_intercept: f64,
    pub image_width: u32,
    /// Intrinsics of the left camera, informational.
    pub camera_matrix: Option<[[f64; 3]; 3]>,
}

impl Default for CalibrationConstants {
    fn default() -> Self {
        Self {
            baseline: 7.25,
            focal_scale: 585.0,
            fit_slope: 1.8174,
            fit_intercept: -8.1707,
            image_width: 480,
            camera_matrix: Some([
                [592.247_104_02, 0.0, 309.225_271_1],
                [0.0, 587.042_313_92, 249.438_170_09],
                [0.0, 0.0, 1.0],
            ]),
        }
    }
}

impl CalibrationConstants {
    /// Load constants from JSON; missing fields take their defaults.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, CalibrationError> {
        let raw = fs::read_to_string(path)?;
        let constants: Self = serde_json::from_str(&raw)?;
        constants.validate()?;
        Ok(constants)
    }

    /// Write these constants to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), CalibrationError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), CalibrationError> {
        if !(self.baseline.is_finite() && self.baseline > 0.0) {
            return Err(CalibrationError::Invalid("baseline must be finite and positive"));
        }
        if !(self.focal_scale.is_finite() && self.focal_scale > 0.0) {
            return Err(CalibrationError::Invalid(
                "focal scale must be finite and positive",
            ));
        }
        if !(self.fit_slope.is_finite() && self.fit_intercept.is_finite()) {
            return Err(CalibrationError::Invalid("fit constants must be finite"));
        }
        if self.image_width == 0 {
            return Err(CalibrationError::Invalid("image width must be non-zero"));
        }
        Ok(())
    }

    /// `baseline * focal_scale`, the numerator of the depth equation.
    pub fn triangulation_constant(&self) -> f64 {
        self.baseline * self.focal_scale
    }

    pub fn half_width(&self) -> f64 {
        self.image_width as f64 / 2.0
    }

    pub fn camera_matrix(&self) -> Option<Matrix3<f64>> {
        self.camera_matrix.map(|k| {
            Matrix3::new(
                k[0][0], k[0][1], k[0][2], //
                k[1][0], k[1][1], k[1][2], //
                k[2][0], k[2][1], k[2][2],
            )
        })
    }
}

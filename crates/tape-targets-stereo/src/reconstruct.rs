use serde::{Deserialize, Serialize};
use tape_targets_core::TargetCorners;

use crate::calibration::CalibrationConstants;
use crate::error::StereoError;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Targets expected per camera.
pub const TARGETS_PER_VIEW: usize = 2;

/// Distance and offset recovered from one stereo frame pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StereoEstimate {
    /// Corrected distance, in the units of the baseline.
    pub distance: f64,
    /// `baseline * focal_scale / mean_disparity`, before correction.
    pub raw_distance: f64,
    /// Pixels from the frame centre to the target midpoint; positive when
    /// the target is left of centre.
    pub lateral_offset: f64,
    pub mean_disparity: f64,
}

/// Converts left/right corner correspondences into a [`StereoEstimate`].
#[derive(Clone, Debug)]
pub struct StereoReconstructor {
    calibration: CalibrationConstants,
}

impl StereoReconstructor {
    pub fn new(calibration: CalibrationConstants) -> Self {
        Self { calibration }
    }

    pub fn calibration(&self) -> &CalibrationConstants {
        &self.calibration
    }

    /// Reconstruct from two targets per view.
    ///
    /// Corners are paired by position, so both sides must come from the same
    /// ordering convention (left-to-right targets, BL/TL/TR/BR corners).
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, left, right), fields(left = left.len(), right = right.len()))
    )]
    pub fn reconstruct(
        &self,
        left: &[TargetCorners],
        right: &[TargetCorners],
    ) -> Result<StereoEstimate, StereoError> {
        if left.len() != TARGETS_PER_VIEW || right.len() != TARGETS_PER_VIEW {
            return Err(StereoError::CorrespondenceMismatch {
                left: left.len(),
                right: right.len(),
            });
        }

        let pairs = left
            .iter()
            .zip(right)
            .flat_map(|(l, r)| l.points.iter().zip(r.points.iter()));
        let (mut disparity_sum, mut mid_sum, mut n) = (0.0_f64, 0.0_f64, 0usize);
        for (l, r) in pairs {
            let (lx, rx) = (l.x as f64, r.x as f64);
            disparity_sum += (lx - rx).abs();
            mid_sum += (lx + rx) / 2.0;
            n += 1;
        }
        let mean_disparity = disparity_sum / n as f64;
        let mean_mid_x = mid_sum / n as f64;

        if mean_disparity <= f64::EPSILON {
            return Err(StereoError::ZeroDisparity);
        }

        let c = &self.calibration;
        let raw_distance = c.triangulation_constant() / mean_disparity;
        let estimate = StereoEstimate {
            distance: c.fit_slope * raw_distance + c.fit_intercept,
            raw_distance,
            lateral_offset: -(mean_mid_x - c.half_width()),
            mean_disparity,
        };
        log::debug!(
            "disparity {:.2}px -> distance {:.2} (raw {:.2}), offset {:.1}px",
            estimate.mean_disparity,
            estimate.distance,
            estimate.raw_distance,
            estimate.lateral_offset
        );
        Ok(estimate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point2;

    fn square(dx: f32) -> TargetCorners {
        TargetCorners::new([
            Point2::new(100.0 + dx, 100.0),
            Point2::new(100.0 + dx, 150.0),
            Point2::new(150.0 + dx, 150.0),
            Point2::new(150.0 + dx, 100.0),
        ])
    }

    fn reconstructor() -> StereoReconstructor {
        StereoReconstructor::new(CalibrationConstants::default())
    }

    #[test]
    fn distance_is_baseline_times_focal_over_disparity() {
        let left = [square(0.0), square(0.0)];
        for d in [5.0_f32, 12.5, 40.0] {
            let right = [square(-d), square(-d)];
            let est = reconstructor().reconstruct(&left, &right).expect("estimate");
            assert_relative_eq!(est.mean_disparity, d as f64, epsilon = 1e-9);
            assert_relative_eq!(est.raw_distance, 7.25 * 585.0 / d as f64, epsilon = 1e-9);
            assert_relative_eq!(
                est.distance,
                1.8174 * est.raw_distance - 8.1707,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn swapping_views_keeps_disparity() {
        let a = [square(0.0), square(0.0)];
        let b = [square(-20.0), square(-20.0)];
        let ab = reconstructor().reconstruct(&a, &b).expect("ab");
        let ba = reconstructor().reconstruct(&b, &a).expect("ba");
        assert_relative_eq!(ab.mean_disparity, ba.mean_disparity);
        assert_relative_eq!(ab.distance, ba.distance);
        assert_relative_eq!(ab.lateral_offset, ba.lateral_offset);
    }

    #[test]
    fn lateral_offset_is_relative_to_frame_centre() {
        // Midpoint x is 125 - 10 = 115, centre is 240.
        let est = reconstructor()
            .reconstruct(&[square(0.0), square(0.0)], &[square(-20.0), square(-20.0)])
            .expect("estimate");
        assert_relative_eq!(est.lateral_offset, 125.0, epsilon = 1e-9);
    }

    #[test]
    fn count_mismatch_is_reported() {
        let r = reconstructor();
        let err = r
            .reconstruct(&[square(0.0)], &[square(-5.0), square(-5.0)])
            .unwrap_err();
        assert_eq!(err, StereoError::CorrespondenceMismatch { left: 1, right: 2 });
        assert!(matches!(
            r.reconstruct(&[], &[]),
            Err(StereoError::CorrespondenceMismatch { left: 0, right: 0 })
        ));
    }

    #[test]
    fn zero_disparity_is_reported() {
        let same = [square(0.0), square(0.0)];
        assert_eq!(
            reconstructor().reconstruct(&same, &same),
            Err(StereoError::ZeroDisparity)
        );
    }
}

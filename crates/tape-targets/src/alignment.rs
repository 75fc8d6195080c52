//! Alignment of the detected target against its ideal, centred pose.

use nalgebra::Point2;

use crate::core::{homography_from_4pt, Homography, TargetCorners};
use crate::detect::TargetGeometry;

/// Pixels per target unit used by the alignment view.
pub const DEFAULT_TARGET_SCALE: f32 = 10.0;

/// Outer corners of a target centred in a `width` x `height` frame, with
/// its physical size multiplied by `scale`.
pub fn ideal_target_corners(width: u32, height: u32, scale: f32) -> TargetCorners {
    let geometry = TargetGeometry::default();
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    let hw = geometry.target_width as f32 * scale / 2.0;
    let hh = geometry.target_height as f32 * scale / 2.0;
    TargetCorners::new([
        Point2::new(cx - hw, cy + hh),
        Point2::new(cx - hw, cy - hh),
        Point2::new(cx + hw, cy - hh),
        Point2::new(cx + hw, cy + hh),
    ])
}

/// Homography taking the ideal centred target onto the detected outer corners.
///
/// Its inverse warps the frame so the target appears centred and square on;
/// the translation part tells how far the camera is off-axis. `None` when
/// the detected quadrilateral is degenerate.
pub fn alignment_homography(
    outer: &TargetCorners,
    width: u32,
    height: u32,
    scale: f32,
) -> Option<Homography> {
    let ideal = ideal_target_corners(width, height, scale);
    homography_from_4pt(&ideal.points, &outer.points)
}

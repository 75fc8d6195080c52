/// Errors returned by [`StereoReconstructor::reconstruct`](crate::StereoReconstructor::reconstruct).
///
/// These mean "seen but unusable"; an empty detection is reported before
/// reconstruction is attempted.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StereoError {
    #[error("correspondence count mismatch (left={left} targets, right={right} targets, expected 2 each)")]
    CorrespondenceMismatch { left: usize, right: usize },
    #[error("mean disparity is zero")]
    ZeroDisparity,
}

/// Errors from loading or validating calibration constants.
#[derive(thiserror::Error, Debug)]
pub enum CalibrationError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("invalid calibration: {0}")]
    Invalid(&'static str),
}

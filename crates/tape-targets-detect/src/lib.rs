//! Retro-reflective tape target detector built on top of `tape-targets-core`.
//!
//! ## Quickstart
//!
//! ```
//! use image::RgbImage;
//! use tape_targets_detect::TapeDetector;
//!
//! let frame = RgbImage::new(480, 360);
//! let result = TapeDetector::default().detect(&frame);
//! println!("targets: {}", result.targets.len());
//! ```
//!
//! Pipeline, once per frame:
//! 1. Threshold the frame in HSV into a binary mask.
//! 2. Trace contours, take convex hulls, approximate each by a polygon and
//!    rank by area.
//! 3. Accept the largest four/five-sided candidate with a strip-like aspect
//!    as the primary.
//! 4. Find the second strip among the smaller candidates, or merge two split
//!    pieces next to the primary into one.
//! 5. Order corners bottom-left, top-left, top-right, bottom-right.

mod candidate;
mod corners;
mod detector;
mod mask;
mod overlay;
mod polygon;
mod resolver;

pub use candidate::{extract, extract_from_contours, Candidate, CandidateParams};
pub use corners::{direct_corners, outer_corners, CornerStrategy};
pub use detector::{TapeDetector, TapeDetectorParams};
pub use mask::{classify, rgb_to_hsv, ColorRange, MASK_ON};
pub use overlay::{
    draw_commands, DrawCommand, CANDIDATE_COLOR, LABEL_COLOR, TARGET_COLOR, WINDOW_COLOR,
};
pub use polygon::{
    approximate_closed, min_area_rect, reduce_vertices, BoundingRect, Moments, RotatedRect,
    DEGENERATE_CENTROID,
};
pub use resolver::{
    aspect_error, DetectionResult, MergeSidePolicy, PrimaryMatch, Region, Rejection,
    ResolverParams, SearchWindow, SearchWindowParams, SecondaryMatch, SecondarySource,
    TargetGeometry, TargetResolver, WindowRegions, WindowSide,
};

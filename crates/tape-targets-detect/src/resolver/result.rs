use serde::{Deserialize, Serialize};
use tape_targets_core::TargetCorners;

use crate::candidate::Candidate;
use crate::corners::{outer_corners, CornerStrategy};

/// Side of the primary a merged secondary was assembled on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowSide {
    Left,
    Right,
    /// No search window configured.
    Any,
}

/// How the second strip was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SecondarySource {
    /// A single contour passed the same tests as the primary.
    Isolated,
    /// Hull of two partial contours, e.g. a strip split by an obstacle.
    Merged { side: WindowSide },
}

/// Axis-aligned region in image coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Region {
    /// Strict containment, matching the open intervals of the window test.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.min[0] < x && x < self.max[0] && self.min[1] < y && y < self.max[1]
    }
}

/// Left and right merge windows around the primary.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowRegions {
    pub left: Region,
    pub right: Region,
}

/// Outcome of resolving one frame.
///
/// Zero, one or two targets are all valid results. Two targets never
/// overlap.
#[derive(Clone, Debug, Default)]
pub struct DetectionResult {
    /// Targets ordered left to right by their minimum `x`.
    pub targets: Vec<TargetCorners>,
    pub secondary: Option<SecondarySource>,
    pub search_window: Option<WindowRegions>,
    /// Candidates not used by any target, still in descending area order.
    pub unused: Vec<Candidate>,
}

impl DetectionResult {
    pub fn empty(unused: Vec<Candidate>) -> Self {
        Self {
            unused,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Exactly one strip found.
    pub fn is_partial(&self) -> bool {
        self.targets.len() == 1
    }

    pub fn is_complete(&self) -> bool {
        self.targets.len() == 2
    }

    /// All target corners flattened to `[x, y]` pairs, left target first.
    pub fn corner_pairs(&self) -> Vec<[f32; 2]> {
        self.targets.iter().flat_map(|t| t.to_pairs()).collect()
    }

    pub fn outer_corners(&self, strategy: CornerStrategy) -> Option<TargetCorners> {
        outer_corners(&self.targets, strategy)
    }
}

use serde::{Deserialize, Serialize};

/// Physical layout of the target, in any consistent unit.
///
/// A target is two vertical strips of tape side by side; only ratios of
/// these values matter to the resolver.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetGeometry {
    pub tape_width: f64,
    pub tape_height: f64,
    /// Outer width spanned by both strips.
    pub target_width: f64,
    pub target_height: f64,
}

impl Default for TargetGeometry {
    fn default() -> Self {
        Self {
            tape_width: 2.0,
            tape_height: 5.0,
            target_width: 10.25,
            target_height: 5.0,
        }
    }
}

impl TargetGeometry {
    /// Expected width over height of a single strip.
    pub fn tape_aspect(&self) -> f64 {
        self.tape_width / self.tape_height
    }

    pub fn tape_area(&self) -> f64 {
        self.tape_width * self.tape_height
    }
}

/// Region around the primary where split pieces of the second strip are looked for.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchWindowParams {
    /// Multiplier on the expected target extent.
    pub scale: f64,
    /// Dead zone around the primary, in units of `sqrt(primary area)`.
    pub min_pad: f64,
}

impl Default for SearchWindowParams {
    fn default() -> Self {
        Self {
            scale: 1.8,
            min_pad: 1.0,
        }
    }
}

/// Which merged reconstruction wins when both sides of the primary produce one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeSidePolicy {
    #[default]
    PreferLeft,
    PreferRight,
    /// Closest to the horizontal frame centre; falls back to the primary's
    /// centroid when the frame width is unknown.
    NearestToCenter,
}

/// Parameters of [`TargetResolver`](super::TargetResolver).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverParams {
    /// Scanning for a second strip stops at the first candidate smaller
    /// than this fraction of the accepted strip's area.
    pub min_area_ratio: f64,
    /// Maximum relative error between the measured and expected strip aspect.
    pub aspect_tolerance: f64,
    pub min_vertices: usize,
    pub max_vertices: usize,
    /// Maximum relative bounding-box width difference for merge pieces.
    pub merge_width_tolerance: f64,
    /// Lower bound on hull area over rotated-rectangle area; `None` disables
    /// the test. The rotated rectangle keeps tilted strips at a fill near 1.
    pub min_fill_ratio: Option<f64>,
    pub geometry: TargetGeometry,
    /// `None` puts every merge survivor on a single side.
    pub search_window: Option<SearchWindowParams>,
    pub merge_side: MergeSidePolicy,
}

impl Default for ResolverParams {
    fn default() -> Self {
        Self {
            min_area_ratio: 0.6,
            aspect_tolerance: 0.4,
            min_vertices: 4,
            max_vertices: 5,
            merge_width_tolerance: 0.4,
            min_fill_ratio: Some(0.7),
            geometry: TargetGeometry::default(),
            search_window: Some(SearchWindowParams::default()),
            merge_side: MergeSidePolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let params: ResolverParams =
            serde_json::from_str(r#"{"aspect_tolerance": 0.25, "merge_side": "nearest_to_center"}"#)
                .expect("params");
        assert_eq!(params.aspect_tolerance, 0.25);
        assert_eq!(params.merge_side, MergeSidePolicy::NearestToCenter);
        assert_eq!(params.min_area_ratio, 0.6);
        assert_eq!(params.search_window, Some(SearchWindowParams::default()));
        assert_eq!(params.geometry.tape_aspect(), 0.4);
        assert_eq!(params.min_fill_ratio, Some(0.7));
    }

    #[test]
    fn fill_test_can_be_disabled() {
        let params: ResolverParams =
            serde_json::from_str(r#"{"min_fill_ratio": null}"#).expect("params");
        assert!(params.min_fill_ratio.is_none());
    }

    #[test]
    fn search_window_can_be_disabled() {
        let params: ResolverParams =
            serde_json::from_str(r#"{"search_window": null}"#).expect("params");
        assert!(params.search_window.is_none());
    }
}

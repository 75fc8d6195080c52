use nalgebra::Point2;
use tape_targets_core::TargetCorners;

use super::params::MergeSidePolicy;
use super::primary::PrimaryMatch;
use super::result::{Region, SecondarySource, WindowRegions, WindowSide};
use super::TargetResolver;
use crate::candidate::Candidate;

/// Merge search region derived from the primary's size and position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchWindow {
    pub center: Point2<f64>,
    /// Horizontal reach on either side of `center`.
    pub x_range: f64,
    pub y_range: f64,
    /// Half-width of the dead zone around the primary.
    pub pad: f64,
}

impl SearchWindow {
    pub fn side_of(&self, p: Point2<f64>) -> Option<WindowSide> {
        let regions = self.regions();
        if regions.left.contains(p.x, p.y) {
            Some(WindowSide::Left)
        } else if regions.right.contains(p.x, p.y) {
            Some(WindowSide::Right)
        } else {
            None
        }
    }

    pub fn regions(&self) -> WindowRegions {
        let (cx, cy) = (self.center.x, self.center.y);
        let (y0, y1) = (cy - self.y_range, cy + self.y_range);
        WindowRegions {
            left: Region {
                min: [cx - self.x_range, y0],
                max: [cx - self.pad, y1],
            },
            right: Region {
                min: [cx + self.pad, y0],
                max: [cx + self.x_range, y1],
            },
        }
    }
}

/// Second strip found next to a primary.
#[derive(Clone, Debug)]
pub struct SecondaryMatch {
    /// The accepted contour, synthetic when merged.
    pub candidate: Candidate,
    pub corners: TargetCorners,
    pub source: SecondarySource,
    /// Indices into the searched slice of the candidates this match used.
    pub consumed: Vec<usize>,
}

impl TargetResolver {
    /// Window in which split pieces of the second strip may lie, `None` when disabled.
    pub fn search_window(&self, primary: &Candidate) -> Option<SearchWindow> {
        let window = self.params.search_window?;
        let geometry = &self.params.geometry;
        let k = (primary.area / geometry.tape_area()).sqrt();
        Some(SearchWindow {
            center: primary.centroid_or_sentinel(),
            x_range: geometry.target_width * k * window.scale / 2.0,
            y_range: geometry.target_height * k * window.scale / 2.0,
            pad: primary.area.sqrt() * window.min_pad,
        })
    }

    /// Find the strip matching `primary` among `remaining`.
    ///
    /// A fully visible strip is preferred; otherwise two partial contours
    /// are merged into one.
    pub fn find_secondary(
        &self,
        primary: &PrimaryMatch<'_>,
        remaining: &[Candidate],
    ) -> Option<SecondaryMatch> {
        self.find_secondary_in_frame(primary, remaining, None)
    }

    /// As [`find_secondary`](Self::find_secondary), with the frame width
    /// available to [`MergeSidePolicy::NearestToCenter`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self, primary, remaining), fields(n = remaining.len()))
    )]
    pub fn find_secondary_in_frame(
        &self,
        primary: &PrimaryMatch<'_>,
        remaining: &[Candidate],
        frame_width: Option<u32>,
    ) -> Option<SecondaryMatch> {
        let (isolated, _) = self.find_primary(remaining, Some(primary.candidate.area));
        if let Some(found) = isolated {
            if found.corners.overlaps(&primary.corners) {
                log::debug!("isolated secondary {} overlaps the primary", found.index);
            } else {
                return Some(SecondaryMatch {
                    candidate: found.candidate.clone(),
                    corners: found.corners,
                    source: SecondarySource::Isolated,
                    consumed: vec![found.index],
                });
            }
        }
        self.merge_split(primary, remaining, frame_width)
    }

    fn merge_split(
        &self,
        primary: &PrimaryMatch<'_>,
        remaining: &[Candidate],
        frame_width: Option<u32>,
    ) -> Option<SecondaryMatch> {
        let width = primary.candidate.bounding_rect.width as f64;
        if width <= 0.0 {
            return None;
        }
        let window = self.search_window(primary.candidate);

        let mut left = Vec::new();
        let mut right = Vec::new();
        for (i, c) in remaining.iter().enumerate() {
            if c.is_degenerate() {
                continue;
            }
            let width_error = (c.bounding_rect.width as f64 - width).abs() / width;
            if width_error > self.params.merge_width_tolerance {
                log::trace!("merge piece {i}: width error {width_error:.2}");
                continue;
            }
            match window.map(|w| w.side_of(c.centroid_or_sentinel())) {
                None => left.push(i),
                Some(Some(WindowSide::Left)) => left.push(i),
                Some(Some(WindowSide::Right)) => right.push(i),
                Some(_) => {}
            }
        }

        let sides = match window {
            Some(_) => vec![(WindowSide::Left, left), (WindowSide::Right, right)],
            None => vec![(WindowSide::Any, left)],
        };
        let merged: Vec<SecondaryMatch> = sides
            .iter()
            .filter_map(|(side, pieces)| self.merge_side(primary, remaining, pieces, *side))
            .collect();
        self.pick_side(merged, primary, frame_width)
    }

    fn merge_side(
        &self,
        primary: &PrimaryMatch<'_>,
        remaining: &[Candidate],
        pieces: &[usize],
        side: WindowSide,
    ) -> Option<SecondaryMatch> {
        if pieces.len() < 2 {
            return None;
        }
        let mut ranked = pieces.to_vec();
        ranked.sort_by(|&a, &b| {
            let da = remaining[a].distance_to(primary.candidate);
            let db = remaining[b].distance_to(primary.candidate);
            da.total_cmp(&db)
        });
        let (a, b) = (ranked[0], ranked[1]);
        let merged = remaining[a].merged(&remaining[b], &self.candidate_params);

        let cutoff = self.params.min_area_ratio * primary.candidate.area;
        if merged.area < cutoff {
            log::debug!(
                "merge of {a}+{b} ({side:?}): area {:.1} below {cutoff:.1}",
                merged.area
            );
            return None;
        }
        let corners = match self.qualify(&merged) {
            Ok(corners) => corners,
            Err(reason) => {
                log::debug!("merge of {a}+{b} ({side:?}) rejected: {reason}");
                return None;
            }
        };
        if corners.overlaps(&primary.corners) {
            log::debug!("merge of {a}+{b} ({side:?}) overlaps the primary");
            return None;
        }
        Some(SecondaryMatch {
            candidate: merged,
            corners,
            source: SecondarySource::Merged { side },
            consumed: vec![a, b],
        })
    }

    fn pick_side(
        &self,
        mut merged: Vec<SecondaryMatch>,
        primary: &PrimaryMatch<'_>,
        frame_width: Option<u32>,
    ) -> Option<SecondaryMatch> {
        if merged.len() < 2 {
            return merged.pop();
        }
        let chosen = match self.params.merge_side {
            MergeSidePolicy::PreferLeft => 0,
            MergeSidePolicy::PreferRight => merged.len() - 1,
            MergeSidePolicy::NearestToCenter => {
                let cx = frame_width
                    .map(|w| w as f64 / 2.0)
                    .unwrap_or_else(|| primary.candidate.centroid_or_sentinel().x);
                merged
                    .iter()
                    .enumerate()
                    .min_by(|(_, a), (_, b)| {
                        let da = (a.corners.center().x as f64 - cx).abs();
                        let db = (b.corners.center().x as f64 - cx).abs();
                        da.total_cmp(&db)
                    })
                    .map(|(i, _)| i)
                    .unwrap_or(0)
            }
        };
        log::debug!(
            "both sides merged, keeping {:?} ({:?})",
            merged[chosen].source,
            self.params.merge_side
        );
        Some(merged.swap_remove(chosen))
    }
}

//! Target resolution: pick the primary strip, then find or rebuild its partner.
//!
//! ## Overview
//!
//! Candidates arrive sorted by descending area. The primary is the first
//! one passing the vertex-count and aspect tests. The secondary is searched
//! the same way among the remaining candidates, stopping once areas fall
//! below a fraction of the primary's. When an obstacle splits the second strip in two, the
//! two nearest width-compatible pieces inside a window next to the primary
//! are merged into one hull and re-tested.

use std::fmt;

use crate::candidate::{Candidate, CandidateParams};

mod params;
mod primary;
mod result;
mod secondary;

pub use params::{MergeSidePolicy, ResolverParams, SearchWindowParams, TargetGeometry};
pub use primary::{aspect_error, PrimaryMatch};
pub use result::{DetectionResult, Region, SecondarySource, WindowRegions, WindowSide};
pub use secondary::{SearchWindow, SecondaryMatch};

/// Why a candidate failed the single-strip tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Rejection {
    VertexCount(usize),
    /// Zero area or zero-sized rotated rectangle.
    Degenerate,
    Aspect { ratio: f64, error: f64 },
    Fill(f64),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::VertexCount(n) => write!(f, "{n} vertices"),
            Rejection::Degenerate => write!(f, "degenerate shape"),
            Rejection::Aspect { ratio, error } => {
                write!(f, "aspect {ratio:.3} off by {:.0}%", error * 100.0)
            }
            Rejection::Fill(fill) => write!(f, "fill ratio {fill:.2}"),
        }
    }
}

/// Stateless per-frame resolver.
#[derive(Clone, Debug, Default)]
pub struct TargetResolver {
    params: ResolverParams,
    /// Used to measure merged hulls the same way as extracted ones.
    candidate_params: CandidateParams,
}

impl TargetResolver {
    pub fn new(params: ResolverParams) -> Self {
        Self {
            params,
            candidate_params: CandidateParams::default(),
        }
    }

    pub fn with_candidate_params(mut self, candidate_params: CandidateParams) -> Self {
        self.candidate_params = candidate_params;
        self
    }

    pub fn params(&self) -> &ResolverParams {
        &self.params
    }

    /// Resolve zero, one or two targets from ranked candidates.
    pub fn resolve(&self, candidates: Vec<Candidate>) -> DetectionResult {
        self.resolve_in_frame(candidates, None)
    }

    /// As [`resolve`](Self::resolve), with the frame width available to the
    /// merge side policy.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self, candidates), fields(n = candidates.len()))
    )]
    pub fn resolve_in_frame(
        &self,
        candidates: Vec<Candidate>,
        frame_width: Option<u32>,
    ) -> DetectionResult {
        let (found, remaining) = self.find_primary(&candidates, None);
        let Some(primary) = found else {
            log::trace!("no primary among {} candidates", candidates.len());
            return DetectionResult::empty(candidates);
        };

        let offset = primary.index + 1;
        let search_window = self
            .search_window(primary.candidate)
            .map(|window| window.regions());
        let mut targets = vec![primary.corners];
        let mut used = vec![primary.index];
        let mut secondary = None;
        if let Some(found) = self.find_secondary_in_frame(&primary, remaining, frame_width) {
            targets.push(found.corners);
            used.extend(found.consumed.iter().map(|i| i + offset));
            secondary = Some(found.source);
        }
        targets.sort_by(|a, b| a.min_x().total_cmp(&b.min_x()));

        let unused = candidates
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !used.contains(i))
            .map(|(_, c)| c)
            .collect();

        DetectionResult {
            targets,
            secondary,
            search_window,
            unused,
        }
    }
}

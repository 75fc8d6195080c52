use tape_targets_core::TargetCorners;

use super::{Rejection, TargetResolver};
use crate::candidate::Candidate;
use crate::corners::direct_corners;

/// A candidate accepted as a strip of tape.
#[derive(Clone, Copy, Debug)]
pub struct PrimaryMatch<'a> {
    pub candidate: &'a Candidate,
    pub corners: TargetCorners,
    /// Position of `candidate` in the scanned slice.
    pub index: usize,
}

/// Relative error of `ratio` against `expected`, taking the better of the
/// ratio and its reciprocal so a strip lying on its side scores the same.
pub fn aspect_error(ratio: f64, expected: f64) -> f64 {
    let direct = (ratio - expected).abs() / expected;
    let swapped = (ratio.recip() - expected).abs() / expected;
    direct.min(swapped)
}

impl TargetResolver {
    /// Run the single-strip tests on one candidate.
    pub fn qualify(&self, candidate: &Candidate) -> Result<TargetCorners, Rejection> {
        let params = &self.params;
        let vertices = candidate.approx.len();
        if vertices < params.min_vertices || vertices > params.max_vertices {
            return Err(Rejection::VertexCount(vertices));
        }
        if candidate.area <= 0.0 {
            return Err(Rejection::Degenerate);
        }
        let ratio = candidate.aspect_ratio().ok_or(Rejection::Degenerate)?;
        let error = aspect_error(ratio, params.geometry.tape_aspect());
        if error > params.aspect_tolerance {
            return Err(Rejection::Aspect { ratio, error });
        }
        if let Some(min_fill) = params.min_fill_ratio {
            let fill = candidate.area / candidate.min_rect.area();
            if fill < min_fill {
                return Err(Rejection::Fill(fill));
            }
        }
        direct_corners(candidate).ok_or(Rejection::Degenerate)
    }

    /// Scan `candidates` (descending area) for the first strip of tape.
    ///
    /// With a `reference_area` (an already accepted strip) scanning stops at
    /// the first candidate smaller than `min_area_ratio` of it. Without one
    /// every candidate is tried, so a large blob that is not tape cannot hide
    /// the strips behind it. The returned slice holds the candidates after
    /// the match, or from the stopping point when nothing matched.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self, candidates), fields(n = candidates.len()))
    )]
    pub fn find_primary<'a>(
        &self,
        candidates: &'a [Candidate],
        reference_area: Option<f64>,
    ) -> (Option<PrimaryMatch<'a>>, &'a [Candidate]) {
        let cutoff = reference_area.map(|area| self.params.min_area_ratio * area);
        for (index, candidate) in candidates.iter().enumerate() {
            if let Some(cutoff) = cutoff.filter(|&cutoff| candidate.area < cutoff) {
                log::trace!(
                    "candidate {index}: area {:.1} below cutoff of {cutoff:.1}, stopping",
                    candidate.area
                );
                return (None, &candidates[index..]);
            }
            match self.qualify(candidate) {
                Ok(corners) => {
                    log::debug!("candidate {index} accepted, area {:.1}", candidate.area);
                    let found = PrimaryMatch {
                        candidate,
                        corners,
                        index,
                    };
                    return (Some(found), &candidates[index + 1..]);
                }
                Err(reason) => log::debug!("candidate {index} rejected: {reason}"),
            }
        }
        (None, &candidates[candidates.len()..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::CandidateParams;
    use crate::resolver::ResolverParams;
    use approx::assert_relative_eq;
    use imageproc::point::Point;

    fn quad(points: [(i32, i32); 4]) -> Candidate {
        Candidate::from_points(
            points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            &CandidateParams::default(),
        )
    }

    fn rect(x: i32, y: i32, w: i32, h: i32) -> Candidate {
        quad([(x, y), (x + w, y), (x + w, y + h), (x, y + h)])
    }

    #[test]
    fn aspect_error_is_symmetric_under_swap() {
        for ratio in [0.2, 0.33, 0.4, 0.55, 1.0, 2.5] {
            assert_relative_eq!(aspect_error(ratio, 0.4), aspect_error(1.0 / ratio, 0.4));
        }
        assert_relative_eq!(aspect_error(0.4, 0.4), 0.0);
    }

    #[test]
    fn rotated_strip_is_accepted_iff_upright_is() {
        let resolver = TargetResolver::default();
        for (w, h) in [(40, 100), (20, 100), (60, 100), (100, 100), (30, 50)] {
            let upright = resolver.qualify(&rect(0, 0, w, h)).is_ok();
            let lying = resolver.qualify(&rect(0, 0, h, w)).is_ok();
            assert_eq!(upright, lying, "{w}x{h}");
        }
        assert!(resolver.qualify(&rect(0, 0, 40, 100)).is_ok());
        assert!(resolver.qualify(&rect(0, 0, 100, 100)).is_err());
    }

    #[test]
    fn triangle_is_rejected_for_vertex_count() {
        let resolver = TargetResolver::default();
        let tri = Candidate::from_points(
            vec![Point::new(0, 0), Point::new(40, 0), Point::new(20, 100)],
            &CandidateParams::default(),
        );
        assert_eq!(resolver.qualify(&tri), Err(Rejection::VertexCount(3)));
    }

    #[test]
    fn fill_ratio_rejects_hollow_shapes() {
        let params = ResolverParams {
            min_fill_ratio: Some(0.9),
            aspect_tolerance: 1.0,
            ..ResolverParams::default()
        };
        let resolver = TargetResolver::new(params);
        // Trapezoid with fill 0.75 of its bounding rectangle.
        let trapezoid = quad([(0, 0), (20, 0), (40, 100), (0, 100)]);
        assert!(matches!(resolver.qualify(&trapezoid), Err(Rejection::Fill(_))));
        assert!(resolver.qualify(&rect(0, 0, 40, 100)).is_ok());
    }

    #[test]
    fn default_fill_test_rejects_lopsided_quad() {
        // Strip-shaped rotated rectangle, but only 65% of it is covered.
        let lopsided = quad([(0, 0), (40, 0), (40, 30), (0, 100)]);
        assert!(matches!(
            TargetResolver::default().qualify(&lopsided),
            Err(Rejection::Fill(_))
        ));

        let lenient = TargetResolver::new(ResolverParams {
            min_fill_ratio: None,
            ..ResolverParams::default()
        });
        assert!(lenient.qualify(&lopsided).is_ok());
    }

    #[test]
    fn empty_list_has_no_primary() {
        let resolver = TargetResolver::default();
        let (found, rest) = resolver.find_primary(&[], None);
        assert!(found.is_none());
        assert!(rest.is_empty());
    }

    #[test]
    fn scan_skips_bad_shapes_and_returns_the_rest() {
        let resolver = TargetResolver::default();
        let cands = vec![
            rect(0, 0, 80, 80),
            rect(200, 0, 40, 100),
            rect(300, 0, 38, 96),
            rect(400, 0, 5, 5),
        ];
        let (found, rest) = resolver.find_primary(&cands, None);
        let found = found.expect("primary");
        assert_eq!(found.index, 1);
        assert_eq!(found.corners.top_left().x, 200.0);
        assert_eq!(rest.len(), 2);
    }

    #[test]
    fn rejected_large_blob_does_not_set_a_cutoff() {
        let resolver = TargetResolver::default();
        let cands = vec![rect(0, 0, 120, 120), rect(200, 0, 20, 50)];
        let (found, rest) = resolver.find_primary(&cands, None);
        let found = found.expect("primary behind the blob");
        assert_eq!(found.index, 1);
        assert!(rest.is_empty());
    }

    #[test]
    fn scan_stops_below_reference_cutoff() {
        let resolver = TargetResolver::default();
        let cands = vec![rect(200, 0, 20, 50), rect(300, 0, 10, 25)];
        let (found, rest) = resolver.find_primary(&cands, Some(10_000.0));
        assert!(found.is_none());
        assert_eq!(rest.len(), 2);

        let (found, _) = resolver.find_primary(&cands, Some(1200.0));
        assert_eq!(found.expect("in range").index, 0);
    }
}

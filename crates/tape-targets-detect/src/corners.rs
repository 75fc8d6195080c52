//! Corner ordering for single strips and for the outer target quadrilateral.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use tape_targets_core::{Line, TargetCorners};

use crate::candidate::Candidate;
use crate::polygon::reduce_vertices;

/// How the outer corners of a multi-strip target are obtained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CornerStrategy {
    /// Outer corners of the left-most and right-most strips, as detected.
    #[default]
    Direct,
    /// Intersections of lines fitted through the top edges, the bottom edges
    /// and the outer sides.
    BestFitLines,
}

/// Corners of one candidate from its polygon approximation, reduced to four
/// points when it has five.
pub fn direct_corners(candidate: &Candidate) -> Option<TargetCorners> {
    let quad = reduce_vertices(&candidate.approx, 4);
    if quad.len() != 4 {
        return None;
    }
    let points = [0, 1, 2, 3].map(|i| Point2::new(quad[i].x as f32, quad[i].y as f32));
    Some(TargetCorners::from_unordered(points))
}

/// Outer quadrilateral spanned by `targets`, in the usual BL, TL, TR, BR winding.
///
/// `None` for an empty set, or when the best-fit lines are parallel.
pub fn outer_corners(targets: &[TargetCorners], strategy: CornerStrategy) -> Option<TargetCorners> {
    let left = targets
        .iter()
        .min_by(|a, b| a.min_x().total_cmp(&b.min_x()))?;
    let right = targets
        .iter()
        .max_by(|a, b| a.bounds().max.x.total_cmp(&b.bounds().max.x))?;

    match strategy {
        CornerStrategy::Direct => Some(TargetCorners::new([
            left.bottom_left(),
            left.top_left(),
            right.top_right(),
            right.bottom_right(),
        ])),
        CornerStrategy::BestFitLines => best_fit_outer(targets, left, right),
    }
}

fn best_fit_outer(
    targets: &[TargetCorners],
    left: &TargetCorners,
    right: &TargetCorners,
) -> Option<TargetCorners> {
    let top: Vec<Point2<f32>> = targets
        .iter()
        .flat_map(|t| [t.top_left(), t.top_right()])
        .collect();
    let bottom: Vec<Point2<f32>> = targets
        .iter()
        .flat_map(|t| [t.bottom_left(), t.bottom_right()])
        .collect();
    let top = Line::fit(&top)?;
    let bottom = Line::fit(&bottom)?;

    let mut by_x = left.points;
    by_x.sort_by(|a, b| a.x.total_cmp(&b.x));
    let left_side = Line::through(by_x[0], by_x[1])?;

    let mut by_x = right.points;
    by_x.sort_by(|a, b| b.x.total_cmp(&a.x));
    let right_side = Line::through(by_x[0], by_x[1])?;

    let tl = left_side.intersect(&top)?;
    let tr = top.intersect(&right_side)?;
    let br = right_side.intersect(&bottom)?;
    let bl = bottom.intersect(&left_side)?;
    Some(TargetCorners::new([bl, tl, tr, br]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::CandidateParams;
    use approx::assert_abs_diff_eq;
    use imageproc::point::Point;

    fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> TargetCorners {
        TargetCorners::new([
            Point2::new(x0, y1),
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
        ])
    }

    fn assert_same(a: &TargetCorners, b: &TargetCorners) {
        for (p, q) in a.points.iter().zip(b.points.iter()) {
            assert_abs_diff_eq!(p.x, q.x, epsilon = 1e-3);
            assert_abs_diff_eq!(p.y, q.y, epsilon = 1e-3);
        }
    }

    #[test]
    fn pentagon_candidate_yields_four_ordered_corners() {
        let cand = Candidate::from_points(
            vec![
                Point::new(0, 0),
                Point::new(40, 0),
                Point::new(40, 100),
                Point::new(20, 101),
                Point::new(0, 100),
            ],
            &CandidateParams {
                approx_epsilon_frac: 0.0,
                ..CandidateParams::default()
            },
        );
        let corners = direct_corners(&cand).expect("corners");
        assert_eq!(corners, rect(0.0, 0.0, 40.0, 100.0));
    }

    #[test]
    fn strategies_agree_on_axis_aligned_rectangles() {
        let single = [rect(10.0, 20.0, 30.0, 70.0)];
        let pair = [rect(100.0, 100.0, 140.0, 200.0), rect(265.0, 100.0, 305.0, 200.0)];
        for targets in [&single[..], &pair[..]] {
            let direct = outer_corners(targets, CornerStrategy::Direct).expect("direct");
            let fitted = outer_corners(targets, CornerStrategy::BestFitLines).expect("fit");
            assert_same(&direct, &fitted);
        }
    }

    #[test]
    fn direct_outer_spans_both_strips() {
        let pair = [rect(265.0, 100.0, 305.0, 200.0), rect(100.0, 100.0, 140.0, 200.0)];
        let outer = outer_corners(&pair, CornerStrategy::Direct).expect("outer");
        assert_eq!(outer, rect(100.0, 100.0, 305.0, 200.0));
    }

    #[test]
    fn best_fit_smooths_uneven_tops() {
        let left = TargetCorners::new([
            Point2::new(0.0, 100.0),
            Point2::new(0.0, 0.0),
            Point2::new(40.0, 2.0),
            Point2::new(40.0, 100.0),
        ]);
        let right = TargetCorners::new([
            Point2::new(160.0, 100.0),
            Point2::new(160.0, -2.0),
            Point2::new(200.0, 0.0),
            Point2::new(200.0, 100.0),
        ]);
        let outer = outer_corners(&[left, right], CornerStrategy::BestFitLines).expect("outer");
        assert_abs_diff_eq!(outer.top_left().x, 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(outer.bottom_right().y, 100.0, epsilon = 1e-3);
        assert!(outer.top_left().y.abs() < 1.0);
    }

    #[test]
    fn empty_set_has_no_outer_corners() {
        assert!(outer_corners(&[], CornerStrategy::Direct).is_none());
        assert!(outer_corners(&[], CornerStrategy::BestFitLines).is_none());
    }
}

//! Candidate extraction: mask contours turned into measured polygons.

use image::GrayImage;
use imageproc::contours::find_contours;
use imageproc::geometry::{arc_length, convex_hull};
use imageproc::point::Point;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::polygon::{
    approximate_closed, area, min_area_rect, BoundingRect, Moments, RotatedRect,
    DEGENERATE_CENTROID,
};

/// Parameters of the candidate extractor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateParams {
    /// Polygon approximation tolerance as a fraction of the hull perimeter.
    ///
    /// Looser than the usual 2% so rounded tape corners still collapse to
    /// four vertices.
    pub approx_epsilon_frac: f64,
    /// Hulls with a smaller area are dropped before ranking.
    pub min_area: f64,
}

impl Default for CandidateParams {
    fn default() -> Self {
        Self {
            approx_epsilon_frac: 0.04,
            min_area: 0.0,
        }
    }
}

/// A contour with the features the resolver scores it by.
#[derive(Clone, Debug)]
pub struct Candidate {
    /// Raw boundary as returned by the contour tracer.
    pub contour: Vec<Point<i32>>,
    pub hull: Vec<Point<i32>>,
    pub area: f64,
    pub perimeter: f64,
    pub approx: Vec<Point<i32>>,
    pub bounding_rect: BoundingRect,
    pub min_rect: RotatedRect,
    pub centroid: Option<Point2<f64>>,
}

impl Candidate {
    /// Measure a point sequence. The hull regularizes noisy boundaries and
    /// every scalar feature is taken from it.
    pub fn from_points(contour: Vec<Point<i32>>, params: &CandidateParams) -> Self {
        let hull = if contour.len() < 3 {
            contour.clone()
        } else {
            convex_hull(contour.as_slice())
        };
        let moments = Moments::of(&hull);
        let area = area(&hull);
        let perimeter = if hull.len() < 2 {
            0.0
        } else {
            arc_length(&hull, true)
        };
        let approx = approximate_closed(&hull, params.approx_epsilon_frac * perimeter);
        let bounding_rect = BoundingRect::of(&hull);
        let min_rect = min_area_rect(&hull);

        Self {
            contour,
            hull,
            area,
            perimeter,
            approx,
            bounding_rect,
            min_rect,
            centroid: moments.centroid(),
        }
    }

    /// Width over height of the minimum-area rectangle, `None` if either side is zero.
    pub fn aspect_ratio(&self) -> Option<f64> {
        let (w, h) = (self.min_rect.width, self.min_rect.height);
        if w <= 0.0 || h <= 0.0 {
            return None;
        }
        Some(w / h)
    }

    /// Centroid, or a point far outside any frame for zero-area shapes.
    pub fn centroid_or_sentinel(&self) -> Point2<f64> {
        self.centroid
            .unwrap_or(Point2::new(DEGENERATE_CENTROID[0], DEGENERATE_CENTROID[1]))
    }

    pub fn is_degenerate(&self) -> bool {
        self.centroid.is_none()
    }

    pub fn distance_to(&self, other: &Candidate) -> f64 {
        nalgebra::distance(&self.centroid_or_sentinel(), &other.centroid_or_sentinel())
    }

    /// Convex hull of two candidates' points, measured as a new candidate.
    pub fn merged(&self, other: &Candidate, params: &CandidateParams) -> Candidate {
        let mut points = Vec::with_capacity(self.hull.len() + other.hull.len());
        points.extend_from_slice(&self.hull);
        points.extend_from_slice(&other.hull);
        Candidate::from_points(points, params)
    }
}

/// Measure raw contours and rank them by descending area.
pub fn extract_from_contours(
    contours: impl IntoIterator<Item = Vec<Point<i32>>>,
    params: &CandidateParams,
) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = contours
        .into_iter()
        .filter(|points| !points.is_empty())
        .map(|points| Candidate::from_points(points, params))
        .filter(|c| c.area >= params.min_area)
        .collect();
    candidates.sort_by(|a, b| b.area.total_cmp(&a.area));
    candidates
}

/// Trace every contour of `mask` (hierarchy ignored) and rank them.
///
/// An empty mask yields an empty list.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip(mask, params), fields(width = mask.width(), height = mask.height()))
)]
pub fn extract(mask: &GrayImage, params: &CandidateParams) -> Vec<Candidate> {
    let contours = find_contours::<i32>(mask);
    log::trace!("traced {} contours", contours.len());
    extract_from_contours(contours.into_iter().map(|c| c.points), params)
}

//! Polygon measurements on integer contours.
//!
//! Area and Douglas-Peucker come from `imageproc::geometry`. Centroids and
//! the rotated rectangle are computed here: imageproc has no moments, and
//! its `min_area_rect` snaps corners to the contour's integer type.

use imageproc::geometry::{approximate_polygon_dp, contour_area};
use imageproc::point::Point;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Centroid assigned to zero-area shapes, far outside any frame.
pub const DEGENERATE_CENTROID: [f64; 2] = [-1.0e4, -1.0e4];

/// Axis-aligned bounding rectangle; `width`/`height` are coordinate extents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingRect {
    pub fn of(points: &[Point<i32>]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };
        let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
        for p in points {
            x0 = x0.min(p.x);
            y0 = y0.min(p.y);
            x1 = x1.max(p.x);
            y1 = y1.max(p.y);
        }
        Self {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }
}

/// Minimum-area enclosing rectangle. `width` is measured along `angle`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RotatedRect {
    pub center: [f64; 2],
    pub width: f64,
    pub height: f64,
    /// Direction of the `width` side, radians.
    pub angle: f64,
}

impl RotatedRect {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// First-order moments of a closed polygon (Green's theorem).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl Moments {
    pub fn of(points: &[Point<i32>]) -> Self {
        let (mut m00, mut m10, mut m01) = (0.0, 0.0, 0.0);
        for (p, q) in edges(points) {
            let (x0, y0, x1, y1) = (p.x as f64, p.y as f64, q.x as f64, q.y as f64);
            let cross = x0 * y1 - x1 * y0;
            m00 += cross;
            m10 += (x0 + x1) * cross;
            m01 += (y0 + y1) * cross;
        }
        Self {
            m00: m00 / 2.0,
            m10: m10 / 6.0,
            m01: m01 / 6.0,
        }
    }

    /// Normalized first-order moment; `None` when the polygon has no area.
    pub fn centroid(&self) -> Option<Point2<f64>> {
        if self.m00.abs() < f64::EPSILON {
            return None;
        }
        Some(Point2::new(self.m10 / self.m00, self.m01 / self.m00))
    }
}

fn edges(points: &[Point<i32>]) -> impl Iterator<Item = (Point<i32>, Point<i32>)> + '_ {
    let next = points.iter().cycle().skip(1);
    points.iter().copied().zip(next.copied())
}

/// Unsigned shoelace area.
pub fn area(points: &[Point<i32>]) -> f64 {
    contour_area(points)
}

/// Open-curve Douglas-Peucker; `approximate_polygon_dp` needs three points
/// and a positive tolerance.
fn simplify_open(curve: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    if curve.len() < 3 || epsilon <= 0.0 {
        return curve.to_vec();
    }
    approximate_polygon_dp(curve, epsilon, false)
}

/// Douglas-Peucker simplification of a closed polygon.
///
/// The ring is cut at the first vertex and the vertex farthest from it, and
/// both halves are simplified independently. A non-positive `epsilon`
/// returns the ring unchanged.
pub fn approximate_closed(points: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    if points.len() <= 3 || epsilon <= 0.0 {
        return points.to_vec();
    }
    let start = points[0];
    let far = points
        .iter()
        .enumerate()
        .max_by(|(_, p), (_, q)| {
            let dp = ((p.x - start.x) as f64).hypot((p.y - start.y) as f64);
            let dq = ((q.x - start.x) as f64).hypot((q.y - start.y) as f64);
            dp.total_cmp(&dq)
        })
        .map(|(i, _)| i)
        .unwrap_or(0);
    if far == 0 {
        return vec![start];
    }

    let mut out = simplify_open(&points[..=far], epsilon);
    let mut closing: Vec<Point<i32>> = points[far..].to_vec();
    closing.push(start);
    let back = simplify_open(&closing, epsilon);

    out.pop();
    out.extend_from_slice(&back[..back.len() - 1]);
    out
}

/// Minimum-area rectangle of a convex polygon, checking one orientation per edge.
pub fn min_area_rect(hull: &[Point<i32>]) -> RotatedRect {
    match hull.len() {
        0 => return RotatedRect::default(),
        1 => {
            return RotatedRect {
                center: [hull[0].x as f64, hull[0].y as f64],
                ..RotatedRect::default()
            }
        }
        _ => {}
    }

    let mut best: Option<RotatedRect> = None;
    for (p, q) in edges(hull) {
        let (dx, dy) = ((q.x - p.x) as f64, (q.y - p.y) as f64);
        let len = dx.hypot(dy);
        if len == 0.0 {
            continue;
        }
        let (ux, uy) = (dx / len, dy / len);
        let (mut u0, mut u1, mut v0, mut v1) = (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
        for r in hull {
            let (x, y) = (r.x as f64, r.y as f64);
            let u = x * ux + y * uy;
            let v = -x * uy + y * ux;
            u0 = u0.min(u);
            u1 = u1.max(u);
            v0 = v0.min(v);
            v1 = v1.max(v);
        }
        let rect = RotatedRect {
            center: {
                let (uc, vc) = ((u0 + u1) / 2.0, (v0 + v1) / 2.0);
                [uc * ux - vc * uy, uc * uy + vc * ux]
            },
            width: u1 - u0,
            height: v1 - v0,
            angle: uy.atan2(ux),
        };
        if best.map_or(true, |b| rect.area() < b.area()) {
            best = Some(rect);
        }
    }
    best.unwrap_or_default()
}

/// Drop the vertex contributing the least area until `points.len() <= target`.
pub fn reduce_vertices(points: &[Point<i32>], target: usize) -> Vec<Point<i32>> {
    let mut out = points.to_vec();
    while out.len() > target.max(3) {
        let n = out.len();
        let weakest = (0..n)
            .min_by(|&i, &j| triangle_area(&out, i).total_cmp(&triangle_area(&out, j)))
            .unwrap_or(0);
        out.remove(weakest);
    }
    out
}

fn triangle_area(points: &[Point<i32>], i: usize) -> f64 {
    let n = points.len();
    let a = points[(i + n - 1) % n];
    let b = points[i];
    let c = points[(i + 1) % n];
    area(&[a, b, c])
}

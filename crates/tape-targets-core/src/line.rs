use nalgebra::Point2;
use serde::{Deserialize, Serialize};

const PARALLEL_EPS: f64 = 1e-9;

/// Line in general form `a*x + b*y = c`.
///
/// Unlike slope/intercept this form keeps vertical edges representable,
/// which is the common case for upright tape.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Line {
    /// Least-squares fit of `y = m*x + k` through `points`.
    ///
    /// When every point shares the same `x` the fit degenerates to the
    /// vertical line through them. Returns `None` for fewer than two points.
    pub fn fit(points: &[Point2<f32>]) -> Option<Line> {
        if points.len() < 2 {
            return None;
        }
        let n = points.len() as f64;
        let (mut sx, mut sy, mut sxx, mut sxy) = (0.0, 0.0, 0.0, 0.0);
        for p in points {
            let (x, y) = (p.x as f64, p.y as f64);
            sx += x;
            sy += y;
            sxx += x * x;
            sxy += x * y;
        }
        let denom = n * sxx - sx * sx;
        if denom.abs() <= f64::EPSILON * n * sxx {
            return Some(Line {
                a: 1.0,
                b: 0.0,
                c: sx / n,
            });
        }
        let m = (n * sxy - sx * sy) / denom;
        let k = (sy - m * sx) / n;
        // y = m x + k  <=>  -m x + y = k
        Some(Line { a: -m, b: 1.0, c: k })
    }

    /// Line through two distinct points.
    pub fn through(p: Point2<f32>, q: Point2<f32>) -> Option<Line> {
        let (x1, y1) = (p.x as f64, p.y as f64);
        let (x2, y2) = (q.x as f64, q.y as f64);
        let a = y2 - y1;
        let b = x1 - x2;
        if a == 0.0 && b == 0.0 {
            return None;
        }
        Some(Line {
            a,
            b,
            c: a * x1 + b * y1,
        })
    }

    /// Intersection point, `None` when the lines are (nearly) parallel.
    pub fn intersect(&self, other: &Line) -> Option<Point2<f32>> {
        let det = self.a * other.b - other.a * self.b;
        let scale = (self.a.hypot(self.b) * other.a.hypot(other.b)).max(f64::MIN_POSITIVE);
        if (det / scale).abs() < PARALLEL_EPS {
            return None;
        }
        let x = (self.c * other.b - other.c * self.b) / det;
        let y = (self.a * other.c - other.a * self.c) / det;
        Some(Point2::new(x as f32, y as f32))
    }

    /// Evaluate `y` at `x`; `None` for vertical lines.
    pub fn y_at(&self, x: f64) -> Option<f64> {
        if self.b.abs() < PARALLEL_EPS {
            return None;
        }
        Some((self.c - self.a * x) / self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fit_recovers_exact_line() {
        let pts: Vec<Point2<f32>> = (0..5)
            .map(|i| Point2::new(i as f32 * 10.0, 0.5 * i as f32 * 10.0 + 3.0))
            .collect();
        let l = Line::fit(&pts).expect("fit");
        assert_relative_eq!(l.y_at(100.0).expect("y"), 53.0, epsilon = 1e-9);
    }

    #[test]
    fn fit_of_vertical_points_is_vertical() {
        let pts = [Point2::new(7.0, 0.0), Point2::new(7.0, 9.0), Point2::new(7.0, 4.0)];
        let l = Line::fit(&pts).expect("fit");
        assert!(l.y_at(7.0).is_none());
        let h = Line::through(Point2::new(0.0, 2.0), Point2::new(5.0, 2.0)).expect("line");
        let p = l.intersect(&h).expect("intersection");
        assert_relative_eq!(p.x, 7.0);
        assert_relative_eq!(p.y, 2.0);
    }

    #[test]
    fn parallel_lines_do_not_intersect() {
        let l1 = Line::through(Point2::new(0.0, 0.0), Point2::new(10.0, 5.0)).expect("l1");
        let l2 = Line::through(Point2::new(0.0, 3.0), Point2::new(10.0, 8.0)).expect("l2");
        assert!(l1.intersect(&l2).is_none());
    }

    #[test]
    fn degenerate_inputs_yield_none() {
        assert!(Line::fit(&[Point2::new(1.0, 1.0)]).is_none());
        assert!(Line::through(Point2::new(3.0, 3.0), Point2::new(3.0, 3.0)).is_none());
    }
}

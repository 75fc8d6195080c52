use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounds of a point set, `min` is the top-left in image coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point2<f32>,
    pub max: Point2<f32>,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Strict intersection test; bounds that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// Four corners of one piece of tape.
///
/// Points are stored as bottom-left, top-left, top-right, bottom-right with
/// image `y` growing downward. Every producer in the workspace emits this
/// winding so left/right detections can be paired positionally.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetCorners {
    pub points: [Point2<f32>; 4],
}

impl TargetCorners {
    pub const BOTTOM_LEFT: usize = 0;
    pub const TOP_LEFT: usize = 1;
    pub const TOP_RIGHT: usize = 2;
    pub const BOTTOM_RIGHT: usize = 3;

    /// Wrap points that are already in BL, TL, TR, BR order.
    pub fn new(points: [Point2<f32>; 4]) -> Self {
        Self { points }
    }

    /// Order an arbitrary quadrilateral into the canonical winding.
    ///
    /// The two smallest `y` values form the top edge, the rest the bottom
    /// edge; each edge is then split by `x`.
    pub fn from_unordered(mut points: [Point2<f32>; 4]) -> Self {
        points.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
        let (tl, tr) = order_by_x(points[0], points[1]);
        let (bl, br) = order_by_x(points[2], points[3]);
        Self::new([bl, tl, tr, br])
    }

    #[inline]
    pub fn bottom_left(&self) -> Point2<f32> {
        self.points[Self::BOTTOM_LEFT]
    }

    #[inline]
    pub fn top_left(&self) -> Point2<f32> {
        self.points[Self::TOP_LEFT]
    }

    #[inline]
    pub fn top_right(&self) -> Point2<f32> {
        self.points[Self::TOP_RIGHT]
    }

    #[inline]
    pub fn bottom_right(&self) -> Point2<f32> {
        self.points[Self::BOTTOM_RIGHT]
    }

    pub fn bounds(&self) -> Bounds {
        let mut min = self.points[0];
        let mut max = self.points[0];
        for p in &self.points[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Bounds { min, max }
    }

    pub fn min_x(&self) -> f32 {
        self.bounds().min.x
    }

    pub fn center(&self) -> Point2<f32> {
        let mut sx = 0.0;
        let mut sy = 0.0;
        for p in &self.points {
            sx += p.x;
            sy += p.y;
        }
        Point2::new(sx / 4.0, sy / 4.0)
    }

    pub fn overlaps(&self, other: &TargetCorners) -> bool {
        self.bounds().overlaps(&other.bounds())
    }

    /// Points as `[x, y]` pairs, the shape used on the wire.
    pub fn to_pairs(&self) -> [[f32; 2]; 4] {
        self.points.map(|p| [p.x, p.y])
    }
}

fn order_by_x(a: Point2<f32>, b: Point2<f32>) -> (Point2<f32>, Point2<f32>) {
    if a.x <= b.x {
        (a, b)
    } else {
        (b, a)
    }
}

//! Shapes tested against the field border and zones

use super::segment::point_segment_distance;
use super::{Point, Polygon};

/// Footprint of a robot position or movement
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Point(Point),
    Disc { center: Point, radius: f32 },
    /// Polyline swept by a disc of `half_width`
    Corridor { path: Vec<Point>, half_width: f32 },
}

impl Shape {
    pub fn disc(center: Point, radius: f32) -> Self {
        Shape::Disc { center, radius }
    }

    pub fn corridor(path: Vec<Point>, half_width: f32) -> Self {
        Shape::Corridor { path, half_width }
    }

    /// How far the shape stays from the polygon boundary
    ///
    /// Positive when the shape is entirely inside, negative by roughly the
    /// depth it sticks out. An empty corridor has no clearance at all.
    pub fn clearance_in(&self, polygon: &Polygon) -> f32 {
        match self {
            Shape::Point(p) => polygon.signed_distance(*p),
            Shape::Disc { center, radius } => polygon.signed_distance(*center) - radius,
            Shape::Corridor { path, half_width } => match path.as_slice() {
                [] => f32::NEG_INFINITY,
                [single] => polygon.signed_distance(*single) - half_width,
                _ => {
                    path.windows(2)
                        .map(|w| polygon.segment_clearance(w[0], w[1]))
                        .fold(f32::INFINITY, f32::min)
                        - half_width
                }
            },
        }
    }

    /// Whether the shape shares any point with the polygon
    pub fn intersects(&self, polygon: &Polygon) -> bool {
        match self {
            Shape::Point(p) => polygon.contains_point(*p),
            Shape::Disc { center, radius } => polygon.signed_distance(*center) >= -radius,
            Shape::Corridor { path, half_width } => match path.as_slice() {
                [] => false,
                [single] => polygon.signed_distance(*single) >= -half_width,
                _ => path.windows(2).any(|w| {
                    polygon.contains_point(w[0])
                        || polygon.boundary_distance_to_segment(w[0], w[1]) <= *half_width
                }),
            },
        }
    }

    /// Distance from the shape's outline to `p`, zero when `p` is covered
    pub fn distance_to(&self, p: Point) -> f32 {
        let raw = match self {
            Shape::Point(q) => q.distance(p),
            Shape::Disc { center, radius } => center.distance(p) - radius,
            Shape::Corridor { path, half_width } => match path.as_slice() {
                [] => f32::INFINITY,
                [single] => single.distance(p) - half_width,
                _ => {
                    path.windows(2)
                        .map(|w| point_segment_distance(p, w[0], w[1]))
                        .fold(f32::INFINITY, f32::min)
                        - half_width
                }
            },
        };
        raw.max(0.0)
    }
}

//! Simple polygons with pre-computed bounds and orientation
//!
//! Vertices are stored counter-clockwise, so the interior always lies to
//! the left of each edge and inward normals need no per-query sign check.

use super::segment::{closest_point_on_segment, point_segment_distance, segment_segment_distance};
use super::Point;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Geometry construction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GeometryError {
    /// Fewer than three vertices
    TooFewVertices,
    /// A coordinate is NaN or infinite
    NonFinite,
    /// Vertices enclose no area
    ZeroArea,
}

/// A closed simple polygon
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<Point>", into = "Vec<Point>"))]
pub struct Polygon {
    vertices: Vec<Point>,
    min: Point,
    max: Point,
    centroid: Point,
}

fn signed_area(vertices: &[Point]) -> f32 {
    edges(vertices).map(|(a, b)| a.cross(b)).sum::<f32>() / 2.0
}

fn edges(vertices: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    vertices
        .iter()
        .zip(vertices.iter().cycle().skip(1))
        .map(|(&a, &b)| (a, b))
}

impl Polygon {
    /// Build a polygon from its vertices in either winding order
    pub fn new(mut vertices: Vec<Point>) -> Result<Self, GeometryError> {
        if vertices.len() < 3 {
            return Err(GeometryError::TooFewVertices);
        }
        if !vertices.iter().all(|v| v.is_finite()) {
            return Err(GeometryError::NonFinite);
        }

        let area = signed_area(&vertices);
        if area.abs() <= f32::EPSILON {
            return Err(GeometryError::ZeroArea);
        }
        if area < 0.0 {
            vertices.reverse();
        }
        let area = area.abs();

        let mut min = vertices[0];
        let mut max = vertices[0];
        let mut cx = 0.0;
        let mut cy = 0.0;
        for (a, b) in edges(&vertices) {
            min = Point::new(min.x.min(a.x), min.y.min(a.y));
            max = Point::new(max.x.max(a.x), max.y.max(a.y));
            let cross = a.cross(b);
            cx += (a.x + b.x) * cross;
            cy += (a.y + b.y) * cross;
        }
        let centroid = Point::new(cx / (6.0 * area), cy / (6.0 * area));

        Ok(Self {
            vertices,
            min,
            max,
            centroid,
        })
    }

    /// Axis-aligned rectangle spanning two opposite corners
    pub fn rectangle(a: Point, b: Point) -> Result<Self, GeometryError> {
        Self::new(vec![
            Point::new(a.x, a.y),
            Point::new(b.x, a.y),
            Point::new(b.x, b.y),
            Point::new(a.x, b.y),
        ])
    }

    /// Vertices in counter-clockwise order
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn centroid(&self) -> Point {
        self.centroid
    }

    pub fn area(&self) -> f32 {
        signed_area(&self.vertices)
    }

    /// Bounding box as (min, max) corners
    pub fn bounds(&self) -> (Point, Point) {
        (self.min, self.max)
    }

    /// Edges as (start, end) pairs
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        edges(&self.vertices)
    }

    /// Even-odd containment test, boundary points may fall either way
    pub fn contains_point(&self, p: Point) -> bool {
        if p.x < self.min.x || p.x > self.max.x || p.y < self.min.y || p.y > self.max.y {
            return false;
        }

        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Closest boundary point and the index of the edge it lies on
    pub fn nearest_boundary(&self, p: Point) -> (Point, usize) {
        let mut best = (self.vertices[0], 0);
        let mut best_dist = f32::INFINITY;
        for (index, (a, b)) in self.edges().enumerate() {
            let candidate = closest_point_on_segment(p, a, b);
            let dist = p.distance(candidate);
            if dist < best_dist {
                best_dist = dist;
                best = (candidate, index);
            }
        }
        best
    }

    /// Distance to the boundary, positive inside and negative outside
    pub fn signed_distance(&self, p: Point) -> f32 {
        let dist = self
            .edges()
            .map(|(a, b)| point_segment_distance(p, a, b))
            .fold(f32::INFINITY, f32::min);
        if self.contains_point(p) {
            dist
        } else {
            -dist
        }
    }

    /// Unit normal of edge `index` pointing into the polygon
    pub fn inward_normal(&self, index: usize) -> Point {
        let a = self.vertices[index % self.vertices.len()];
        let b = self.vertices[(index + 1) % self.vertices.len()];
        let d = b - a;
        Point::new(-d.y, d.x).normalized().unwrap_or_default()
    }

    /// Minimum distance from the segment `a`-`b` to the boundary
    pub fn boundary_distance_to_segment(&self, a: Point, b: Point) -> f32 {
        self.edges()
            .map(|(c, d)| segment_segment_distance(a, b, c, d))
            .fold(f32::INFINITY, f32::min)
    }

    /// Signed clearance of the segment `a`-`b`
    ///
    /// Positive when the whole segment is inside, equal to its distance
    /// to the boundary. A segment that touches or crosses the boundary
    /// with both ends inside has zero clearance.
    pub fn segment_clearance(&self, a: Point, b: Point) -> f32 {
        let sa = self.signed_distance(a);
        let sb = self.signed_distance(b);
        if sa < 0.0 || sb < 0.0 {
            return sa.min(sb);
        }
        self.boundary_distance_to_segment(a, b)
    }
}

impl TryFrom<Vec<Point>> for Polygon {
    type Error = GeometryError;

    fn try_from(vertices: Vec<Point>) -> Result<Self, Self::Error> {
        Self::new(vertices)
    }
}

impl From<Polygon> for Vec<Point> {
    fn from(polygon: Polygon) -> Self {
        polygon.vertices
    }
}

impl core::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::TooFewVertices => write!(f, "polygon needs at least three vertices"),
            Self::NonFinite => write!(f, "polygon vertex is not finite"),
            Self::ZeroArea => write!(f, "polygon encloses no area"),
        }
    }
}

impl std::error::Error for GeometryError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> Polygon {
        Polygon::rectangle(Point::new(0.0, 0.0), Point::new(200.0, 300.0)).unwrap()
    }

    #[test]
    fn test_rejects_degenerate() {
        assert_eq!(
            Polygon::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]),
            Err(GeometryError::TooFewVertices)
        );
        assert_eq!(
            Polygon::new(vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 1.0),
                Point::new(2.0, 2.0)
            ]),
            Err(GeometryError::ZeroArea)
        );
        assert_eq!(
            Polygon::new(vec![
                Point::new(0.0, 0.0),
                Point::new(f32::NAN, 1.0),
                Point::new(2.0, 0.0)
            ]),
            Err(GeometryError::NonFinite)
        );
    }

    #[test]
    fn test_clockwise_input_is_normalized() {
        let cw = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 0.0),
        ])
        .unwrap();
        assert!(cw.area() > 0.0);
        // Bottom edge normal points up into the square
        let bottom = cw
            .edges()
            .position(|(a, b)| a.y == 0.0 && b.y == 0.0)
            .unwrap();
        assert_eq!(cw.inward_normal(bottom), Point::new(0.0, 1.0));
    }

    #[test]
    fn test_centroid_of_rectangle() {
        assert_eq!(field().centroid(), Point::new(100.0, 150.0));
    }

    #[test]
    fn test_centroid_of_l_shape() {
        let l = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(20.0, 0.0),
            Point::new(20.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 20.0),
            Point::new(0.0, 20.0),
        ])
        .unwrap();
        let c = l.centroid();
        assert!((c.x - 25.0 / 3.0).abs() < 1e-4);
        assert!((c.y - 25.0 / 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_signed_distance() {
        let f = field();
        assert_eq!(f.signed_distance(Point::new(10.0, 150.0)), 10.0);
        assert_eq!(f.signed_distance(Point::new(-5.0, 150.0)), -5.0);
        assert!(f.contains_point(Point::new(100.0, 100.0)));
        assert!(!f.contains_point(Point::new(250.0, 100.0)));
    }

    #[test]
    fn test_nearest_boundary() {
        let f = field();
        let (point, edge) = f.nearest_boundary(Point::new(190.0, 150.0));
        assert_eq!(point, Point::new(200.0, 150.0));
        assert_eq!(f.inward_normal(edge), Point::new(-1.0, 0.0));
    }

    #[test]
    fn test_segment_clearance() {
        let f = field();
        let inside = f.segment_clearance(Point::new(20.0, 50.0), Point::new(100.0, 50.0));
        assert_eq!(inside, 20.0);

        let leaving = f.segment_clearance(Point::new(20.0, 50.0), Point::new(-10.0, 50.0));
        assert_eq!(leaving, -10.0);
    }
}

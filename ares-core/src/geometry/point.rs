//! Points, poses and angle helpers in arena coordinates
//!
//! [`Point`] and [`Pose`] are plain serializable values; the vector maths
//! behind them runs on `nalgebra`.

use core::f32::consts::{PI, TAU};
use core::ops::{Add, Neg, Sub};

use nalgebra::{Isometry2, Point2, UnitComplex, Vector2};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A position on the field
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn vector(self) -> Vector2<f32> {
        Vector2::new(self.x, self.y)
    }

    /// Length of this point seen as a vector
    pub fn norm(self) -> f32 {
        self.vector().norm()
    }

    pub fn distance(self, other: Point) -> f32 {
        (self - other).norm()
    }

    pub fn dot(self, other: Point) -> f32 {
        self.vector().dot(&other.vector())
    }

    /// Z component of the 3D cross product
    pub fn cross(self, other: Point) -> f32 {
        self.vector().perp(&other.vector())
    }

    pub fn scale(self, factor: f32) -> Point {
        (self.vector() * factor).into()
    }

    /// Rotate counter-clockwise around the origin
    pub fn rotate(self, angle: f32) -> Point {
        (UnitComplex::new(angle) * self.vector()).into()
    }

    /// Unit vector in the same direction, `None` for the zero vector
    pub fn normalized(self) -> Option<Point> {
        self.vector().try_normalize(f32::EPSILON).map(Point::from)
    }

    /// Direction of this vector in radians
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    pub fn midpoint(self, other: Point) -> Point {
        nalgebra::center(&Point2::from(self), &Point2::from(other)).into()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<Vector2<f32>> for Point {
    fn from(v: Vector2<f32>) -> Self {
        Point::new(v.x, v.y)
    }
}

impl From<Point2<f32>> for Point {
    fn from(p: Point2<f32>) -> Self {
        Point::new(p.x, p.y)
    }
}

impl From<Point> for Point2<f32> {
    fn from(p: Point) -> Self {
        Point2::new(p.x, p.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        (self.vector() + rhs.vector()).into()
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        (self.vector() - rhs.vector()).into()
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        (-self.vector()).into()
    }
}

/// Robot position and orientation in arena coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pose {
    pub x: f32,
    pub y: f32,
    /// Heading in radians, counter-clockwise from the x axis
    pub heading: f32,
}

impl Pose {
    pub const fn new(x: f32, y: f32, heading: f32) -> Self {
        Self { x, y, heading }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Rigid transform from the robot frame to arena coordinates
    pub fn isometry(&self) -> Isometry2<f32> {
        Isometry2::new(Vector2::new(self.x, self.y), self.heading)
    }

    /// Convert a point expressed in the robot frame to arena coordinates
    pub fn to_absolute(&self, relative: Point) -> Point {
        self.isometry().transform_point(&Point2::from(relative)).into()
    }

    /// Point at `distance` along `relative_angle` from the robot heading
    pub fn project_polar(&self, relative_angle: f32, distance: f32) -> Point {
        let ray = UnitComplex::new(self.heading + relative_angle) * Vector2::new(distance, 0.0);
        self.position() + Point::from(ray)
    }

    /// Bearing of `target` relative to the heading, in (-π, π]
    pub fn bearing_to(&self, target: Point) -> f32 {
        normalize_angle((target - self.position()).angle() - self.heading)
    }

    pub fn distance_to(&self, target: Point) -> f32 {
        self.position().distance(target)
    }
}

/// Wrap an angle into (-π, π]
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle % TAU;
    if wrapped > PI {
        wrapped - TAU
    } else if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Centre of the circle through three points, `None` when they are collinear
pub fn circumcenter(a: Point, b: Point, c: Point) -> Option<Point> {
    // Work relative to `a` to keep the products small
    let b = b - a;
    let c = c - a;
    let d = 2.0 * b.cross(c);
    if d.abs() <= f32::EPSILON {
        return None;
    }
    let b_sq = b.dot(b);
    let c_sq = c.dot(c);
    let ux = (c.y * b_sq - b.y * c_sq) / d;
    let uy = (b.x * c_sq - c.x * b_sq) / d;
    Some(a + Point::new(ux, uy))
}

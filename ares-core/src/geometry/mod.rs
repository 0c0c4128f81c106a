//! Planar geometry for the playing field
//!
//! Coordinates are in the arena frame; headings are radians measured
//! counter-clockwise from the x axis.

mod point;
mod polygon;
mod segment;
mod shape;

pub use point::{circumcenter, normalize_angle, Point, Pose};
pub use polygon::{GeometryError, Polygon};
pub use segment::{
    closest_point_on_segment, point_segment_distance, segment_segment_distance, segments_intersect,
};
pub use shape::Shape;

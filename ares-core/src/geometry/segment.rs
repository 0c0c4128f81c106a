//! Segment primitives shared by polygon and corridor queries

use super::Point;

/// Closest point to `p` on the segment `a`-`b`
pub fn closest_point_on_segment(p: Point, a: Point, b: Point) -> Point {
    let ab = b - a;
    let len_sq = ab.dot(ab);
    if len_sq <= f32::EPSILON {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab.scale(t)
}

pub fn point_segment_distance(p: Point, a: Point, b: Point) -> f32 {
    p.distance(closest_point_on_segment(p, a, b))
}

fn orientation(a: Point, b: Point, c: Point) -> f32 {
    (b - a).cross(c - a)
}

fn on_segment(p: Point, a: Point, b: Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Whether segments `a`-`b` and `c`-`d` share at least one point
pub fn segments_intersect(a: Point, b: Point, c: Point, d: Point) -> bool {
    let o1 = orientation(a, b, c);
    let o2 = orientation(a, b, d);
    let o3 = orientation(c, d, a);
    let o4 = orientation(c, d, b);

    if o1 * o2 < 0.0 && o3 * o4 < 0.0 {
        return true;
    }

    // Collinear and touching cases
    (o1 == 0.0 && on_segment(c, a, b))
        || (o2 == 0.0 && on_segment(d, a, b))
        || (o3 == 0.0 && on_segment(a, c, d))
        || (o4 == 0.0 && on_segment(b, c, d))
}

/// Minimum distance between two segments, zero when they intersect
pub fn segment_segment_distance(a: Point, b: Point, c: Point, d: Point) -> f32 {
    if segments_intersect(a, b, c, d) {
        return 0.0;
    }
    point_segment_distance(a, c, d)
        .min(point_segment_distance(b, c, d))
        .min(point_segment_distance(c, a, b))
        .min(point_segment_distance(d, a, b))
}

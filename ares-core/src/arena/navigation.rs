//! Approach points, path legality and objective ranking

use super::model::Arena;
use super::zone::{Zone, ZoneRole};
use crate::geometry::{Point, Polygon, Shape};

/// Extra distance added when pushing a target off the border
pub const NUDGE_MARGIN: f32 = 0.1;

/// Restrictions applied when ranking zones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ZoneFilter {
    /// Skip zones owned by the other side
    pub friendly_only: bool,
    /// Skip empty pickup zones and full drop zones
    pub skip_depleted: bool,
}

impl ZoneFilter {
    fn accepts(&self, zone: &Zone) -> bool {
        (!self.friendly_only || zone.is_friendly()) && (!self.skip_depleted || !zone.is_depleted())
    }
}

impl Arena {
    /// Advisory check that the robot can follow `path`
    ///
    /// The path is swept by the robot half-width. The sweep must stay inside
    /// the border and clear every forbidden zone and the believed opponent
    /// footprint. Checked once when the move is committed.
    pub fn enable_go_on_path(&self, path: &[Point]) -> bool {
        if path.is_empty() {
            return false;
        }

        let sweep = Shape::corridor(path.to_vec(), self.robot_buffer);
        if !self.contains(&sweep, false) {
            return false;
        }

        if self
            .zones_with_role(ZoneRole::Forbidden)
            .any(|zone| sweep.intersects(zone.polygon()))
        {
            return false;
        }

        match self.opponent {
            Some(opponent) => sweep.distance_to(opponent) > self.robot_buffer,
            None => true,
        }
    }

    /// Straight-line form of [`enable_go_on_path`](Self::enable_go_on_path)
    pub fn enable_go_to_point(&self, start: Point, target: Point) -> bool {
        self.enable_go_on_path(&[start, target])
    }

    /// Target point for approaching `zone` from `start`
    ///
    /// With `delta == 0` this is the zone centroid, pushed away from the
    /// border when the robot would not fit there. Otherwise it is the point
    /// on the line from `start` through the centroid at distance `|delta|`
    /// from the centroid: before it for positive `delta`, past it for
    /// negative `delta`. Returns `None` when `start` is already within
    /// `|delta|` of the centroid.
    pub fn compute_go_to_destination(
        &self,
        start: Point,
        zone: &Polygon,
        delta: f32,
    ) -> Option<Point> {
        let center = zone.centroid();

        if delta == 0.0 {
            return Some(self.nudge_inside(center));
        }

        let radius = delta.abs();
        let to_center = center - start;
        let distance = to_center.norm();
        if distance <= radius {
            return None;
        }

        // The line passes through the circle centre, so the two
        // intersections sit at distance ∓ radius along it
        let along = if delta > 0.0 {
            distance - radius
        } else {
            distance + radius
        };
        Some(Point::new(
            start.x + to_center.x * along / distance,
            start.y + to_center.y * along / distance,
        ))
    }

    /// Approach point for a zone looked up by name
    pub fn approach_zone(
        &self,
        start: Point,
        name: &str,
        delta: f32,
    ) -> Result<Option<Point>, super::ArenaError> {
        let zone = self.require_zone(name)?;
        Ok(self.compute_go_to_destination(start, zone.polygon(), delta))
    }

    /// Move `p` along the nearest edge normal until the robot fits
    fn nudge_inside(&self, mut p: Point) -> Point {
        // Two pushes cover a corner: one per adjacent edge
        for _ in 0..2 {
            if self.valid_position(p) {
                break;
            }
            let (_, edge) = self.border.nearest_boundary(p);
            let shortfall = self.robot_buffer - self.border.signed_distance(p) + NUDGE_MARGIN;
            p = p + self.border.inward_normal(edge).scale(shortfall);
        }
        p
    }

    /// Pickup zones ordered nearest first
    pub fn sort_pickup_zone(&self, from: Point, filter: ZoneFilter) -> Vec<&Zone> {
        self.rank(ZoneRole::Pickup, from, filter)
    }

    /// Drop zones ordered nearest first
    pub fn sort_drop_zone(&self, from: Point, filter: ZoneFilter) -> Vec<&Zone> {
        self.rank(ZoneRole::Drop, from, filter)
    }

    fn rank(&self, role: ZoneRole, from: Point, filter: ZoneFilter) -> Vec<&Zone> {
        let mut zones: Vec<&Zone> = self
            .zones_with_role(role)
            .filter(|zone| filter.accepts(zone))
            .collect();
        zones.sort_by(|a, b| {
            from.distance(a.centroid())
                .total_cmp(&from.distance(b.centroid()))
        });
        zones
    }
}

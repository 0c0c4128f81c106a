//! Field model: border, buffers, zones and the opponent belief

use super::zone::{Zone, ZoneRole};
use super::Team;
use crate::config::ArenaConfig;
use crate::geometry::{GeometryError, Point, Polygon, Shape};

/// Inset used when checking a robot position against the border
pub const POSITION_EPSILON: f32 = 0.01;

/// Arena construction and lookup errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArenaError {
    /// No zone with this name
    UnknownZone(String),
    /// Two zones share a name
    DuplicateZone(String),
    /// Border polygon is invalid
    InvalidBorder(GeometryError),
    /// Zone polygon is invalid
    InvalidZone { name: String, error: GeometryError },
    /// Buffer distance is negative or not finite
    InvalidBuffer,
}

impl core::fmt::Display for ArenaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownZone(name) => write!(f, "unknown zone '{}'", name),
            Self::DuplicateZone(name) => write!(f, "zone '{}' is defined twice", name),
            Self::InvalidBorder(e) => write!(f, "invalid border: {}", e),
            Self::InvalidZone { name, error } => write!(f, "invalid zone '{}': {}", name, error),
            Self::InvalidBuffer => write!(f, "buffer distances must be finite and non-negative"),
        }
    }
}

impl std::error::Error for ArenaError {}

/// Geometric model of the playing field
///
/// The border polygon is indexed once at construction (orientation,
/// bounds, centroid) and shared by every containment query.
#[derive(Debug, Clone)]
pub struct Arena {
    pub(super) border: Polygon,
    /// Outward growth of the buffered border
    pub(super) border_buffer: f32,
    /// Robot half-width
    pub(super) robot_buffer: f32,
    pub(super) zones: Vec<Zone>,
    pub(super) opponent: Option<Point>,
}

impl Arena {
    /// Build the field for one side of a match
    pub fn new(config: &ArenaConfig, team: Team) -> Result<Self, ArenaError> {
        let border = Polygon::new(config.border.clone()).map_err(ArenaError::InvalidBorder)?;

        let mut zones = Vec::with_capacity(config.zones.len());
        for zone in &config.zones {
            let polygon = Polygon::new(zone.vertices.clone()).map_err(|error| {
                ArenaError::InvalidZone {
                    name: zone.name.clone(),
                    error,
                }
            })?;
            zones.push(
                Zone::new(zone.name.clone(), zone.role, polygon)
                    .with_resources(zone.resources, zone.capacity)
                    .with_team(zone.team),
            );
        }

        let mut arena =
            Self::from_parts(border, config.border_buffer, config.robot_buffer, zones)?;
        arena.assign_side(team);
        Ok(arena)
    }

    /// Build a field from already constructed geometry
    pub fn from_parts(
        border: Polygon,
        border_buffer: f32,
        robot_buffer: f32,
        zones: Vec<Zone>,
    ) -> Result<Self, ArenaError> {
        for buffer in [border_buffer, robot_buffer] {
            if !(buffer.is_finite() && buffer >= 0.0) {
                return Err(ArenaError::InvalidBuffer);
            }
        }
        for (i, zone) in zones.iter().enumerate() {
            if zones[..i].iter().any(|other| other.name() == zone.name()) {
                return Err(ArenaError::DuplicateZone(zone.name().into()));
            }
        }

        Ok(Self {
            border,
            border_buffer,
            robot_buffer,
            zones,
            opponent: None,
        })
    }

    /// Mark zones friendly when they belong to `team` or to nobody
    pub fn assign_side(&mut self, team: Team) {
        for zone in &mut self.zones {
            zone.assign_side(team);
        }
    }

    pub fn border(&self) -> &Polygon {
        &self.border
    }

    pub fn border_buffer(&self) -> f32 {
        self.border_buffer
    }

    pub fn robot_buffer(&self) -> f32 {
        self.robot_buffer
    }

    /// Whether `shape` lies entirely inside the border
    ///
    /// With `buffered` the border is first grown by the border buffer, so
    /// shapes poking up to that far past a wall still count as inside.
    pub fn contains(&self, shape: &Shape, buffered: bool) -> bool {
        let margin = if buffered { self.border_buffer } else { 0.0 };
        shape.clearance_in(&self.border) + margin >= 0.0
    }

    /// Whether a point lies within `border_buffer` of the field or inside it
    pub fn in_buffered_border(&self, p: Point) -> bool {
        self.border.signed_distance(p) + self.border_buffer >= 0.0
    }

    /// Whether the robot footprint at `p` fits inside the border
    pub fn valid_position(&self, p: Point) -> bool {
        self.border.signed_distance(p) - self.robot_buffer >= POSITION_EPSILON
    }

    /// Keep only points inside the buffered border
    pub fn remove_outside(&self, points: impl IntoIterator<Item = Point>) -> Vec<Point> {
        points
            .into_iter()
            .filter(|&p| self.in_buffered_border(p))
            .collect()
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn zone(&self, name: &str) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.name() == name)
    }

    pub fn zone_mut(&mut self, name: &str) -> Option<&mut Zone> {
        self.zones.iter_mut().find(|zone| zone.name() == name)
    }

    /// Zone by name, failing for unknown names
    pub fn require_zone(&self, name: &str) -> Result<&Zone, ArenaError> {
        self.zone(name)
            .ok_or_else(|| ArenaError::UnknownZone(name.into()))
    }

    /// Whether `shape` touches the named zone
    pub fn zone_intersects(&self, name: &str, shape: &Shape) -> Result<bool, ArenaError> {
        Ok(shape.intersects(self.require_zone(name)?.polygon()))
    }

    /// Zones with a given role
    pub fn zones_with_role(&self, role: ZoneRole) -> impl Iterator<Item = &Zone> {
        self.zones.iter().filter(move |zone| zone.role() == role)
    }

    /// Believed opponent position
    pub fn opponent(&self) -> Option<Point> {
        self.opponent
    }

    pub fn set_opponent(&mut self, opponent: Option<Point>) {
        self.opponent = opponent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ZoneConfig;

    fn arena() -> Arena {
        let config = ArenaConfig {
            zones: vec![ZoneConfig {
                name: "nest".into(),
                role: ZoneRole::Drop,
                vertices: vec![
                    Point::new(0.0, 0.0),
                    Point::new(40.0, 0.0),
                    Point::new(40.0, 40.0),
                    Point::new(0.0, 40.0),
                ],
                resources: 0,
                capacity: 6,
                team: Some(Team::Yellow),
            }],
            ..ArenaConfig::default()
        };
        Arena::new(&config, Team::Blue).unwrap()
    }

    #[test]
    fn test_contains_respects_buffer() {
        let arena = arena();
        let past_wall = Shape::Point(Point::new(-5.0, 150.0));
        let far_out = Shape::Point(Point::new(-15.0, 150.0));

        assert!(!arena.contains(&past_wall, false));
        assert!(arena.contains(&past_wall, true));
        assert!(!arena.contains(&far_out, true));
        assert!(arena.contains(&Shape::Point(Point::new(5.0, 150.0)), false));
        assert!(!arena.contains(
            &Shape::Disc {
                center: Point::new(5.0, 150.0),
                radius: 20.0
            },
            true
        ));
    }

    #[test]
    fn test_valid_position_uses_robot_buffer() {
        let arena = arena();
        assert!(arena.valid_position(Point::new(100.0, 150.0)));
        assert!(arena.valid_position(Point::new(15.5, 150.0)));
        assert!(!arena.valid_position(Point::new(15.0, 150.0)));
        assert!(!arena.valid_position(Point::new(5.0, 150.0)));
    }

    #[test]
    fn test_remove_outside() {
        let arena = arena();
        let kept = arena.remove_outside([
            Point::new(100.0, 100.0),
            Point::new(2.0, 100.0),
            Point::new(-8.0, 100.0),
            Point::new(-50.0, 100.0),
            Point::new(100.0, 311.0),
        ]);
        assert_eq!(
            kept,
            vec![
                Point::new(100.0, 100.0),
                Point::new(2.0, 100.0),
                Point::new(-8.0, 100.0)
            ]
        );
    }

    #[test]
    fn test_zone_lookup_and_side() {
        let mut arena = arena();
        assert!(!arena.zone("nest").unwrap().is_friendly());
        assert_eq!(
            arena.zone_intersects("missing", &Shape::Point(Point::new(1.0, 1.0))),
            Err(ArenaError::UnknownZone("missing".into()))
        );
        assert_eq!(
            arena.zone_intersects("nest", &Shape::Point(Point::new(20.0, 20.0))),
            Ok(true)
        );

        arena.zone_mut("nest").unwrap().drop_resources(2);
        assert_eq!(arena.zone("nest").unwrap().resources(), 2);

        arena.assign_side(Team::Yellow);
        assert!(arena.zone("nest").unwrap().is_friendly());
    }

    #[test]
    fn test_rejects_negative_buffer() {
        let config = ArenaConfig {
            robot_buffer: -1.0,
            ..ArenaConfig::default()
        };
        assert_eq!(Arena::new(&config, Team::Blue).unwrap_err(), ArenaError::InvalidBuffer);
    }
}

//! Obstacle belief and trigger evaluation

use core::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use super::recovery::RecoveryPolicy;
use crate::arena::Arena;
use crate::geometry::{Point, Pose};
use crate::traits::LidarSample;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Shape of the region that triggers a stop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DetectionMode {
    /// Never trigger
    Disabled,
    /// Any direction
    #[default]
    Circular,
    /// Narrow cone ahead
    Frontal,
    /// Wide cone ahead
    SemiCircular,
}

/// Anti-collision settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AntiCollisionConfig {
    pub mode: DetectionMode,
    /// Obstacles closer than this trigger a stop
    pub stop_distance: f32,
    /// Returns at or below this range are sensor noise
    pub min_distance: f32,
    /// Half-angle of the frontal cone (radians)
    pub frontal_half_angle: f32,
    /// Half-angle of the semicircular cone (radians)
    pub semicircular_half_angle: f32,
    /// Scan cycle period (ms)
    pub scan_period_ms: u32,
    pub recovery: RecoveryPolicy,
}

impl Default for AntiCollisionConfig {
    fn default() -> Self {
        Self {
            mode: DetectionMode::Circular,
            stop_distance: 30.0,
            min_distance: 5.0,
            frontal_half_angle: FRAC_PI_4,
            semicircular_half_angle: FRAC_PI_2,
            scan_period_ms: 100,
            recovery: RecoveryPolicy::default(),
        }
    }
}

/// Result of one trigger evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AcsStatus {
    Clear,
    Triggered {
        obstacle: Point,
        distance: f32,
        /// Bearing relative to heading, in (-π, π]
        bearing: f32,
    },
}

impl AcsStatus {
    pub fn is_triggered(&self) -> bool {
        matches!(self, Self::Triggered { .. })
    }
}

/// Anti-collision engine
#[derive(Debug, Clone)]
pub struct AntiCollision {
    config: AntiCollisionConfig,
}

impl AntiCollision {
    pub fn new(config: AntiCollisionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AntiCollisionConfig {
        &self.config
    }

    pub fn set_mode(&mut self, mode: DetectionMode) {
        self.config.mode = mode;
    }

    /// Nearest lidar return inside the buffered border
    ///
    /// Samples with non-finite angle or range, or a range at or below the
    /// noise floor, are ignored before projection.
    pub fn locate_opponent(
        &self,
        pose: &Pose,
        samples: &[LidarSample],
        arena: &Arena,
    ) -> Option<Point> {
        samples
            .iter()
            .filter(|s| {
                s.angle.is_finite()
                    && s.distance.is_finite()
                    && s.distance > 0.0
                    && s.distance > self.config.min_distance
            })
            .map(|s| (pose.project_polar(s.angle, s.distance), s.distance))
            .filter(|&(point, _)| arena.in_buffered_border(point))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(point, _)| point)
    }

    /// Decide whether the believed obstacle requires a stop
    pub fn evaluate(&self, pose: &Pose, opponent: Option<Point>) -> AcsStatus {
        let Some(obstacle) = opponent else {
            return AcsStatus::Clear;
        };

        let distance = pose.distance_to(obstacle);
        if !(distance < self.config.stop_distance) {
            return AcsStatus::Clear;
        }

        let bearing = pose.bearing_to(obstacle);
        let triggered = match self.config.mode {
            DetectionMode::Disabled => false,
            DetectionMode::Circular => true,
            DetectionMode::Frontal => bearing.abs() < self.config.frontal_half_angle,
            DetectionMode::SemiCircular => bearing.abs() < self.config.semicircular_half_angle,
        };

        if triggered {
            AcsStatus::Triggered {
                obstacle,
                distance,
                bearing,
            }
        } else {
            AcsStatus::Clear
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Polygon;
    use core::f32::consts::PI;

    fn arena() -> Arena {
        let border = Polygon::rectangle(Point::new(0.0, 0.0), Point::new(200.0, 300.0)).unwrap();
        Arena::from_parts(border, 10.0, 15.0, vec![]).unwrap()
    }

    fn engine(mode: DetectionMode) -> AntiCollision {
        AntiCollision::new(AntiCollisionConfig {
            mode,
            ..AntiCollisionConfig::default()
        })
    }

    #[test]
    fn test_nearest_sample_inside_field_wins() {
        let pose = Pose::new(100.0, 100.0, 0.0);
        let samples = [
            LidarSample::new(0.0, 50.0),
            LidarSample::new(PI, 20.0),
            // Beyond the buffered wall at x = 210
            LidarSample::new(0.0, 150.0),
        ];
        let opponent = engine(DetectionMode::Circular).locate_opponent(&pose, &samples, &arena());
        let opponent = opponent.unwrap();
        assert!(opponent.distance(Point::new(80.0, 100.0)) < 1e-3);
    }

    #[test]
    fn test_returns_beyond_buffer_are_filtered() {
        let pose = Pose::new(100.0, 100.0, 0.0);
        // Wall at x = 200, buffered border reaches x = 210
        let samples = [LidarSample::new(0.0, 115.0), LidarSample::new(0.0, 140.0)];
        assert_eq!(
            engine(DetectionMode::Circular).locate_opponent(&pose, &samples, &arena()),
            None
        );
    }

    #[test]
    fn test_return_just_past_wall_is_kept() {
        let pose = Pose::new(100.0, 100.0, 0.0);
        let samples = [LidarSample::new(0.0, 105.0), LidarSample::new(0.0, 130.0)];
        assert_eq!(
            engine(DetectionMode::Circular).locate_opponent(&pose, &samples, &arena()),
            Some(Point::new(205.0, 100.0))
        );
    }

    #[test]
    fn test_noise_is_discarded() {
        let pose = Pose::new(100.0, 100.0, 0.0);
        let samples = [
            LidarSample::new(0.0, f32::NAN),
            LidarSample::new(0.0, -3.0),
            LidarSample::new(0.0, 0.0),
            LidarSample::new(0.0, 2.0),
            LidarSample::new(f32::INFINITY, 40.0),
        ];
        assert_eq!(
            engine(DetectionMode::Circular).locate_opponent(&pose, &samples, &arena()),
            None
        );
    }

    #[test]
    fn test_disabled_never_triggers() {
        let pose = Pose::new(0.0, 0.0, 0.0);
        let status = engine(DetectionMode::Disabled).evaluate(&pose, Some(Point::new(1.0, 0.0)));
        assert_eq!(status, AcsStatus::Clear);
    }

    #[test]
    fn test_circular_triggers_behind() {
        let pose = Pose::new(0.0, 0.0, 0.0);
        let status = engine(DetectionMode::Circular).evaluate(&pose, Some(Point::new(-10.0, 0.0)));
        assert!(status.is_triggered());
    }

    #[test]
    fn test_far_obstacle_is_clear() {
        let pose = Pose::new(0.0, 0.0, 0.0);
        let acs = engine(DetectionMode::Circular);
        assert_eq!(acs.evaluate(&pose, Some(Point::new(30.0, 0.0))), AcsStatus::Clear);
        assert_eq!(acs.evaluate(&pose, None), AcsStatus::Clear);
    }

    #[test]
    fn test_frontal_cone() {
        let pose = Pose::new(0.0, 0.0, FRAC_PI_2);
        let acs = engine(DetectionMode::Frontal);

        // Straight ahead along +y
        assert!(acs.evaluate(&pose, Some(Point::new(0.0, 10.0))).is_triggered());
        // Slightly left and slightly right behave the same
        assert!(acs.evaluate(&pose, Some(Point::new(-3.0, 10.0))).is_triggered());
        assert!(acs.evaluate(&pose, Some(Point::new(3.0, 10.0))).is_triggered());
        // To the side
        assert!(!acs.evaluate(&pose, Some(Point::new(10.0, 0.0))).is_triggered());
    }

    #[test]
    fn test_frontal_boundary_does_not_trigger() {
        let pose = Pose::new(10.0, 10.0, 0.3);
        let obstacle = Point::new(20.0, 20.0);
        let boundary = pose.bearing_to(obstacle);

        let acs = AntiCollision::new(AntiCollisionConfig {
            mode: DetectionMode::Frontal,
            frontal_half_angle: boundary.abs(),
            ..AntiCollisionConfig::default()
        });
        assert_eq!(acs.evaluate(&pose, Some(obstacle)), AcsStatus::Clear);

        let wider = AntiCollision::new(AntiCollisionConfig {
            mode: DetectionMode::Frontal,
            frontal_half_angle: boundary.abs() + 1e-3,
            ..AntiCollisionConfig::default()
        });
        assert!(wider.evaluate(&pose, Some(obstacle)).is_triggered());
    }

    #[test]
    fn test_semicircular_is_wider_than_frontal() {
        let pose = Pose::new(0.0, 0.0, 0.0);
        // 60 degrees to the right
        let obstacle = Point::new(10.0, -17.32);

        assert!(!engine(DetectionMode::Frontal).evaluate(&pose, Some(obstacle)).is_triggered());
        assert!(engine(DetectionMode::SemiCircular)
            .evaluate(&pose, Some(obstacle))
            .is_triggered());
    }
}

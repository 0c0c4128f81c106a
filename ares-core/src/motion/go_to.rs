//! Building move instructions from targets and options

use ares_protocol::{CurveGoTo, GoToPoint, TrackedCommand};

use super::profile::{CurveOptions, GoToOptions};
use crate::geometry::{circumcenter, Point, Pose};

/// Resolve a move target to arena coordinates
///
/// A relative target is rotated by the current heading and translated by
/// the current position.
pub fn resolve_target(pose: &Pose, target: Point, relative: bool) -> Point {
    if relative {
        pose.to_absolute(target)
    } else {
        target
    }
}

/// Straight move to an absolute target
pub fn go_to_command(target: Point, options: &GoToOptions) -> TrackedCommand {
    let p = &options.profile;
    TrackedCommand::GoToPoint(GoToPoint {
        x: target.x,
        y: target.y,
        backward: !options.forward,
        max_speed: p.max_speed,
        next_position_delay: p.next_position_delay,
        action_error_auth: p.action_error_auth,
        traj_precision: p.traj_precision,
        correction_trajectory_speed: p.correction_trajectory_speed,
        acceleration_start_speed: p.acceleration_start_speed,
        acceleration_distance: p.acceleration_distance,
        deceleration_end_speed: p.deceleration_end_speed,
        deceleration_distance: p.deceleration_distance,
    })
}

/// Centre of the arc from `start` to `target` bulging by `chord`
///
/// The arc passes through a point offset by `chord` from the midpoint,
/// perpendicular to the start-target line (positive bulges to the left).
/// Returns `None` when the three points are collinear.
pub fn curve_center(start: Point, target: Point, chord: f32) -> Option<Point> {
    let direction = (target - start).normalized()?;
    let left = Point::new(-direction.y, direction.x);
    let apex = start.midpoint(target) + left.scale(chord);
    circumcenter(start, apex, target)
}

/// Arc move from the current position to `target`
pub fn curve_command(
    start: Point,
    target: Point,
    chord: f32,
    interval: u16,
    options: &CurveOptions,
) -> Option<TrackedCommand> {
    let center = curve_center(start, target, chord)?;
    Some(TrackedCommand::CurveGoTo(CurveGoTo {
        target_x: target.x,
        target_y: target.y,
        center_x: center.x,
        center_y: center.y,
        interval,
        backward: !options.forward,
        speed: options.speed,
        next_position_delay: options.next_position_delay,
        action_error_auth: options.action_error_auth,
        traj_precision: options.traj_precision,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::FRAC_PI_2;

    #[test]
    fn test_absolute_target_is_untouched() {
        let pose = Pose::new(10.0, 10.0, 1.0);
        assert_eq!(resolve_target(&pose, Point::new(3.0, 4.0), false), Point::new(3.0, 4.0));
    }

    #[test]
    fn test_relative_target_follows_heading() {
        let pose = Pose::new(100.0, 50.0, FRAC_PI_2);
        let target = resolve_target(&pose, Point::new(20.0, 0.0), true);
        assert!(target.distance(Point::new(100.0, 70.0)) < 1e-4);
    }

    #[test]
    fn test_go_to_encodes_direction_and_profile() {
        let options = GoToOptions::default().backward();
        match go_to_command(Point::new(1.0, 2.0), &options) {
            TrackedCommand::GoToPoint(go) => {
                assert!(go.backward);
                assert_eq!(go.max_speed, 150);
                assert_eq!(go.deceleration_distance, 10.0);
                assert_eq!((go.x, go.y), (1.0, 2.0));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_half_circle_center_is_midpoint() {
        let center = curve_center(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 5.0).unwrap();
        assert!(center.distance(Point::new(5.0, 0.0)) < 1e-4);
    }

    #[test]
    fn test_center_is_equidistant() {
        let start = Point::new(20.0, 30.0);
        let target = Point::new(80.0, 110.0);
        let center = curve_center(start, target, 12.0).unwrap();
        assert!((center.distance(start) - center.distance(target)).abs() < 1e-2);
    }

    #[test]
    fn test_flat_curve_is_rejected() {
        assert_eq!(curve_center(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 0.0), None);
        assert_eq!(curve_center(Point::new(1.0, 1.0), Point::new(1.0, 1.0), 5.0), None);
        assert!(curve_command(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            0.0,
            5,
            &CurveOptions::default()
        )
        .is_none());
    }
}

//! Result of waiting on a tracked move

use crate::geometry::{Point, Pose};

/// How a waited-on move ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionOutcome {
    /// Completed within tolerance of the target
    Success,
    /// Deadline passed first; motion was stopped and the queue cleared
    TimedOut,
    /// Completed (or was cleared) away from the target
    ArrivedButOffTarget,
}

impl MotionOutcome {
    /// Classify a finished move by where the robot ended up
    pub fn settle(pose: &Pose, target: Point, tolerance: f32) -> Self {
        if pose.distance_to(target) <= tolerance {
            Self::Success
        } else {
            Self::ArrivedButOffTarget
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settle_within_tolerance() {
        let pose = Pose::new(99.0, 50.0, 0.0);
        assert_eq!(
            MotionOutcome::settle(&pose, Point::new(100.0, 50.0), 2.0),
            MotionOutcome::Success
        );
        assert_eq!(
            MotionOutcome::settle(&pose, Point::new(110.0, 50.0), 2.0),
            MotionOutcome::ArrivedButOffTarget
        );
    }
}

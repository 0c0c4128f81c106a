//! Anti-collision
//!
//! Lidar returns are projected into arena coordinates, filtered against the
//! buffered border and reduced to one believed opponent position. Each scan
//! cycle then decides whether that belief is close enough, and in the right
//! direction, to stop the robot.

mod engine;
mod recovery;

pub use engine::{AcsStatus, AntiCollision, AntiCollisionConfig, DetectionMode};
pub use recovery::{ObjectiveOutcome, RecoveryPolicy, RecoveryStep};

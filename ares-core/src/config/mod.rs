//! Configuration types
//!
//! Robot configuration loaded once at startup. Types used by a single
//! module are defined there and re-exported here.

pub mod types;

pub use crate::acs::{AntiCollisionConfig, DetectionMode, RecoveryPolicy};
pub use crate::motion::MotionProfile;
pub use types::*;

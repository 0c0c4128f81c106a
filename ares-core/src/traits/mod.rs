//! Collaborator traits
//!
//! These traits define the interface between the robot logic and the
//! devices and runtime it is deployed on.

pub mod lidar;
pub mod status;
pub mod timebase;

pub use lidar::{Lidar, LidarSample};
pub use status::{NoIndicator, StatusIndicator};
pub use timebase::Timebase;

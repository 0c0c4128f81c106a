//! Runtime-agnostic core logic for the robot host
//!
//! This crate contains all robot logic that does not depend on a specific
//! serial port, executor or sensor:
//!
//! - Planar geometry (points, poses, polygons, swept corridors)
//! - Command queue with monotonic completion tracking
//! - Move instruction building and outcome classification
//! - Anti-collision engine and recovery policies
//! - Arena model and navigation (approach points, path checks)
//! - Configuration type definitions
//! - Collaborator traits (lidar, status indicator, timebase)

#![deny(unsafe_code)]

pub mod acs;
pub mod arena;
pub mod config;
pub mod geometry;
pub mod motion;
pub mod queue;
pub mod traits;

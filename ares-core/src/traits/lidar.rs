//! Range sensor trait

/// One lidar return
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LidarSample {
    /// Angle relative to the robot heading (radians, counter-clockwise)
    pub angle: f32,
    /// Measured range in arena units
    pub distance: f32,
}

impl LidarSample {
    pub const fn new(angle: f32, distance: f32) -> Self {
        Self { angle, distance }
    }
}

/// Trait for scanning range sensors
///
/// Implementations wrap a specific device driver and convert its native
/// angle convention to robot-relative radians.
pub trait Lidar {
    /// Driver-specific failure
    type Error: core::fmt::Debug;

    /// Take one full scan
    fn scan(&mut self) -> Result<Vec<LidarSample>, Self::Error>;
}

//! Status indicator trait

/// Sink for anti-collision status (status light, buzzer, telemetry)
///
/// Calls must not block; implementations drop updates they cannot show.
pub trait StatusIndicator {
    /// Report whether anti-collision currently holds the robot
    fn show_collision_status(&mut self, triggered: bool);
}

/// Indicator that shows nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIndicator;

impl StatusIndicator for NoIndicator {
    fn show_collision_status(&mut self, _triggered: bool) {}
}

//! Speed and precision settings for controller moves

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Named speed/precision profile applied to straight moves
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotionProfile {
    pub max_speed: u8,
    /// Delay before switching to the next trajectory point (ms)
    pub next_position_delay: u16,
    /// Position error the controller accepts as arrived
    pub action_error_auth: u16,
    pub traj_precision: u16,
    pub correction_trajectory_speed: u8,
    pub acceleration_start_speed: u8,
    pub acceleration_distance: f32,
    pub deceleration_end_speed: u8,
    pub deceleration_distance: f32,
}

impl Default for MotionProfile {
    fn default() -> Self {
        Self {
            max_speed: 150,
            next_position_delay: 100,
            action_error_auth: 50,
            traj_precision: 50,
            correction_trajectory_speed: 80,
            acceleration_start_speed: 80,
            acceleration_distance: 10.0,
            deceleration_end_speed: 80,
            deceleration_distance: 10.0,
        }
    }
}

/// Options for a straight move
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GoToOptions {
    /// Drive forward (false drives in reverse)
    pub forward: bool,
    /// Target is expressed in the robot frame
    pub relative: bool,
    pub profile: MotionProfile,
}

impl Default for GoToOptions {
    fn default() -> Self {
        Self {
            forward: true,
            relative: false,
            profile: MotionProfile::default(),
        }
    }
}

impl GoToOptions {
    pub fn with_profile(profile: MotionProfile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    pub fn backward(mut self) -> Self {
        self.forward = false;
        self
    }

    pub fn relative(mut self) -> Self {
        self.relative = true;
        self
    }
}

/// Options for an arc move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CurveOptions {
    pub forward: bool,
    pub speed: u16,
    pub next_position_delay: u16,
    pub action_error_auth: u16,
    pub traj_precision: u16,
}

impl Default for CurveOptions {
    fn default() -> Self {
        Self {
            forward: true,
            speed: 150,
            next_position_delay: 100,
            action_error_auth: 20,
            traj_precision: 50,
        }
    }
}

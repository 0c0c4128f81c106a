//! Configuration type definitions
//!
//! These types describe one robot: its serial link, motion profiles,
//! anti-collision behaviour and field layout. They are loaded once at
//! startup; a configuration that fails [`RobotConfig::validate`] must
//! stop the robot before any instruction is sent.

use std::collections::BTreeMap;

use crate::acs::{AntiCollisionConfig, DetectionMode, RecoveryPolicy};
use crate::arena::{Arena, ArenaError, Team, ZoneRole};
use crate::geometry::Point;
use crate::motion::MotionProfile;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default serial baud rate
pub const DEFAULT_BAUDRATE: u32 = 115_200;

/// Serial link to the motion controller
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SerialConfig {
    /// Device path or identifier
    pub device: String,
    pub baudrate: u32,
    /// Append and check a CRC8 on every frame
    pub crc: bool,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            device: String::from("/dev/ttyACM0"),
            baudrate: DEFAULT_BAUDRATE,
            crc: true,
        }
    }
}

/// One named zone of the field
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ZoneConfig {
    pub name: String,
    pub role: ZoneRole,
    /// Polygon vertices in either winding order
    pub vertices: Vec<Point>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resources: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub capacity: u32,
    /// Owning side, `None` for shared zones
    #[cfg_attr(feature = "serde", serde(default))]
    pub team: Option<Team>,
}

/// Field geometry
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ArenaConfig {
    /// Border polygon vertices
    pub border: Vec<Point>,
    /// Outward growth of the buffered border used to filter lidar returns
    pub border_buffer: f32,
    /// Robot half-width
    pub robot_buffer: f32,
    pub zones: Vec<ZoneConfig>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            border: vec![
                Point::new(0.0, 0.0),
                Point::new(200.0, 0.0),
                Point::new(200.0, 300.0),
                Point::new(0.0, 300.0),
            ],
            border_buffer: 10.0,
            robot_buffer: 15.0,
            zones: Vec::new(),
        }
    }
}

/// Complete robot configuration
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RobotConfig {
    pub serial: SerialConfig,
    pub team: Team,
    /// Speed/precision profiles by name
    pub profiles: BTreeMap<String, MotionProfile>,
    pub anti_collision: AntiCollisionConfig,
    pub arena: ArenaConfig,
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Serial device name is empty
    EmptyDevice,
    /// Baud rate is zero
    ZeroBaudrate,
    /// Stop distance is not a positive finite number
    InvalidStopDistance(f32),
    /// Detection half-angle outside (0, π]
    InvalidHalfAngle(f32),
    /// Semicircular sector is not wider than the frontal one
    NarrowSemicircle { frontal: f32, semicircular: f32 },
    /// Scan period is zero
    ZeroScanPeriod,
    /// Retry policy allows no attempts
    ZeroRetries,
    /// Field geometry is unusable
    Arena(ArenaError),
}

impl From<ArenaError> for ConfigError {
    fn from(error: ArenaError) -> Self {
        Self::Arena(error)
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::EmptyDevice => write!(f, "serial device is empty"),
            Self::ZeroBaudrate => write!(f, "serial baudrate is zero"),
            Self::InvalidStopDistance(d) => write!(f, "invalid anti-collision stop distance {}", d),
            Self::InvalidHalfAngle(a) => write!(f, "invalid detection half-angle {}", a),
            Self::NarrowSemicircle {
                frontal,
                semicircular,
            } => write!(
                f,
                "semicircular half-angle {} must exceed frontal half-angle {}",
                semicircular, frontal
            ),
            Self::ZeroScanPeriod => write!(f, "anti-collision scan period is zero"),
            Self::ZeroRetries => write!(f, "retry policy allows no attempts"),
            Self::Arena(e) => write!(f, "arena: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl RobotConfig {
    /// Profile by name, `None` when it is not configured
    pub fn profile(&self, name: &str) -> Option<MotionProfile> {
        self.profiles.get(name).copied()
    }

    /// Profile by name, falling back to the default profile
    pub fn profile_or_default(&self, name: &str) -> MotionProfile {
        self.profile(name).unwrap_or_default()
    }

    /// Check every section; the field is built once to validate geometry
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.serial.device.trim().is_empty() {
            return Err(ConfigError::EmptyDevice);
        }
        if self.serial.baudrate == 0 {
            return Err(ConfigError::ZeroBaudrate);
        }

        let acs = &self.anti_collision;
        if !(acs.stop_distance.is_finite() && acs.stop_distance > 0.0) {
            return Err(ConfigError::InvalidStopDistance(acs.stop_distance));
        }
        let half_angle = match acs.mode {
            DetectionMode::Frontal => Some(acs.frontal_half_angle),
            DetectionMode::SemiCircular => Some(acs.semicircular_half_angle),
            DetectionMode::Disabled | DetectionMode::Circular => None,
        };
        if let Some(angle) = half_angle {
            if !(angle > 0.0 && angle <= core::f32::consts::PI) {
                return Err(ConfigError::InvalidHalfAngle(angle));
            }
        }
        // Checked in every mode, the mode can be switched mid-match
        if !(acs.semicircular_half_angle > acs.frontal_half_angle) {
            return Err(ConfigError::NarrowSemicircle {
                frontal: acs.frontal_half_angle,
                semicircular: acs.semicircular_half_angle,
            });
        }
        if acs.scan_period_ms == 0 {
            return Err(ConfigError::ZeroScanPeriod);
        }
        if let RecoveryPolicy::WaitThenRetry { max_retries: 0, .. } = acs.recovery {
            return Err(ConfigError::ZeroRetries);
        }

        Arena::new(&self.arena, self.team)?;
        Ok(())
    }
}

//! TOML configuration loading
//!
//! Reads a [`RobotConfig`] from a TOML document and validates it before
//! anything can be built from it. Every key is optional; missing keys take
//! their defaults.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use ares_core::config::{ConfigError, MotionProfile, RobotConfig};

/// Startup configuration failures
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] ConfigError),
}

/// Parse and validate a configuration document
pub fn load_str(text: &str) -> Result<RobotConfig, LoadError> {
    let config: RobotConfig = toml::from_str(text)?;
    config.validate()?;
    info!(
        device = %config.serial.device,
        baudrate = config.serial.baudrate,
        crc = config.serial.crc,
        profiles = config.profiles.len(),
        zones = config.arena.zones.len(),
        "configuration loaded"
    );
    Ok(config)
}

/// Read, parse and validate a configuration file
pub fn load_file(path: impl AsRef<Path>) -> Result<RobotConfig, LoadError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_str(&text)
}

/// Named profile, or the default profile with a warning
pub fn profile_or_default(config: &RobotConfig, name: &str) -> MotionProfile {
    config.profile(name).unwrap_or_else(|| {
        warn!(profile = name, "unknown motion profile, using defaults");
        MotionProfile::default()
    })
}

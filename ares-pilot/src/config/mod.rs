//! Configuration loading
//!
//! The configuration types live in `ares_core::config`; this module reads
//! them from TOML.

pub mod loader;

pub use ares_core::config::*;
pub use loader::{load_file, load_str, profile_or_default, LoadError};

//! Playing field model and navigation
//!
//! - Border polygon grown by a buffer for lidar filtering
//! - Named zones with roles, owners and resource counts
//! - Approach-point computation and path legality checks

mod model;
mod navigation;
mod zone;

pub use model::{Arena, ArenaError, POSITION_EPSILON};
pub use navigation::{ZoneFilter, NUDGE_MARGIN};
pub use zone::{Team, Zone, ZoneRole};

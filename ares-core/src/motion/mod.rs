//! Move planning
//!
//! Target resolution, arc geometry and the instructions sent to the
//! motion controller.

mod go_to;
mod outcome;
mod profile;

pub use go_to::{curve_center, curve_command, go_to_command, resolve_target};
pub use outcome::MotionOutcome;
pub use profile::{CurveOptions, GoToOptions, MotionProfile};

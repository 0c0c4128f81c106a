//! Long-running async tasks
//!
//! Each task is a plain `async fn` that loops forever, so it can be spawned
//! on any executor or joined with other futures on a single thread.

pub mod anti_collision;
pub mod receiver;

pub use anti_collision::{anti_collision_task, CollisionGuard};
pub use receiver::{receive_once, receiver_task};

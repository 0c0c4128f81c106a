//! Controller command queue

mod command_queue;

pub use command_queue::{CommandId, CommandQueue, QueueError, QueuedInstruction, QUEUE_CAPACITY};

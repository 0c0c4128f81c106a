//! Runtime error types

use ares_core::queue::QueueError;
use ares_protocol::FrameError;
use embedded_io_async::ErrorKind;
use thiserror::Error;

/// Serial link failures, reported to the caller that attempted the send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Writing or flushing the serial device failed
    #[error("serial write failed: {0:?}")]
    Write(ErrorKind),

    /// Instruction could not be framed
    #[error("frame encoding failed: {0:?}")]
    Encode(FrameError),
}

/// Motion controller failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PilotError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("command queue rejected instruction: {0}")]
    Queue(#[from] QueueError),

    /// Start, apex and target of an arc are collinear
    #[error("arc endpoints and apex are collinear")]
    DegenerateCurve,
}

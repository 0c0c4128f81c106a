//! Async host runtime for the rolling base
//!
//! This crate wires the runtime-agnostic pieces of `ares-core` to a serial
//! link:
//!
//! - [`transport`]: framed sends with single NACK retransmission, and the
//!   receive-side frame dispatch
//! - [`rolling_basis`]: the motion controller (command queue, pose,
//!   `go_to_and_wait`)
//! - [`tasks`]: the receive loop and the anti-collision scan cycle
//! - [`config`]: TOML loading and validation
//!
//! Shared state uses `embassy-sync` mutexes generic over `RawMutex`, so the
//! same code runs on a single-threaded executor with `NoopRawMutex` or
//! behind a thread-safe raw mutex.

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod rolling_basis;
pub mod tasks;
#[cfg(feature = "embassy-time")]
pub mod time;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use error::{PilotError, TransportError};
pub use rolling_basis::RollingBasis;
pub use transport::{ReportHandler, Transport};

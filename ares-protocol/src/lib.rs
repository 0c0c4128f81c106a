//! Motion controller serial protocol
//!
//! This crate defines the framed binary protocol between the robot's main
//! computer and its motion-control microcontroller. Both directions share
//! one frame layout:
//!
//! ```text
//! ┌──────┬─────────────┬────────┬──────────────┬─────────────┐
//! │ KIND │ PAYLOAD     │ LENGTH │ CRC8         │ TERMINATOR  │
//! │ 1B   │ 0–254B      │ 1B     │ 1B, optional │ BA DD 1C C5 │
//! └──────┴─────────────┴────────┴──────────────┴─────────────┘
//! ```
//!
//! Instructions flow host → controller ([`Instruction`]), reports flow
//! controller → host ([`Report`]). Completion of tracked instructions is
//! echoed by kind, not by a request id.

#![no_std]
#![deny(unsafe_code)]

pub mod commands;
pub mod frame;
pub mod reports;

pub use commands::{
    nack_frame, CommandKind, CurveGoTo, GoToPoint, HomePose, Instruction, PidGains,
    TrackedCommand, UntrackedCommand,
};
pub use frame::{crc8, Frame, FrameError, FrameReader, FRAME_TERMINATOR, MAX_PAYLOAD_SIZE};
pub use reports::{Odometry, Report, ReportError};

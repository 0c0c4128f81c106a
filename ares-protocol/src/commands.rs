//! Instructions sent to the motion controller
//!
//! Every instruction is either tracked (the controller echoes an
//! action-finished report when it completes) or untracked (fire-and-forget).
//! The split is encoded in the type so queue code can match exhaustively.

use heapless::Vec;

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};

/// Wire codes for host → controller messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CommandKind {
    GoToPoint = 0x00,
    CurveGoTo = 0x01,
    KeepCurrentPosition = 0x02,
    DisablePid = 0x03,
    EnablePid = 0x04,
    ResetPosition = 0x05,
    SetPid = 0x06,
    SetHome = 0x07,
    Stop = 0x7E,
    /// Negative acknowledgement, also used by the controller
    Nack = 0x7F,
}

impl CommandKind {
    /// Wire code
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Parse a wire code
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0x00 => Self::GoToPoint,
            0x01 => Self::CurveGoTo,
            0x02 => Self::KeepCurrentPosition,
            0x03 => Self::DisablePid,
            0x04 => Self::EnablePid,
            0x05 => Self::ResetPosition,
            0x06 => Self::SetPid,
            0x07 => Self::SetHome,
            0x7E => Self::Stop,
            0x7F => Self::Nack,
            _ => return None,
        })
    }

    /// Whether the controller reports completion for this kind
    pub const fn is_tracked(self) -> bool {
        matches!(self, Self::GoToPoint | Self::CurveGoTo)
    }
}

/// Straight-line move to an absolute point
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GoToPoint {
    pub x: f32,
    pub y: f32,
    /// Drive in reverse
    pub backward: bool,
    pub max_speed: u8,
    /// Delay before switching to the next trajectory point (ms)
    pub next_position_delay: u16,
    /// Accepted final position error
    pub action_error_auth: u16,
    pub traj_precision: u16,
    pub correction_trajectory_speed: u8,
    pub acceleration_start_speed: u8,
    pub acceleration_distance: f32,
    pub deceleration_end_speed: u8,
    pub deceleration_distance: f32,
}

/// Arc move to an absolute point around a centre
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CurveGoTo {
    pub target_x: f32,
    pub target_y: f32,
    pub center_x: f32,
    pub center_y: f32,
    /// Distance between generated trajectory points
    pub interval: u16,
    pub backward: bool,
    pub speed: u16,
    pub next_position_delay: u16,
    pub action_error_auth: u16,
    pub traj_precision: u16,
}

/// PID gains for the wheel controllers
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PidGains {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
}

/// Pose the controller should adopt as its odometry origin
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HomePose {
    pub x: f32,
    pub y: f32,
    pub heading: f32,
}

/// Instructions whose completion the controller echoes
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrackedCommand {
    GoToPoint(GoToPoint),
    CurveGoTo(CurveGoTo),
}

/// Fire-and-forget configuration and stop instructions
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UntrackedCommand {
    KeepCurrentPosition,
    DisablePid,
    EnablePid,
    ResetPosition,
    SetPid(PidGains),
    SetHome(HomePose),
    Stop,
}

/// Any instruction the host can queue for the controller
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Instruction {
    Tracked(TrackedCommand),
    Untracked(UntrackedCommand),
}

impl TrackedCommand {
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::GoToPoint(_) => CommandKind::GoToPoint,
            Self::CurveGoTo(_) => CommandKind::CurveGoTo,
        }
    }
}

impl UntrackedCommand {
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::KeepCurrentPosition => CommandKind::KeepCurrentPosition,
            Self::DisablePid => CommandKind::DisablePid,
            Self::EnablePid => CommandKind::EnablePid,
            Self::ResetPosition => CommandKind::ResetPosition,
            Self::SetPid(_) => CommandKind::SetPid,
            Self::SetHome(_) => CommandKind::SetHome,
            Self::Stop => CommandKind::Stop,
        }
    }
}

impl From<TrackedCommand> for Instruction {
    fn from(command: TrackedCommand) -> Self {
        Self::Tracked(command)
    }
}

impl From<UntrackedCommand> for Instruction {
    fn from(command: UntrackedCommand) -> Self {
        Self::Untracked(command)
    }
}

/// Little-endian payload builder
struct PayloadWriter {
    bytes: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl PayloadWriter {
    fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    fn put(&mut self, data: &[u8]) -> Result<&mut Self, FrameError> {
        self.bytes
            .extend_from_slice(data)
            .map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(self)
    }

    fn u8(&mut self, value: u8) -> Result<&mut Self, FrameError> {
        self.put(&[value])
    }

    fn bool(&mut self, value: bool) -> Result<&mut Self, FrameError> {
        self.u8(u8::from(value))
    }

    fn u16(&mut self, value: u16) -> Result<&mut Self, FrameError> {
        self.put(&value.to_le_bytes())
    }

    fn f32(&mut self, value: f32) -> Result<&mut Self, FrameError> {
        self.put(&value.to_le_bytes())
    }
}

impl Instruction {
    /// Wire code of this instruction
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Tracked(command) => command.kind(),
            Self::Untracked(command) => command.kind(),
        }
    }

    pub fn is_tracked(&self) -> bool {
        matches!(self, Self::Tracked(_))
    }

    /// Encode this instruction into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        let mut w = PayloadWriter::new();
        match self {
            Self::Tracked(TrackedCommand::GoToPoint(go)) => {
                w.f32(go.x)?
                    .f32(go.y)?
                    .bool(go.backward)?
                    .u8(go.max_speed)?
                    .u16(go.next_position_delay)?
                    .u16(go.action_error_auth)?
                    .u16(go.traj_precision)?
                    .u8(go.correction_trajectory_speed)?
                    .u8(go.acceleration_start_speed)?
                    .f32(go.acceleration_distance)?
                    .u8(go.deceleration_end_speed)?
                    .f32(go.deceleration_distance)?;
            }
            Self::Tracked(TrackedCommand::CurveGoTo(curve)) => {
                w.f32(curve.target_x)?
                    .f32(curve.target_y)?
                    .f32(curve.center_x)?
                    .f32(curve.center_y)?
                    .u16(curve.interval)?
                    .bool(curve.backward)?
                    .u16(curve.speed)?
                    .u16(curve.next_position_delay)?
                    .u16(curve.action_error_auth)?
                    .u16(curve.traj_precision)?;
            }
            Self::Untracked(UntrackedCommand::SetPid(gains)) => {
                w.f32(gains.kp)?.f32(gains.ki)?.f32(gains.kd)?;
            }
            Self::Untracked(UntrackedCommand::SetHome(home)) => {
                w.f32(home.x)?.f32(home.y)?.f32(home.heading)?;
            }
            Self::Untracked(
                UntrackedCommand::KeepCurrentPosition
                | UntrackedCommand::DisablePid
                | UntrackedCommand::EnablePid
                | UntrackedCommand::ResetPosition
                | UntrackedCommand::Stop,
            ) => {}
        }
        Frame::new(self.kind().code(), &w.bytes)
    }
}

/// Frame sent to ask the controller for a retransmission
pub fn nack_frame() -> Frame {
    Frame::empty(CommandKind::Nack.code())
}

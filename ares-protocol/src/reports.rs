//! Reports received from the motion controller
//!
//! The leading kind byte selects the report; anything else is rejected
//! with [`ReportError::UnknownKind`] so the receiver can log and drop it.

use heapless::String;

use crate::commands::CommandKind;
use crate::frame::{Frame, MAX_PAYLOAD_SIZE};

// Report kind codes: controller → host
pub const REPORT_NACK: u8 = 0x7F;
pub const REPORT_ODOMETRY: u8 = 0x80;
pub const REPORT_ACTION_FINISHED: u8 = 0x81;
pub const REPORT_PRINT: u8 = 0x82;
pub const REPORT_UNKNOWN_COMMAND: u8 = 0xFF;

/// Errors raised while interpreting a valid frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportError {
    /// Leading kind byte is not a known report
    UnknownKind(u8),
    /// Payload too short for the report kind
    ShortPayload { kind: u8, len: usize },
    /// Action-finished report echoes a code that is not a command
    UnknownEcho(u8),
}

/// Odometry estimate reported by the controller
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Odometry {
    pub x: f32,
    pub y: f32,
    /// Heading in radians
    pub heading: f32,
}

/// Messages parsed from controller-originated frames
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    /// Controller rejected our last frame
    Nack,
    /// Telemetry update
    Odometry(Odometry),
    /// A tracked instruction of this kind completed
    ActionFinished(CommandKind),
    /// Free-text diagnostic
    Print(String<MAX_PAYLOAD_SIZE>),
    /// Controller did not recognise the code we sent
    UnknownCommand(u8),
}

fn read_f32(payload: &[u8], offset: usize) -> f32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&payload[offset..offset + 4]);
    f32::from_le_bytes(bytes)
}

impl Report {
    /// Parse a report from a frame
    pub fn from_frame(frame: &Frame) -> Result<Self, ReportError> {
        let payload = &frame.payload[..];
        let short = || ReportError::ShortPayload {
            kind: frame.kind,
            len: payload.len(),
        };

        match frame.kind {
            REPORT_NACK => Ok(Report::Nack),
            REPORT_ODOMETRY => {
                if payload.len() < 12 {
                    return Err(short());
                }
                Ok(Report::Odometry(Odometry {
                    x: read_f32(payload, 0),
                    y: read_f32(payload, 4),
                    heading: read_f32(payload, 8),
                }))
            }
            REPORT_ACTION_FINISHED => {
                let &code = payload.first().ok_or_else(short)?;
                CommandKind::from_code(code)
                    .map(Report::ActionFinished)
                    .ok_or(ReportError::UnknownEcho(code))
            }
            REPORT_PRINT => {
                let mut text = String::new();
                for &byte in payload.iter().filter(|b| b.is_ascii()) {
                    // Capacity equals the payload limit, push cannot fail
                    let _ = text.push(char::from(byte));
                }
                Ok(Report::Print(text))
            }
            REPORT_UNKNOWN_COMMAND => Ok(Report::UnknownCommand(
                payload.first().copied().unwrap_or(0xFF),
            )),
            other => Err(ReportError::UnknownKind(other)),
        }
    }

    /// Encode this report into a frame (for testing or simulation)
    pub fn to_frame(&self) -> Frame {
        let mut frame = Frame::empty(self.kind());
        // Every report payload fits in MAX_PAYLOAD_SIZE
        let _ = match self {
            Report::Nack => Ok(()),
            Report::Odometry(odo) => frame
                .payload
                .extend_from_slice(&odo.x.to_le_bytes())
                .and_then(|_| frame.payload.extend_from_slice(&odo.y.to_le_bytes()))
                .and_then(|_| frame.payload.extend_from_slice(&odo.heading.to_le_bytes())),
            Report::ActionFinished(kind) => frame.payload.push(kind.code()).map_err(|_| ()),
            Report::Print(text) => frame.payload.extend_from_slice(text.as_bytes()),
            Report::UnknownCommand(code) => frame.payload.push(*code).map_err(|_| ()),
        };
        frame
    }

    /// Leading kind byte for this report
    pub fn kind(&self) -> u8 {
        match self {
            Report::Nack => REPORT_NACK,
            Report::Odometry(_) => REPORT_ODOMETRY,
            Report::ActionFinished(_) => REPORT_ACTION_FINISHED,
            Report::Print(_) => REPORT_PRINT,
            Report::UnknownCommand(_) => REPORT_UNKNOWN_COMMAND,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_odometry_report() {
        let mut payload = [0u8; 12];
        payload[0..4].copy_from_slice(&12.5f32.to_le_bytes());
        payload[4..8].copy_from_slice(&(-3.0f32).to_le_bytes());
        payload[8..12].copy_from_slice(&1.5f32.to_le_bytes());
        let frame = Frame::new(REPORT_ODOMETRY, &payload).unwrap();

        let report = Report::from_frame(&frame).unwrap();
        assert_eq!(
            report,
            Report::Odometry(Odometry {
                x: 12.5,
                y: -3.0,
                heading: 1.5
            })
        );
    }

    #[test]
    fn test_short_odometry_rejected() {
        let frame = Frame::new(REPORT_ODOMETRY, &[0u8; 8]).unwrap();
        assert_eq!(
            Report::from_frame(&frame),
            Err(ReportError::ShortPayload {
                kind: REPORT_ODOMETRY,
                len: 8
            })
        );
    }

    #[test]
    fn test_action_finished_echoes_kind() {
        let frame = Frame::new(REPORT_ACTION_FINISHED, &[0x01]).unwrap();
        assert_eq!(
            Report::from_frame(&frame),
            Ok(Report::ActionFinished(CommandKind::CurveGoTo))
        );

        let bad = Frame::new(REPORT_ACTION_FINISHED, &[0x55]).unwrap();
        assert_eq!(Report::from_frame(&bad), Err(ReportError::UnknownEcho(0x55)));
    }

    #[test]
    fn test_print_drops_non_ascii() {
        let frame = Frame::new(REPORT_PRINT, &[b'h', 0xC3, b'i']).unwrap();
        match Report::from_frame(&frame).unwrap() {
            Report::Print(text) => assert_eq!(text.as_str(), "hi"),
            other => panic!("unexpected report {:?}", other),
        }
    }

    #[test]
    fn test_unknown_kind() {
        let frame = Frame::empty(0x99);
        assert_eq!(
            Report::from_frame(&frame),
            Err(ReportError::UnknownKind(0x99))
        );
    }

    #[test]
    fn test_report_roundtrip() {
        let original = Report::ActionFinished(CommandKind::GoToPoint);
        let parsed = Report::from_frame(&original.to_frame()).unwrap();
        assert_eq!(original, parsed);
    }
}

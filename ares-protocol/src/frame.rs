//! Frame encoding and decoding for the motion controller serial link.
//!
//! Frame format:
//! - KIND (1 byte): command or report code
//! - PAYLOAD (0-254 bytes): kind-specific data
//! - LENGTH (1 byte): number of KIND + PAYLOAD bytes
//! - CRC8 (1 byte, only when CRC is enabled): CRC-8 of KIND, PAYLOAD and LENGTH
//! - TERMINATOR (4 bytes): `BA DD 1C C5`
//!
//! Frames are delimited by the terminator only, there is no start byte.
//! A receiver reads until the terminator and validates what came before it.

use heapless::Vec;

/// Fixed frame terminator
pub const FRAME_TERMINATOR: [u8; 4] = [0xBA, 0xDD, 0x1C, 0xC5];

/// Maximum payload size in bytes (LENGTH is one byte and also counts KIND)
pub const MAX_PAYLOAD_SIZE: usize = 254;

/// Maximum complete frame size (KIND + MAX_PAYLOAD + LENGTH + CRC8 + TERMINATOR)
pub const MAX_FRAME_SIZE: usize = 1 + MAX_PAYLOAD_SIZE + 1 + 1 + FRAME_TERMINATOR.len();

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// CRC8 mismatch
    InvalidChecksum,
    /// Declared length does not match the received byte count
    LengthMismatch,
    /// Fewer bytes than the fixed fields require
    Truncated,
    /// No terminator seen within `MAX_FRAME_SIZE` bytes
    Overflow,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// CRC-8 with polynomial 0x07 and zero initial value (CRC-8/SMBUS).
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            if crc & 0x80 != 0 {
                crc = (crc << 1) ^ 0x07;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

/// A parsed or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Command or report code
    pub kind: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a new frame with the given kind and payload
    pub fn new(kind: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self { kind, payload })
    }

    /// Create a frame with no payload
    pub fn empty(kind: u8) -> Self {
        Self {
            kind,
            payload: Vec::new(),
        }
    }

    /// Number of bytes `encode` will write
    pub fn encoded_len(&self, crc: bool) -> usize {
        1 + self.payload.len() + 1 + usize::from(crc) + FRAME_TERMINATOR.len()
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, crc: bool, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = self.encoded_len(crc);
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        let body_len = 1 + self.payload.len();
        buffer[0] = self.kind;
        buffer[1..body_len].copy_from_slice(&self.payload);
        buffer[body_len] = body_len as u8;

        let mut end = body_len + 1;
        if crc {
            buffer[end] = crc8(&buffer[..end]);
            end += 1;
        }
        buffer[end..end + FRAME_TERMINATOR.len()].copy_from_slice(&FRAME_TERMINATOR);

        Ok(frame_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self, crc: bool) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(crc, &mut buffer)?;
        Vec::from_slice(&buffer[..len]).map_err(|_| FrameError::BufferTooSmall)
    }

    /// Decode a frame body (everything before the terminator)
    pub fn decode(body: &[u8], crc: bool) -> Result<Self, FrameError> {
        let data = if crc {
            let (&received, data) = body.split_last().ok_or(FrameError::Truncated)?;
            if data.len() < 2 {
                return Err(FrameError::Truncated);
            }
            if crc8(data) != received {
                return Err(FrameError::InvalidChecksum);
            }
            data
        } else {
            if body.len() < 2 {
                return Err(FrameError::Truncated);
            }
            body
        };

        let (&length, message) = data.split_last().ok_or(FrameError::Truncated)?;
        if usize::from(length) != message.len() {
            return Err(FrameError::LengthMismatch);
        }

        Frame::new(message[0], &message[1..])
    }
}

/// Accumulates stream bytes and splits them into frames at the terminator
#[derive(Debug, Clone)]
pub struct FrameReader {
    buffer: Vec<u8, MAX_FRAME_SIZE>,
    crc: bool,
}

impl FrameReader {
    /// Create a reader; `crc` must match the sender's setting
    pub fn new(crc: bool) -> Self {
        Self {
            buffer: Vec::new(),
            crc,
        }
    }

    /// Drop any partially received bytes
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Number of bytes waiting for a terminator
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Feed a single byte to the reader
    ///
    /// Returns `Some` once a terminator completes a frame (valid or not),
    /// `None` while more bytes are needed.
    pub fn push(&mut self, byte: u8) -> Option<Result<Frame, FrameError>> {
        if self.buffer.push(byte).is_err() {
            self.buffer.clear();
            return Some(Err(FrameError::Overflow));
        }

        if !self.buffer.ends_with(&FRAME_TERMINATOR) {
            return None;
        }

        let body_len = self.buffer.len() - FRAME_TERMINATOR.len();
        let result = Frame::decode(&self.buffer[..body_len], self.crc);
        self.buffer.clear();
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc8_check_value() {
        assert_eq!(crc8(b"123456789"), 0xF4);
        assert_eq!(crc8(&[]), 0x00);
    }

    #[test]
    fn test_frame_encode_empty_payload() {
        let frame = Frame::empty(0x02);
        let mut buffer = [0u8; 16];
        let len = frame.encode(true, &mut buffer).unwrap();

        assert_eq!(len, 7);
        assert_eq!(buffer[0], 0x02); // kind
        assert_eq!(buffer[1], 1); // length covers the kind byte
        assert_eq!(buffer[2], crc8(&[0x02, 1]));
        assert_eq!(&buffer[3..7], &FRAME_TERMINATOR);
    }

    #[test]
    fn test_frame_encode_without_crc() {
        let frame = Frame::new(0x06, &[1, 2, 3]).unwrap();
        let encoded = frame.encode_to_vec(false).unwrap();

        assert_eq!(&encoded[..], &[0x06, 1, 2, 3, 4, 0xBA, 0xDD, 0x1C, 0xC5]);
    }

    #[test]
    fn test_frame_roundtrip_through_reader() {
        let original = Frame::new(0x80, &[1, 2, 3, 4, 5]).unwrap();
        let encoded = original.encode_to_vec(true).unwrap();

        let mut reader = FrameReader::new(true);
        let mut parsed = None;
        for &byte in encoded.iter() {
            if let Some(result) = reader.push(byte) {
                parsed = Some(result);
            }
        }

        assert_eq!(parsed, Some(Ok(original)));
        assert_eq!(reader.pending(), 0);
    }

    #[test]
    fn test_invalid_checksum() {
        let frame = Frame::new(0x81, &[0x00]).unwrap();
        let mut encoded = frame.encode_to_vec(true).unwrap();
        let crc_idx = encoded.len() - FRAME_TERMINATOR.len() - 1;
        encoded[crc_idx] ^= 0xFF;

        let body = &encoded[..encoded.len() - FRAME_TERMINATOR.len()];
        assert_eq!(Frame::decode(body, true), Err(FrameError::InvalidChecksum));
    }

    #[test]
    fn test_length_mismatch() {
        // Declared length 5 but only kind + 3 payload bytes present
        let body = [0x81, 1, 2, 3, 5];
        assert_eq!(Frame::decode(&body, false), Err(FrameError::LengthMismatch));
    }

    #[test]
    fn test_truncated_body() {
        assert_eq!(Frame::decode(&[], false), Err(FrameError::Truncated));
        assert_eq!(Frame::decode(&[0x80, 0x01], true), Err(FrameError::Truncated));
    }

    #[test]
    fn test_reader_recovers_after_bad_frame() {
        let mut reader = FrameReader::new(true);

        // Garbage followed by a terminator is one bad frame
        let mut results = Vec::<Result<Frame, FrameError>, 4>::new();
        for &byte in [0x13, 0x37, 0x42].iter().chain(FRAME_TERMINATOR.iter()) {
            if let Some(result) = reader.push(byte) {
                results.push(result).unwrap();
            }
        }

        let good = Frame::new(0x82, b"ok").unwrap();
        for &byte in good.encode_to_vec(true).unwrap().iter() {
            if let Some(result) = reader.push(byte) {
                results.push(result).unwrap();
            }
        }

        assert_eq!(results.len(), 2);
        assert!(results[0].is_err());
        assert_eq!(results[1], Ok(good));
    }

    #[test]
    fn test_reader_overflow_discards_buffer() {
        let mut reader = FrameReader::new(false);
        let mut overflowed = false;
        for _ in 0..=MAX_FRAME_SIZE {
            if let Some(result) = reader.push(0x00) {
                assert_eq!(result, Err(FrameError::Overflow));
                overflowed = true;
            }
        }
        assert!(overflowed);
        assert!(reader.pending() < MAX_FRAME_SIZE);
    }

    #[test]
    fn test_payload_too_large() {
        let large_payload = [0u8; MAX_PAYLOAD_SIZE + 1];
        let result = Frame::new(0x00, &large_payload);
        assert_eq!(result, Err(FrameError::PayloadTooLarge));
    }

    #[test]
    fn test_max_payload_encodes() {
        let frame = Frame::new(0x00, &[0x55; MAX_PAYLOAD_SIZE]).unwrap();
        let encoded = frame.encode_to_vec(true).unwrap();
        assert_eq!(encoded.len(), MAX_FRAME_SIZE);
        assert_eq!(encoded[MAX_PAYLOAD_SIZE + 1], 255);
    }
}

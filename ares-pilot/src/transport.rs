//! Framed serial link to the motion controller
//!
//! Sends are serialized through an async mutex around the writer. The
//! receive side feeds raw bytes through a [`FrameReader`] and dispatches
//! each valid report to a [`ReportHandler`]. Integrity failures never
//! reach the handler: the frame is dropped and a NACK is sent instead.

use core::cell::{Cell, RefCell};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::mutex::Mutex;
use embedded_io_async::{Error as _, Write};
use tracing::{debug, trace, warn};

use ares_protocol::{nack_frame, Frame, FrameReader, Instruction, Report, ReportError};

use crate::error::TransportError;

/// Receiver of reports parsed from the controller stream
#[allow(async_fn_in_trait)]
pub trait ReportHandler {
    async fn on_report(&self, report: Report);
}

/// Serial transport shared by the sender and the receive loop
pub struct Transport<M: RawMutex, W: Write> {
    writer: Mutex<M, W>,
    crc: bool,
    /// Last tracked instruction sent, consumed by the first NACK
    retransmit: BlockingMutex<M, Cell<Option<Instruction>>>,
    reader: BlockingMutex<M, RefCell<FrameReader>>,
}

impl<M: RawMutex, W: Write> Transport<M, W> {
    /// Create a transport; `crc` must match the controller firmware
    pub fn new(writer: W, crc: bool) -> Self {
        Self {
            writer: Mutex::new(writer),
            crc,
            retransmit: BlockingMutex::new(Cell::new(None)),
            reader: BlockingMutex::new(RefCell::new(FrameReader::new(crc))),
        }
    }

    pub fn crc_enabled(&self) -> bool {
        self.crc
    }

    /// Frame and send an instruction, waiting until it is flushed
    pub async fn send(&self, instruction: &Instruction) -> Result<(), TransportError> {
        let frame = instruction.to_frame().map_err(TransportError::Encode)?;
        if instruction.is_tracked() {
            self.retransmit.lock(|slot| slot.set(Some(*instruction)));
        }
        trace!(kind = ?instruction.kind(), "sending instruction");
        self.write_frame(&frame).await
    }

    /// Ask the controller to retransmit its last frame
    pub async fn send_nack(&self) -> Result<(), TransportError> {
        self.write_frame(&nack_frame()).await
    }

    /// Resend the last tracked instruction once
    ///
    /// A second NACK for the same instruction finds nothing to resend.
    pub async fn resend_last(&self) -> Result<bool, TransportError> {
        let Some(instruction) = self.retransmit.lock(|slot| slot.take()) else {
            debug!("NACK with nothing to retransmit");
            return Ok(false);
        };
        debug!(kind = ?instruction.kind(), "retransmitting after NACK");
        let frame = instruction.to_frame().map_err(TransportError::Encode)?;
        self.write_frame(&frame).await?;
        Ok(true)
    }

    async fn write_frame(&self, frame: &Frame) -> Result<(), TransportError> {
        let bytes = frame.encode_to_vec(self.crc).map_err(TransportError::Encode)?;
        let mut writer = self.writer.lock().await;
        writer
            .write_all(&bytes)
            .await
            .map_err(|e| TransportError::Write(e.kind()))?;
        writer
            .flush()
            .await
            .map_err(|e| TransportError::Write(e.kind()))
    }

    /// Feed received bytes and dispatch every completed frame
    pub async fn process_chunk<H: ReportHandler>(&self, bytes: &[u8], handler: &H) {
        for &byte in bytes {
            let Some(result) = self.reader.lock(|reader| reader.borrow_mut().push(byte)) else {
                continue;
            };

            match result {
                Ok(frame) => self.dispatch(&frame, handler).await,
                Err(error) => {
                    warn!(?error, "dropping malformed frame");
                    if let Err(error) = self.send_nack().await {
                        warn!(%error, "failed to send NACK");
                    }
                }
            }
        }
    }

    async fn dispatch<H: ReportHandler>(&self, frame: &Frame, handler: &H) {
        match Report::from_frame(frame) {
            Ok(Report::Nack) => {
                if let Err(error) = self.resend_last().await {
                    warn!(%error, "retransmission failed");
                }
            }
            Ok(report) => handler.on_report(report).await,
            Err(ReportError::UnknownKind(kind)) => {
                warn!(kind, "unknown report kind dropped");
            }
            Err(error) => warn!(?error, "unreadable report dropped"),
        }
    }

    /// Drop any partially received frame
    pub fn reset_reader(&self) {
        self.reader.lock(|reader| reader.borrow_mut().reset());
    }
}

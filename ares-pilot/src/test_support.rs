//! In-memory serial endpoints and a hand-driven clock for host tests

use core::cell::{Cell, RefCell};
use core::convert::Infallible;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use ares_core::traits::Timebase;
use ares_protocol::{CommandKind, Frame, FrameReader};
use embassy_futures::yield_now;
use embedded_io_async::{ErrorKind, ErrorType, Read, Write};

/// Serial sink whose bytes stay readable from the test
#[derive(Clone, Default)]
pub struct SharedSink(pub Rc<RefCell<Vec<u8>>>);

impl SharedSink {
    pub fn take(&self) -> Vec<u8> {
        core::mem::take(&mut *self.0.borrow_mut())
    }

    /// Kinds of every frame written so far, draining the sink
    pub fn take_kinds(&self, crc: bool) -> Vec<CommandKind> {
        frames(&self.take(), crc)
            .iter()
            .filter_map(|f| CommandKind::from_code(f.kind))
            .collect()
    }
}

impl ErrorType for SharedSink {
    type Error = Infallible;
}

impl Write for SharedSink {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Sink that rejects its first `failures` writes, then behaves like
/// [`SharedSink`]
pub struct FlakySink {
    pub inner: SharedSink,
    pub failures: u32,
}

impl ErrorType for FlakySink {
    type Error = ErrorKind;
}

impl Write for FlakySink {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if self.failures > 0 {
            self.failures -= 1;
            return Err(ErrorKind::Other);
        }
        self.inner.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Serial source replaying scripted chunks, then end-of-stream
#[derive(Default)]
pub struct ScriptedSource {
    chunks: VecDeque<Vec<u8>>,
}

impl ScriptedSource {
    pub fn new(chunks: impl IntoIterator<Item = Vec<u8>>) -> Self {
        Self {
            chunks: chunks.into_iter().collect(),
        }
    }
}

impl ErrorType for ScriptedSource {
    type Error = Infallible;
}

impl Read for ScriptedSource {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let Some(mut chunk) = self.chunks.pop_front() else {
            return Ok(0);
        };
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        if n < chunk.len() {
            chunk.drain(..n);
            self.chunks.push_front(chunk);
        }
        Ok(n)
    }
}

/// Clock that only moves when a task sleeps
///
/// Sleeping yields once so joined futures interleave, then advances the
/// clock by the requested amount.
#[derive(Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl Timebase for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }

    async fn sleep_ms(&self, ms: u32) {
        yield_now().await;
        self.now.set(self.now.get() + u64::from(ms));
    }
}

pub fn encoded(frame: &Frame, crc: bool) -> Vec<u8> {
    frame.encode_to_vec(crc).unwrap().to_vec()
}

/// Split a byte stream into frames at the terminator
pub fn frames(stream: &[u8], crc: bool) -> Vec<Frame> {
    let mut reader = FrameReader::new(crc);
    stream
        .iter()
        .filter_map(|&b| reader.push(b))
        .map(|r| r.unwrap())
        .collect()
}

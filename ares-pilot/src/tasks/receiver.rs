//! Serial receive task
//!
//! Reads the controller stream forever and feeds it through the transport.
//! A failed read or a closed stream is logged and retried after a pause.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_io_async::{Read, Write};
use tracing::{info, trace, warn};

use ares_core::traits::Timebase;

use crate::transport::{ReportHandler, Transport};

/// Buffer size for serial receive
pub const RX_BUF_SIZE: usize = 64;

/// Pause after a read error or end-of-stream (ms)
pub const READ_BACKOFF_MS: u32 = 100;

/// Read once and dispatch every frame the bytes complete
///
/// Returns the number of bytes read; zero means the stream is closed.
pub async fn receive_once<M, W, R, H>(
    rx: &mut R,
    transport: &Transport<M, W>,
    handler: &H,
    buf: &mut [u8],
) -> Result<usize, R::Error>
where
    M: RawMutex,
    W: Write,
    R: Read,
    H: ReportHandler,
{
    let n = rx.read(buf).await?;
    if n > 0 {
        trace!(bytes = n, "serial rx");
        transport.process_chunk(&buf[..n], handler).await;
    }
    Ok(n)
}

/// Receive loop, runs forever
pub async fn receiver_task<M, W, R, H, T>(
    mut rx: R,
    transport: &Transport<M, W>,
    handler: &H,
    timebase: T,
) where
    M: RawMutex,
    W: Write,
    R: Read,
    H: ReportHandler,
    T: Timebase,
{
    info!("receiver task started");

    let mut buf = [0u8; RX_BUF_SIZE];
    loop {
        match receive_once(&mut rx, transport, handler, &mut buf).await {
            Ok(n) if n > 0 => {}
            Ok(_) => {
                warn!("serial stream closed, waiting");
                transport.reset_reader();
                timebase.sleep_ms(READ_BACKOFF_MS).await;
            }
            Err(error) => {
                warn!(?error, "serial read failed");
                timebase.sleep_ms(READ_BACKOFF_MS).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ares_core::geometry::Pose;
    use ares_protocol::{Odometry, Report};
    use embassy_futures::block_on;
    use embassy_futures::select::{select, Either};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    use crate::rolling_basis::RollingBasis;
    use crate::test_support::{encoded, ManualClock, ScriptedSource, SharedSink};

    fn odometry_bytes(x: f32, y: f32) -> Vec<u8> {
        encoded(
            &Report::Odometry(Odometry { x, y, heading: 0.0 }).to_frame(),
            true,
        )
    }

    #[test]
    fn test_receive_once_reassembles_split_frame() {
        let transport: Transport<NoopRawMutex, _> = Transport::new(SharedSink::default(), true);
        let clock = ManualClock::default();
        let basis = RollingBasis::new(&transport, &clock);

        let bytes = odometry_bytes(12.0, 34.0);
        let (head, tail) = bytes.split_at(7);
        let mut rx = ScriptedSource::new([head.to_vec(), tail.to_vec()]);
        let mut buf = [0u8; RX_BUF_SIZE];

        block_on(async {
            assert_eq!(
                receive_once(&mut rx, &transport, &basis, &mut buf).await,
                Ok(7)
            );
            assert_eq!(basis.pose(), Pose::default());
            receive_once(&mut rx, &transport, &basis, &mut buf)
                .await
                .unwrap();
            assert_eq!(
                receive_once(&mut rx, &transport, &basis, &mut buf).await,
                Ok(0)
            );
        });

        assert_eq!(basis.pose(), Pose::new(12.0, 34.0, 0.0));
    }

    #[test]
    fn test_task_survives_bad_frame_and_closed_stream() {
        let sink = SharedSink::default();
        let transport: Transport<NoopRawMutex, _> = Transport::new(sink.clone(), true);
        let clock = ManualClock::default();
        let basis = RollingBasis::new(&transport, &clock);

        let mut garbage = odometry_bytes(1.0, 1.0);
        garbage[2] ^= 0x01;
        let rx = ScriptedSource::new([garbage, odometry_bytes(5.0, 6.0)]);

        let outcome = block_on(select(receiver_task(rx, &transport, &basis, &clock), async {
            while clock.now_ms() < u64::from(READ_BACKOFF_MS) * 3 {
                embassy_futures::yield_now().await;
            }
        }));

        assert!(matches!(outcome, Either::Second(())));
        assert_eq!(basis.pose(), Pose::new(5.0, 6.0, 0.0));
        // One NACK for the corrupted frame
        assert_eq!(sink.take_kinds(true), vec![ares_protocol::CommandKind::Nack]);
    }
}

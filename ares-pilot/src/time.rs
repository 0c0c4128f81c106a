//! [`Timebase`] backed by `embassy-time`

use ares_core::traits::Timebase;
use embassy_time::{Instant, Timer};

/// Wall clock of the embassy time driver
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyTimebase;

impl Timebase for EmbassyTimebase {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }

    async fn sleep_ms(&self, ms: u32) {
        Timer::after_millis(u64::from(ms)).await
    }
}

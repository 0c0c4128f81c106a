//! Clock and cooperative sleep

/// Monotonic clock with an async sleep
///
/// Waiting loops poll against `now_ms` and yield through `sleep_ms`, so a
/// test can drive time by hand.
#[allow(async_fn_in_trait)]
pub trait Timebase {
    /// Milliseconds since an arbitrary fixed origin
    fn now_ms(&self) -> u64;

    /// Suspend the calling task for at least `ms` milliseconds
    async fn sleep_ms(&self, ms: u32);
}

impl<T: Timebase> Timebase for &T {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }

    async fn sleep_ms(&self, ms: u32) {
        (**self).sleep_ms(ms).await
    }
}

//! Motion controller for the rolling base
//!
//! [`RollingBasis`] owns the command queue and the last reported pose. It
//! holds a [`Transport`] handle for sending and is itself the
//! [`ReportHandler`] the receive loop feeds, so odometry and completion
//! echoes are only ever written from the receive path.
//!
//! Waiting is cooperative: [`RollingBasis::go_to_and_wait`] polls the
//! completion counter and sleeps through the [`Timebase`] between checks,
//! so the anti-collision cycle and the receiver keep running alongside it.

use core::cell::{Cell, RefCell};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::mutex::Mutex;
use embedded_io_async::Write;
use tracing::{debug, info, warn};

use ares_core::acs::{ObjectiveOutcome, RecoveryPolicy, RecoveryStep};
use ares_core::geometry::{Point, Pose};
use ares_core::motion::{
    curve_command, go_to_command, resolve_target, CurveOptions, GoToOptions, MotionOutcome,
};
use ares_core::queue::{CommandId, CommandQueue};
use ares_core::traits::Timebase;
use ares_protocol::{HomePose, PidGains, Report, TrackedCommand, UntrackedCommand};

use crate::error::PilotError;
use crate::transport::{ReportHandler, Transport};

/// Default completion poll period (ms)
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 10;

/// Motion controller driving the rolling base over a [`Transport`]
pub struct RollingBasis<'a, M: RawMutex, W: Write, T: Timebase> {
    transport: &'a Transport<M, W>,
    queue: BlockingMutex<M, RefCell<CommandQueue>>,
    pose: BlockingMutex<M, Cell<Pose>>,
    /// Held while draining the queue so dispatch order matches queue order
    dispatch: Mutex<M, ()>,
    timebase: T,
    poll_interval_ms: u32,
}

impl<'a, M: RawMutex, W: Write, T: Timebase> RollingBasis<'a, M, W, T> {
    pub fn new(transport: &'a Transport<M, W>, timebase: T) -> Self {
        Self {
            transport,
            queue: BlockingMutex::new(RefCell::new(CommandQueue::new())),
            pose: BlockingMutex::new(Cell::new(Pose::default())),
            dispatch: Mutex::new(()),
            timebase,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }

    /// Override the completion poll period
    pub fn with_poll_interval(mut self, ms: u32) -> Self {
        self.poll_interval_ms = ms.max(1);
        self
    }

    /// Last pose reported by odometry
    pub fn pose(&self) -> Pose {
        self.pose.lock(Cell::get)
    }

    pub fn last_deleted_id(&self) -> u32 {
        self.queue.lock(|q| q.borrow().last_deleted_id())
    }

    pub fn id_counter(&self) -> u32 {
        self.queue.lock(|q| q.borrow().id_counter())
    }

    pub fn is_completed(&self, id: CommandId) -> bool {
        self.queue.lock(|q| q.borrow().is_completed(id))
    }

    /// Instructions queued or in flight
    pub fn pending(&self) -> usize {
        self.queue.lock(|q| q.borrow().len())
    }

    pub fn timebase(&self) -> &T {
        &self.timebase
    }

    /// Send whatever the queue allows to go out now
    async fn pump(&self) -> Result<(), PilotError> {
        let _order = self.dispatch.lock().await;
        while let Some(instruction) = self.queue.lock(|q| q.borrow_mut().next_dispatch()) {
            if let Err(error) = self.transport.send(&instruction).await {
                // A tracked head that never left stays queued for the next pump
                if instruction.is_tracked() {
                    self.queue.lock(|q| q.borrow_mut().release_head());
                }
                warn!(%error, kind = ?instruction.kind(), "dispatch failed");
                return Err(error.into());
            }
        }
        Ok(())
    }

    async fn enqueue_tracked(&self, command: TrackedCommand) -> Result<CommandId, PilotError> {
        let id = self
            .queue
            .lock(|q| q.borrow_mut().append_tracked(command, false))?;
        self.pump().await?;
        Ok(id)
    }

    async fn preempt(&self, command: UntrackedCommand) -> Result<(), PilotError> {
        self.queue
            .lock(|q| q.borrow_mut().append_untracked(command, true))?;
        self.pump().await
    }

    /// Queue a straight move and return its completion id
    pub async fn go_to(
        &self,
        target: Point,
        options: &GoToOptions,
    ) -> Result<CommandId, PilotError> {
        let target = resolve_target(&self.pose(), target, options.relative);
        debug!(x = target.x, y = target.y, forward = options.forward, "go to");
        self.enqueue_tracked(go_to_command(target, options)).await
    }

    /// Move to `target` and wait for the controller to finish
    ///
    /// On timeout the robot is stopped and the queue cleared before
    /// returning [`MotionOutcome::TimedOut`]. Transport failures while
    /// sending are returned as errors.
    pub async fn go_to_and_wait(
        &self,
        target: Point,
        tolerance: f32,
        timeout_ms: u32,
        options: &GoToOptions,
    ) -> Result<MotionOutcome, PilotError> {
        let target = resolve_target(&self.pose(), target, options.relative);
        let absolute = GoToOptions {
            relative: false,
            ..*options
        };
        let id = self.go_to(target, &absolute).await?;
        self.wait_for(id, target, tolerance, timeout_ms).await
    }

    /// Wait until `id` completes or `timeout_ms` passes
    pub async fn wait_for(
        &self,
        id: CommandId,
        target: Point,
        tolerance: f32,
        timeout_ms: u32,
    ) -> Result<MotionOutcome, PilotError> {
        let deadline = self.timebase.now_ms() + u64::from(timeout_ms);
        loop {
            if self.is_completed(id) {
                let outcome = MotionOutcome::settle(&self.pose(), target, tolerance);
                debug!(id = id.value(), ?outcome, "move finished");
                return Ok(outcome);
            }
            if self.timebase.now_ms() >= deadline {
                warn!(id = id.value(), timeout_ms, "move timed out, stopping");
                self.stop_and_clear_queue().await?;
                return Ok(MotionOutcome::TimedOut);
            }
            self.timebase.sleep_ms(self.poll_interval_ms).await;
        }
    }

    /// Straight move that applies `policy` when it ends off target
    ///
    /// A relative target is resolved once, so every retry aims at the same
    /// arena point.
    pub async fn go_to_and_wait_with_recovery(
        &self,
        target: Point,
        tolerance: f32,
        timeout_ms: u32,
        options: &GoToOptions,
        policy: &RecoveryPolicy,
    ) -> Result<ObjectiveOutcome, PilotError> {
        let target = resolve_target(&self.pose(), target, options.relative);
        let absolute = GoToOptions {
            relative: false,
            ..*options
        };

        let mut retries = 0u8;
        loop {
            match self
                .go_to_and_wait(target, tolerance, timeout_ms, &absolute)
                .await?
            {
                MotionOutcome::Success => return Ok(ObjectiveOutcome::Reached),
                MotionOutcome::TimedOut => return Ok(ObjectiveOutcome::TimedOut),
                MotionOutcome::ArrivedButOffTarget => {}
            }

            match policy.next_step(retries) {
                RecoveryStep::GiveUp => return Ok(ObjectiveOutcome::Failed),
                RecoveryStep::FailAfter(grace_ms) => {
                    self.timebase.sleep_ms(grace_ms).await;
                    return Ok(ObjectiveOutcome::Failed);
                }
                RecoveryStep::RetryAfter(grace_ms) => {
                    retries += 1;
                    info!(retry = retries, grace_ms, "move interrupted, retrying");
                    self.timebase.sleep_ms(grace_ms).await;
                }
                RecoveryStep::Exhausted => {
                    warn!(retries, "move interrupted on every retry");
                    return Ok(ObjectiveOutcome::RetryBoundExceeded);
                }
            }
        }
    }

    /// Queue an arc through a point `chord` to the left of the straight line
    pub async fn curve_go_to(
        &self,
        target: Point,
        chord: f32,
        interval: u16,
        options: &CurveOptions,
    ) -> Result<CommandId, PilotError> {
        let start = self.pose().position();
        let command = curve_command(start, target, chord, interval, options)
            .ok_or(PilotError::DegenerateCurve)?;
        self.enqueue_tracked(command).await
    }

    /// Halt now, dropping everything queued or in flight
    pub async fn stop_and_clear_queue(&self) -> Result<(), PilotError> {
        self.preempt(UntrackedCommand::KeepCurrentPosition).await
    }

    /// Drop queued instructions without sending anything
    pub fn clear_queue(&self) {
        self.queue.lock(|q| q.borrow_mut().clear());
    }

    pub async fn keep_current_position(&self) -> Result<(), PilotError> {
        self.preempt(UntrackedCommand::KeepCurrentPosition).await
    }

    pub async fn disable_pid(&self) -> Result<(), PilotError> {
        self.preempt(UntrackedCommand::DisablePid).await
    }

    pub async fn enable_pid(&self) -> Result<(), PilotError> {
        self.preempt(UntrackedCommand::EnablePid).await
    }

    /// Reset controller odometry to its home pose
    pub async fn reset_odometry(&self) -> Result<(), PilotError> {
        self.preempt(UntrackedCommand::ResetPosition).await
    }

    pub async fn set_pid(&self, gains: PidGains) -> Result<(), PilotError> {
        self.preempt(UntrackedCommand::SetPid(gains)).await
    }

    pub async fn set_home(&self, home: Pose) -> Result<(), PilotError> {
        self.preempt(UntrackedCommand::SetHome(HomePose {
            x: home.x,
            y: home.y,
            heading: home.heading,
        }))
        .await
    }

    /// Cut motor power
    pub async fn stop(&self) -> Result<(), PilotError> {
        self.preempt(UntrackedCommand::Stop).await
    }

    /// Insert an untracked instruction at `index` without clearing
    pub async fn insert_untracked(
        &self,
        index: usize,
        command: UntrackedCommand,
    ) -> Result<(), PilotError> {
        self.queue
            .lock(|q| q.borrow_mut().insert(index, command.into()))?;
        self.pump().await
    }
}

impl<M: RawMutex, W: Write, T: Timebase> ReportHandler for RollingBasis<'_, M, W, T> {
    async fn on_report(&self, report: Report) {
        match report {
            Report::Odometry(odometry) => {
                let pose = Pose::new(odometry.x, odometry.y, odometry.heading);
                self.pose.lock(|p| p.set(pose));
            }
            Report::ActionFinished(kind) => {
                let removed = self.queue.lock(|q| q.borrow_mut().on_completion(kind));
                if removed == 0 {
                    debug!(?kind, "completion for an instruction no longer queued");
                }
                if let Err(error) = self.pump().await {
                    warn!(%error, "failed to dispatch next instruction");
                }
            }
            Report::Print(text) => info!(target: "controller", "{}", text.as_str()),
            Report::UnknownCommand(code) => warn!(code, "controller rejected command"),
            // Retransmission is handled by the transport
            Report::Nack => {}
        }
    }
}

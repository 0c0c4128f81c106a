//! Anti-collision scan cycle
//!
//! Each cycle scans the lidar, refreshes the opponent belief in the shared
//! arena and stops the robot when the engine triggers. Noticing that a move
//! was cut short is left to the waiting caller, which sees the move end off
//! target.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embedded_io_async::Write;
use tracing::{info, warn};

use ares_core::acs::{AcsStatus, AntiCollision, AntiCollisionConfig};
use ares_core::arena::Arena;
use ares_core::traits::{Lidar, StatusIndicator, Timebase};

use crate::rolling_basis::RollingBasis;

/// Anti-collision engine plus the trigger state seen by the last cycle
#[derive(Debug, Clone)]
pub struct CollisionGuard {
    engine: AntiCollision,
    triggered: bool,
}

impl CollisionGuard {
    pub fn new(config: AntiCollisionConfig) -> Self {
        Self {
            engine: AntiCollision::new(config),
            triggered: false,
        }
    }

    pub fn engine(&self) -> &AntiCollision {
        &self.engine
    }

    /// Mutable engine access, e.g. to switch detection mode mid-match
    pub fn engine_mut(&mut self) -> &mut AntiCollision {
        &mut self.engine
    }

    /// Whether the last cycle held the robot
    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    /// Run one scan and react to it
    ///
    /// The robot is stopped on the first triggering cycle, and again on any
    /// later triggering cycle that finds new motion queued. The indicator
    /// only hears about changes.
    pub async fn scan_cycle<M, W, T, L, S>(
        &mut self,
        lidar: &mut L,
        arena: &BlockingMutex<M, RefCell<Arena>>,
        basis: &RollingBasis<'_, M, W, T>,
        indicator: &mut S,
    ) -> Result<AcsStatus, L::Error>
    where
        M: RawMutex,
        W: Write,
        T: Timebase,
        L: Lidar,
        S: StatusIndicator,
    {
        let samples = lidar.scan()?;
        let pose = basis.pose();

        let engine = &self.engine;
        let opponent = arena.lock(|arena| {
            let mut arena = arena.borrow_mut();
            let opponent = engine.locate_opponent(&pose, &samples, &arena);
            arena.set_opponent(opponent);
            opponent
        });

        let status = self.engine.evaluate(&pose, opponent);
        if let AcsStatus::Triggered {
            obstacle,
            distance,
            bearing,
        } = status
        {
            if !self.triggered || basis.pending() > 0 {
                warn!(
                    x = obstacle.x,
                    y = obstacle.y,
                    distance,
                    bearing,
                    "obstacle in range, stopping"
                );
                if let Err(error) = basis.stop_and_clear_queue().await {
                    warn!(%error, "failed to stop after anti-collision trigger");
                }
            }
        }

        let triggered = status.is_triggered();
        if triggered != self.triggered {
            if !triggered {
                info!("anti-collision cleared");
            }
            indicator.show_collision_status(triggered);
            self.triggered = triggered;
        }

        Ok(status)
    }
}

/// Periodic anti-collision loop, runs forever
///
/// Lidar faults are logged and the next cycle runs on schedule.
pub async fn anti_collision_task<M, W, T, L, S>(
    mut guard: CollisionGuard,
    mut lidar: L,
    arena: &BlockingMutex<M, RefCell<Arena>>,
    basis: &RollingBasis<'_, M, W, T>,
    mut indicator: S,
) where
    M: RawMutex,
    W: Write,
    T: Timebase,
    L: Lidar,
    S: StatusIndicator,
{
    let period_ms = guard.engine().config().scan_period_ms.max(1);
    info!(period_ms, mode = ?guard.engine().config().mode, "anti-collision task started");

    loop {
        if let Err(error) = guard
            .scan_cycle(&mut lidar, arena, basis, &mut indicator)
            .await
        {
            warn!(?error, "lidar scan failed");
        }
        basis.timebase().sleep_ms(period_ms).await;
    }
}

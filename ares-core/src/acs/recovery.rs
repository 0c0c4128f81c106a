//! What to do after anti-collision interrupted a move

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reaction to a move that ended off target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "policy", rename_all = "snake_case"))]
pub enum RecoveryPolicy {
    /// Fail the objective immediately
    #[default]
    GiveUp,
    /// Wait, then fail the objective
    WaitThenFail { grace_ms: u32 },
    /// Wait, then issue the same move again, at most `max_retries` times
    WaitThenRetry { grace_ms: u32, max_retries: u8 },
}

/// Next action chosen by a [`RecoveryPolicy`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecoveryStep {
    /// Fail now
    GiveUp,
    /// Sleep, then fail
    FailAfter(u32),
    /// Sleep, then retry
    RetryAfter(u32),
    /// Retry budget used up
    Exhausted,
}

impl RecoveryPolicy {
    /// Decide what to do after `retries_done` retries have already failed
    pub fn next_step(&self, retries_done: u8) -> RecoveryStep {
        match *self {
            Self::GiveUp => RecoveryStep::GiveUp,
            Self::WaitThenFail { grace_ms } => RecoveryStep::FailAfter(grace_ms),
            Self::WaitThenRetry {
                grace_ms,
                max_retries,
            } => {
                if retries_done < max_retries {
                    RecoveryStep::RetryAfter(grace_ms)
                } else {
                    RecoveryStep::Exhausted
                }
            }
        }
    }
}

/// Final result of an objective move, after recovery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ObjectiveOutcome {
    /// Target reached within tolerance
    Reached,
    /// Deadline passed before completion
    TimedOut,
    /// Interrupted and the policy gave up
    Failed,
    /// Interrupted on every allowed retry
    RetryBoundExceeded,
}

impl ObjectiveOutcome {
    pub fn is_reached(self) -> bool {
        self == Self::Reached
    }
}

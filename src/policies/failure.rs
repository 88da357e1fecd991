//! # Failure policy for periodic ticks.
//!
//! [`FailurePolicy`] decides whether a periodic task keeps ticking after a tick fails.
//!
//! - [`FailurePolicy::Continue`] log (publish `TickFailed`) and keep the cadence (default).
//! - [`FailurePolicy::Stop`] end the loop on the first failure and keep the error for the owner.
//!
//! ## Rules
//! ```text
//! TaskError::Fail     → Continue: next tick as scheduled    Stop: loop ends
//! TaskError::Panicked → Continue: next tick as scheduled    Stop: loop ends
//! TaskError::Fatal    → loop ends under every policy
//! ```
//!
//! When the loop ends this way the task is observably stopped; the error can be
//! collected with [`PeriodicTask::take_failure`](crate::PeriodicTask::take_failure).

use crate::error::TaskError;

/// Policy controlling whether a task keeps ticking after a failed tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Publish the failure and keep ticking (default). Fatal errors still end the loop.
    #[default]
    Continue,
    /// End the loop on the first failure.
    Stop,
}

impl FailurePolicy {
    /// Returns `true` when the loop should keep ticking after `err`.
    #[inline]
    pub fn should_continue(&self, err: &TaskError) -> bool {
        match self {
            FailurePolicy::Continue => err.is_recoverable(),
            FailurePolicy::Stop => false,
        }
    }
}

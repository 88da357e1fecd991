//! # Periodic task configuration.
//!
//! Provides [`PeriodicConfig`], the per-task settings that are not the callback or the period.
//!
//! Config is used in two ways:
//! 1. **Task creation**: `PeriodicTask::builder(task, period).with_config(cfg)`
//! 2. **Observer creation**: `Observer::new(&cfg, subscribers)` (bus capacity)
//!
//! ## Sentinel values
//! - `stack_size = 0` → platform default stack size for the background thread
//! - `bus_capacity = 0` → clamped to 1

use std::borrow::Cow;

use crate::policies::FailurePolicy;

/// Configuration for a periodic task.
///
/// ## Field semantics
/// - `failure`: What to do after a failed tick (default: keep ticking)
/// - `stack_size`: Background thread stack size in bytes (`0` = platform default)
/// - `thread_prefix`: Prefix of the background thread name (`"{prefix}:{task}"`)
/// - `bus_capacity`: Event bus ring buffer size used by [`Observer`](crate::Observer) (min 1)
///
/// ## Notes
/// All fields are public for flexibility. Prefer the helper accessors to avoid
/// sprinkling sentinel checks (`0`) across the codebase.
#[derive(Clone, Debug)]
pub struct PeriodicConfig {
    /// Failure handling for ticks.
    pub failure: FailurePolicy,

    /// Stack size of the background thread.
    ///
    /// - `0` = platform default
    /// - `n > 0` = exactly `n` bytes (subject to platform minimums)
    pub stack_size: usize,

    /// Prefix of the background thread name.
    pub thread_prefix: Cow<'static, str>,

    /// Capacity of the event bus broadcast channel.
    ///
    /// Receivers that lag behind more than `bus_capacity` events skip older items.
    pub bus_capacity: usize,
}

impl PeriodicConfig {
    /// Returns the stack size as an `Option`.
    ///
    /// - `None` → platform default
    /// - `Some(n)` → explicit stack size
    #[inline]
    pub fn stack_size_opt(&self) -> Option<usize> {
        if self.stack_size == 0 {
            None
        } else {
            Some(self.stack_size)
        }
    }

    /// Returns the background thread name for `task`.
    #[inline]
    pub fn thread_name(&self, task: &str) -> String {
        format!("{}:{}", self.thread_prefix, task)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for PeriodicConfig {
    /// Default configuration:
    ///
    /// - `failure = FailurePolicy::Continue`
    /// - `stack_size = 0` (platform default)
    /// - `thread_prefix = "tick"`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            failure: FailurePolicy::default(),
            stack_size: 0,
            thread_prefix: Cow::Borrowed("tick"),
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels() {
        let mut cfg = PeriodicConfig::default();
        assert_eq!(cfg.stack_size_opt(), None);
        cfg.stack_size = 256 * 1024;
        assert_eq!(cfg.stack_size_opt(), Some(256 * 1024));

        cfg.bus_capacity = 0;
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }

    #[test]
    fn test_thread_name() {
        let cfg = PeriodicConfig::default();
        assert_eq!(cfg.thread_name("heartbeat"), "tick:heartbeat");
    }
}

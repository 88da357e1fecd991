//! Error types used by periodic tasks and their callbacks.
//!
//! This module defines two main error enums:
//!
//! - [`SpawnError`]: errors raised while starting a task's background thread.
//! - [`TaskError`]: errors raised by individual ticks of a callback.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics
//! and additional utilities such as [`TaskError::is_recoverable`].

use thiserror::Error;

/// # Errors produced when a periodic task is started.
///
/// Stopping and dropping never fail; only bringing an execution up can.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SpawnError {
    /// The period was zero; a tick cadence needs a positive period.
    #[error("period must be greater than zero")]
    ZeroPeriod,

    /// Start was requested on a task that holds no callback.
    #[error("task has no callback bound")]
    Empty,

    /// The OS refused to create the background thread.
    #[error("failed to spawn background thread: {source}")]
    Thread {
        /// Underlying I/O error from `std::thread::Builder::spawn`.
        #[source]
        source: std::io::Error,
    },
}

impl SpawnError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use tickvisor::SpawnError;
    ///
    /// assert_eq!(SpawnError::ZeroPeriod.as_label(), "spawn_zero_period");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SpawnError::ZeroPeriod => "spawn_zero_period",
            SpawnError::Empty => "spawn_empty",
            SpawnError::Thread { .. } => "spawn_thread",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SpawnError::ZeroPeriod => "zero period".to_string(),
            SpawnError::Empty => "no callback".to_string(),
            SpawnError::Thread { source } => format!("thread spawn: {source}"),
        }
    }
}

/// # Errors produced by a single tick.
///
/// What happens next is decided by [`FailurePolicy`](crate::FailurePolicy):
/// recoverable errors may let the loop continue, [`TaskError::Fatal`] always ends it.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Tick failed but the next one may succeed.
    #[error("tick failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Non-recoverable error; the loop ends regardless of policy.
    #[error("fatal error (no further ticks): {error}")]
    Fatal {
        /// The underlying error message.
        error: String,
    },

    /// The callback panicked; the panic was caught at the tick boundary.
    #[error("callback panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl TaskError {
    /// Shorthand for [`TaskError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        TaskError::Fail {
            error: error.into(),
        }
    }

    /// Shorthand for [`TaskError::Fatal`].
    pub fn fatal(error: impl Into<String>) -> Self {
        TaskError::Fatal {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use tickvisor::TaskError;
    ///
    /// assert_eq!(TaskError::fail("boom").as_label(), "tick_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "tick_failed",
            TaskError::Fatal { .. } => "tick_fatal",
            TaskError::Panicked { .. } => "tick_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Fatal { error } => format!("fatal: {error}"),
            TaskError::Panicked { info } => format!("panic: {info}"),
        }
    }

    /// Indicates whether the loop may keep ticking after this error.
    ///
    /// Returns `true` for [`TaskError::Fail`] and [`TaskError::Panicked`],
    /// `false` for [`TaskError::Fatal`].
    ///
    /// # Example
    /// ```
    /// use tickvisor::TaskError;
    ///
    /// assert!(TaskError::fail("flaky").is_recoverable());
    /// assert!(!TaskError::fatal("gone").is_recoverable());
    /// ```
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TaskError::Fail { .. } | TaskError::Panicked { .. })
    }
}

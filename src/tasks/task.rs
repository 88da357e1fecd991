//! # Task abstraction.
//!
//! This module defines the [`Task`] trait: the callback a periodic task invokes once per tick.
//! The owned handle type is [`TaskBox`], a `Box<dyn Task>` that can move between threads.
//!
//! A task is invoked from the background thread **while the task's lock is held**,
//! so it must return promptly and must never call back into the owning
//! [`PeriodicTask`](crate::PeriodicTask) (stop, assign, replace, detach): doing so deadlocks.

use crate::error::TaskError;

/// # Named unit of periodic work.
///
/// A `Task` has a stable [`name`](Task::name) and a [`tick`](Task::tick) method called once per period.
///
/// # Example
/// ```
/// use tickvisor::{Task, TaskError};
///
/// struct Heartbeat {
///     beats: u64,
/// }
///
/// impl Task for Heartbeat {
///     fn name(&self) -> &str { "heartbeat" }
///
///     fn tick(&mut self) -> Result<(), TaskError> {
///         self.beats += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Task: Send + 'static {
    /// Returns a stable, human-readable task name.
    fn name(&self) -> &str;

    /// Runs one tick.
    ///
    /// Panics are caught at the tick boundary and reported as [`TaskError::Panicked`].
    fn tick(&mut self) -> Result<(), TaskError>;
}

/// Owned, type-erased task.
pub type TaskBox = Box<dyn Task>;

impl<T: Task + ?Sized> Task for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn tick(&mut self) -> Result<(), TaskError> {
        (**self).tick()
    }
}

//! # Closure-backed task (`TaskFn`)
//!
//! [`TaskFn`] wraps a closure `F: FnMut() -> Result<(), TaskError>`, invoked once per tick.
//!
//! ## Concurrency semantics
//! - The closure is only ever called from the task's background thread, one tick at a time,
//!   so `FnMut` state needs no extra synchronization.
//! - State shared with other threads still needs `Arc<...>` inside the closure.
//!
//! ## Example
//! ```rust
//! use tickvisor::{Task, TaskFn, TaskError};
//!
//! let mut polls = 0u32;
//! let mut t = TaskFn::new("poller", move || {
//!     polls += 1;
//!     Ok::<_, TaskError>(())
//! });
//!
//! assert_eq!(t.name(), "poller");
//! assert!(t.tick().is_ok());
//! ```

use std::borrow::Cow;

use crate::error::TaskError;
use crate::tasks::task::{Task, TaskBox};

/// Closure-backed task implementation.
pub struct TaskFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> TaskFn<F> {
    /// Creates a new closure-backed task.
    ///
    /// Prefer [`TaskFn::boxed`] when you immediately need a [`TaskBox`].
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> TaskFn<F>
where
    F: FnMut() -> Result<(), TaskError> + Send + 'static,
{
    /// Creates the task and returns it as an owned handle (`Box<dyn Task>`).
    pub fn boxed(name: impl Into<Cow<'static, str>>, f: F) -> TaskBox {
        Box::new(Self::new(name, f))
    }
}

impl TaskFn<()> {
    /// Wraps a plain callback with no result; every tick succeeds unless it panics.
    pub fn infallible<G>(
        name: impl Into<Cow<'static, str>>,
        mut g: G,
    ) -> TaskFn<impl FnMut() -> Result<(), TaskError> + Send + 'static>
    where
        G: FnMut() + Send + 'static,
    {
        TaskFn::new(name, move || {
            g();
            Ok(())
        })
    }
}

impl<F> Task for TaskFn<F>
where
    F: FnMut() -> Result<(), TaskError> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn tick(&mut self) -> Result<(), TaskError> {
        (self.f)()
    }
}

impl<F> std::fmt::Debug for TaskFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskFn").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infallible_counts_calls() {
        let mut calls = 0u32;
        let mut t = TaskFn::infallible("count", move || {
            calls += 1;
            assert!(calls <= 2);
        });
        assert!(t.tick().is_ok());
        assert!(t.tick().is_ok());
        assert_eq!(t.name(), "count");
    }

    #[test]
    fn test_boxed_forwards_errors() {
        let mut t = TaskFn::boxed("flaky", || Err(TaskError::fail("nope")));
        assert_eq!(t.name(), "flaky");
        assert_eq!(t.tick(), Err(TaskError::fail("nope")));
    }
}

//! # Task abstractions.
//!
//! This module provides the callback capability driven by a periodic task:
//! - [`Task`] - trait for a named unit invoked once per tick
//! - [`TaskFn`] - closure-backed task implementation
//! - [`TaskBox`] - owned, type-erased task (`Box<dyn Task>`)

mod task;
mod task_fn;

pub use task::{Task, TaskBox};
pub use task_fn::TaskFn;

//! # Run a single tick of a task.
//!
//! Invokes [`Task::tick`] once, isolates panics, and publishes the outcome to [`Bus`].
//!
//! ## Event flow
//!
//! ```text
//! Success:
//!   task.tick() → Ok(()) → publish TickCompleted
//!
//! Failure:
//!   task.tick() → Err(Fail/Fatal) → publish TickFailed
//!
//! Panic:
//!   task.tick() → unwind → caught → Err(Panicked) → publish TickFailed
//! ```
//!
//! ## Rules
//! - Always publishes **exactly one** event per tick (when a bus is attached)
//! - Never unwinds into the caller: the background loop survives a panicking callback
//! - Whether the loop continues is **not** decided here (see `core::worker`)

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use crate::{
    error::TaskError,
    events::{Bus, Event, EventKind},
    tasks::Task,
};

/// Executes one tick of `task`, publishing the outcome to `bus`.
///
/// `tick` is the 1-based tick number and `lag` how late the tick fired relative
/// to its scheduled deadline; both are only used for events.
pub(crate) fn run_tick<T: Task + ?Sized>(
    task: &mut T,
    tick: u64,
    lag: Duration,
    bus: Option<&Bus>,
) -> Result<(), TaskError> {
    let res = match panic::catch_unwind(AssertUnwindSafe(|| task.tick())) {
        Ok(r) => r,
        Err(payload) => Err(TaskError::Panicked {
            info: panic_info(payload.as_ref()),
        }),
    };

    if let Some(bus) = bus {
        match &res {
            Ok(()) => publish_completed(bus, task.name(), tick, lag),
            Err(e) => publish_failed(bus, task.name(), tick, lag, e),
        }
    }
    res
}

/// Renders a panic payload as text.
pub(crate) fn panic_info(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Publishes `TickCompleted` event.
fn publish_completed(bus: &Bus, name: &str, tick: u64, lag: Duration) {
    bus.publish(
        Event::new(EventKind::TickCompleted)
            .with_task(name)
            .with_tick(tick)
            .with_lag(lag),
    );
}

/// Publishes `TickFailed` event with error details.
fn publish_failed(bus: &Bus, name: &str, tick: u64, lag: Duration, err: &TaskError) {
    bus.publish(
        Event::new(EventKind::TickFailed)
            .with_task(name)
            .with_tick(tick)
            .with_lag(lag)
            .with_reason(err.to_string()),
    );
}

//! # tickvisor
//!
//! **Tickvisor** runs a callback once per fixed period on a dedicated thread, until the
//! task is stopped or dropped. It is a building block for periodic maintenance work
//! (heartbeats, polling, metrics flushing) inside larger programs.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   owner thread                                    background thread
//! ┌──────────────────────┐                      ┌──────────────────────────┐
//! │ PeriodicTask         │                      │ Worker::run()            │
//! │  - start()  ─────────┼─ spawn + handshake ─►│  STARTING → RUNNING      │
//! │  - stop() / drop ────┼─ should_stop ───────►│  wait(deadline | stop)   │
//! │  - take() / assign() │◄─ running = false ───┼─ STOPPING → STOPPED      │
//! │  - detach()/replace()│                      │  run_tick() under lock   │
//! └──────────┬───────────┘                      └────────────┬─────────────┘
//!            │       ┌────────────────────────────────┐       │
//!            └──────►│ Shared: Mutex<State> + Condvar │◄──────┘
//!                    │  task, period, running,        │
//!                    │  should_stop, ticks, failure   │
//!                    └────────────────────────────────┘
//!                                                               publish(Event)
//!                                                                    ▼
//!                        Observer: Bus ──► listener ──► SubscriberSet ──► Subscribe
//! ```
//!
//! ### Lifecycle
//! ```text
//! new(callback, period)
//!   └─► spawn thread, block until it reports "running"
//!
//! loop (background thread, lock held except while waiting) {
//!   ├─► wait until deadline or stop request
//!   ├─► stop requested ─► running = false, notify owner, exit
//!   ├─► run_tick(callback)          (panics caught → TaskError::Panicked)
//!   │       ├─ Ok                     ─► publish TickCompleted
//!   │       └─ Err ─► publish TickFailed
//!   │                 └─ FailurePolicy forbids ─► record failure, TaskAborted, exit
//!   └─► deadline += period          (fixed increments: no drift)
//! }
//!
//! stop() / drop: should_stop = true, wait until "stopped", join thread
//! ```
//!
//! ## Features
//! | Area              | Description                                                     | Key types / traits                          |
//! |-------------------|-----------------------------------------------------------------|---------------------------------------------|
//! | **Tasks**         | Define the periodic callback as a closure or a type.            | [`Task`], [`TaskFn`], [`TaskBox`]           |
//! | **Lifecycle**     | Start/stop handshakes, ownership transfer, detach/resume.       | [`PeriodicTask`], [`Detached`]              |
//! | **Policies**      | Decide what a failed tick does to the loop.                     | [`FailurePolicy`]                           |
//! | **Configuration** | Thread naming, stack size, failure policy, bus capacity.        | [`PeriodicConfig`], [`PeriodicTaskBuilder`] |
//! | **Subscriber API**| Observe lifecycle and tick events (logging, metrics).           | [`Subscribe`], [`Observer`], [`Event`]      |
//! | **Errors**        | Typed errors for starting tasks and for ticks.                  | [`SpawnError`], [`TaskError`]               |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in `LogWriter` subscriber _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tickvisor::{FailurePolicy, PeriodicTask, TaskError, TaskFn};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut polls = 0u32;
//!     let poller = TaskFn::new("poller", move || {
//!         polls += 1;
//!         if polls > 1_000 {
//!             return Err(TaskError::fatal("enough"));
//!         }
//!         Ok(())
//!     });
//!
//!     let mut task = PeriodicTask::builder(poller, Duration::from_millis(20))
//!         .with_failure_policy(FailurePolicy::Continue)
//!         .spawn()?;
//!
//!     std::thread::sleep(Duration::from_millis(70));
//!     task.stop();
//!     assert!(task.ticks() >= 2);
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod policies;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use crate::core::{Detached, PeriodicConfig, PeriodicTask, PeriodicTaskBuilder};
pub use error::{SpawnError, TaskError};
pub use events::{Bus, Event, EventKind};
pub use policies::FailurePolicy;
pub use subscribers::{Observer, Subscribe, SubscriberSet};
pub use tasks::{Task, TaskBox, TaskFn};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;

//! # State shared between a task's owner and its background thread.
//!
//! One lock guards every field of [`State`]; one condition variable carries both handshakes:
//!
//! ```text
//! owner                                   background thread
//! ─────                                   ─────────────────
//! lock; spawn thread; wait(!running) ◄─┐
//!                                      └─ lock; running = true; notify
//! lock; should_stop = true; notify ───┐
//! wait(running == false)          ◄─┐ └─► wakes from timed wait, sees should_stop
//!                                   └──── running = false; notify; unlock; exit
//! join thread
//! ```
//!
//! ## Ownership of fields
//! - `should_stop`: written by the owner only, false → true once per execution
//!   (reset after the execution has been joined).
//! - `running`: written by the background thread only.
//! - `task`, `period`: written by the owner only while no execution is alive.
//! - `ticks`, `failure`: written by the background thread, read/taken by the owner.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use crate::error::TaskError;
use crate::tasks::TaskBox;

/// Lock + condition variable + state block of one periodic task.
pub(crate) struct Shared {
    /// Task name, fixed for the lifetime of this block.
    pub name: Arc<str>,
    pub state: Mutex<State>,
    pub cv: Condvar,
}

/// Fields guarded by [`Shared::state`].
pub(crate) struct State {
    /// Callback; `None` once handed off.
    pub task: Option<TaskBox>,
    pub period: Duration,
    /// Background thread is between "signaled started" and "signaled stopped".
    pub running: bool,
    /// Stop request from the owner.
    pub should_stop: bool,
    /// Lifetime tick counter (never reset across restarts).
    pub ticks: u64,
    /// Error that ended the loop under the failure policy.
    pub failure: Option<TaskError>,
}

impl Shared {
    pub fn new(task: TaskBox, period: Duration) -> Arc<Self> {
        Arc::new(Self {
            name: Arc::from(task.name()),
            state: Mutex::new(State {
                task: Some(task),
                period,
                running: false,
                should_stop: false,
                ticks: 0,
                failure: None,
            }),
            cv: Condvar::new(),
        })
    }
}

//! # Worker: the background thread of a periodic task.
//!
//! Drives one execution of the tick loop. Each execution is a fresh instance of this state machine:
//!
//! ```text
//! STARTING ──► RUNNING ──► STOPPING ──► STOPPED (terminal)
//!
//! STARTING: lock; running = true; notify owner; deadline = now + period
//! RUNNING:  wait(until deadline, while !should_stop)
//!             ├─ should_stop      ─► STOPPING
//!             └─ deadline reached ─► run_tick() under the lock
//!                                     ├─ Ok / policy allows ─► deadline += period, RUNNING
//!                                     └─ policy forbids     ─► record failure, STOPPING
//! STOPPING: running = false; notify owner; unlock; exit
//! ```
//!
//! ## Rules
//! - The lock is held for the whole loop except while waiting, so the callback runs
//!   **under the lock**: a stop request issued mid-tick queues until the tick returns.
//! - Deadlines advance by fixed increments from the first one (drift-free). A deadline
//!   already in the past fires immediately, so a slow tick delays the next ones without
//!   shifting the cadence.
//! - `should_stop` is checked before every tick, also when the deadline elapsed at the
//!   same moment.

use std::sync::Arc;
use std::time::Instant;

use crate::{
    core::{runner::run_tick, shared::Shared},
    events::{Bus, Event, EventKind},
    policies::FailurePolicy,
};

/// Background loop of a single execution.
pub(crate) struct Worker {
    shared: Arc<Shared>,
    failure: FailurePolicy,
    bus: Option<Bus>,
}

impl Worker {
    pub fn new(shared: Arc<Shared>, failure: FailurePolicy, bus: Option<Bus>) -> Self {
        Self {
            shared,
            failure,
            bus,
        }
    }

    /// Runs until a stop request is observed or the failure policy ends the loop.
    pub fn run(self) {
        let shared = &*self.shared;
        let mut st = shared.state.lock();

        st.running = true;
        shared.cv.notify_all();
        self.publish(Event::new(EventKind::TaskStarted).with_period(st.period));

        // `None`: the period overflows the clock, so only a stop request ends the wait.
        let mut deadline = Instant::now().checked_add(st.period);
        let mut aborted = false;

        loop {
            match deadline {
                Some(at) => {
                    shared
                        .cv
                        .wait_while_until(&mut st, |s| !s.should_stop, at);
                }
                None => shared.cv.wait_while(&mut st, |s| !s.should_stop),
            }
            if st.should_stop {
                break;
            }
            let Some(at) = deadline else {
                continue;
            };

            st.ticks += 1;
            let tick = st.ticks;
            let lag = Instant::now().saturating_duration_since(at);
            let Some(task) = st.task.as_mut() else {
                break;
            };

            if let Err(err) = run_tick(task.as_mut(), tick, lag, self.bus.as_ref()) {
                if !self.failure.should_continue(&err) {
                    self.publish(
                        Event::new(EventKind::TaskAborted)
                            .with_tick(tick)
                            .with_reason(err.to_string()),
                    );
                    st.failure = Some(err);
                    aborted = true;
                    break;
                }
            }
            deadline = at.checked_add(st.period);
        }

        st.running = false;
        shared.cv.notify_all();
        if !aborted {
            self.publish(Event::new(EventKind::TaskStopped).with_tick(st.ticks));
        }
    }

    fn publish(&self, ev: Event) {
        if let Some(bus) = &self.bus {
            bus.publish(ev.with_task(Arc::clone(&self.shared.name)));
        }
    }
}

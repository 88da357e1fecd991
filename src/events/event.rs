//! # Events emitted by periodic tasks and subscriber workers.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Lifecycle events**: execution flow (started, stop requested, stopped, aborted, detached)
//! - **Tick events**: outcome of each tick (completed, failed)
//! - **Subscriber events**: delivery problems (overflow, panic)
//!
//! The [`Event`] struct carries additional metadata such as timestamps, task name,
//! tick number, period, lag behind the scheduled deadline and reasons.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tickvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TickFailed)
//!     .with_task("heartbeat")
//!     .with_reason("boom")
//!     .with_tick(3)
//!     .with_period(Duration::from_secs(1));
//!
//! assert_eq!(ev.kind, EventKind::TickFailed);
//! assert_eq!(ev.task.as_deref(), Some("heartbeat"));
//! assert_eq!(ev.period_ms, Some(1000));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    // === Lifecycle events ===
    /// Background thread confirmed it is running (start handshake completed).
    ///
    /// Sets:
    /// - `task`: task name
    /// - `period_ms`: tick period
    TaskStarted,

    /// Owner asked the background thread to stop.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `tick`: ticks fired so far
    StopRequested,

    /// Background thread observed the stop request and exited its loop.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `tick`: ticks fired so far
    TaskStopped,

    /// Loop ended on its own because the failure policy forbids continuing.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `tick`: failing tick number
    /// - `reason`: failure message
    TaskAborted,

    /// Callback and period were detached from their owner.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `period_ms`: tick period
    TaskDetached,

    // === Tick events ===
    /// A tick finished successfully.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `tick`: tick number (1-based, lifetime counter)
    /// - `lag_ms`: how late the tick fired relative to its deadline
    TickCompleted,

    /// A tick failed (error or caught panic).
    ///
    /// Sets:
    /// - `task`: task name
    /// - `tick`: tick number
    /// - `lag_ms`: how late the tick fired relative to its deadline
    /// - `reason`: failure message
    TickFailed,
}

/// Event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the task (or subscriber), if applicable.
    pub task: Option<Arc<str>>,
    /// Tick number (1-based lifetime counter).
    pub tick: Option<u64>,
    /// Tick period in milliseconds (compact).
    pub period_ms: Option<u32>,
    /// Delay between the scheduled deadline and the actual tick in milliseconds (compact).
    pub lag_ms: Option<u32>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            tick: None,
            period_ms: None,
            lag_ms: None,
            reason: None,
        }
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a tick number.
    #[inline]
    pub fn with_tick(mut self, n: u64) -> Self {
        self.tick = Some(n);
        self
    }

    /// Attaches the tick period (stored as milliseconds).
    #[inline]
    pub fn with_period(mut self, d: Duration) -> Self {
        self.period_ms = Some(compact_ms(d));
        self
    }

    /// Attaches the lag behind the scheduled deadline (stored as milliseconds).
    #[inline]
    pub fn with_lag(mut self, d: Duration) -> Self {
        self.lag_ms = Some(compact_ms(d));
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_task(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_task(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }

    #[inline]
    pub fn is_subscriber_panic(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberPanicked)
    }
}

fn compact_ms(d: Duration) -> u32 {
    d.as_millis().min(u128::from(u32::MAX)) as u32
}

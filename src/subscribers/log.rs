//! # LogWriter: simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [started] task="heartbeat" period=1000ms
//! [tick] task="heartbeat" n=1 lag=0ms
//! [tick-failed] task="heartbeat" n=2 err="tick failed: refused"
//! [stop-requested] task="heartbeat" after=5
//! [stopped] task="heartbeat" ticks=5
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        println!("{}", render(e));
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

fn render(e: &Event) -> String {
    let task = e.task.as_deref().unwrap_or("unknown");
    let ms = |v: Option<u32>| v.map_or_else(|| "?".to_string(), |v| format!("{v}ms"));
    let n = |v: Option<u64>| v.map_or_else(|| "?".to_string(), |v| v.to_string());
    let reason = e.reason.as_deref().unwrap_or("unknown");

    match e.kind {
        EventKind::TaskStarted => {
            format!("[started] task={task:?} period={}", ms(e.period_ms))
        }
        EventKind::TickCompleted => {
            format!("[tick] task={task:?} n={} lag={}", n(e.tick), ms(e.lag_ms))
        }
        EventKind::TickFailed => {
            format!("[tick-failed] task={task:?} n={} err={reason:?}", n(e.tick))
        }
        EventKind::StopRequested => {
            format!("[stop-requested] task={task:?} after={}", n(e.tick))
        }
        EventKind::TaskStopped => {
            format!("[stopped] task={task:?} ticks={}", n(e.tick))
        }
        EventKind::TaskAborted => {
            format!("[aborted] task={task:?} n={} err={reason:?}", n(e.tick))
        }
        EventKind::TaskDetached => {
            format!("[detached] task={task:?} period={}", ms(e.period_ms))
        }
        EventKind::SubscriberOverflow => {
            format!("[subscriber-overflow] subscriber={task:?} reason={reason:?}")
        }
        EventKind::SubscriberPanicked => {
            format!("[subscriber-panicked] subscriber={task} info={reason}")
        }
    }
}

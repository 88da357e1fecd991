//! # Per-subscriber delivery queues.
//!
//! [`SubscriberSet`] hands each event to every subscriber through its own bounded queue
//! and worker task, so a task thread publishing a tick never waits on a subscriber.
//!
//! ```text
//! emit(event) ─┬─► queue "log"     ─► worker ─► on_event()
//!              ├─► queue "metrics" ─► worker ─► on_event()   (panic → SubscriberPanicked)
//!              └─► queue "alerts"  ─► worker ─► on_event()
//!                    full/closed ─► SubscriberOverflow on the bus, event dropped for that queue
//! ```
//!
//! Each subscriber sees events in emit order; there is no ordering across subscribers.
//! A panicking subscriber keeps its worker: the panic is reported and the next event is
//! delivered as usual. State the subscriber shares behind a lock may be left half-updated.

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::core::panic_info;
use crate::events::{Bus, Event};
use crate::subscribers::Subscribe;

/// Per-subscriber channel metadata.
struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Fan-out coordinator for multiple event subscribers.
///
/// Must be created inside a Tokio runtime (workers are spawned immediately).
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    workers: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker task per subscriber.
    ///
    /// Minimum queue capacity is 1 (enforced). Overflow and panic events are published to `bus`.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let cap = sub.queue_capacity().max(1);
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(cap);
            let bus_for_worker = bus.clone();

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = sub.on_event(ev.as_ref());

                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        let info = panic_info(panic_err.as_ref());
                        bus_for_worker.publish(Event::subscriber_panicked(sub.name(), info));
                    }
                }
            });
            channels.push(SubscriberChannel { name, sender: tx });
            workers.push(handle);
        }
        Self {
            channels,
            workers,
            bus,
        }
    }

    /// Number of subscribers in the set.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Returns `true` if the set has no subscribers.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Emits an event to all subscribers (clones the event once).
    pub fn emit(&self, event: &Event) {
        self.emit_arc(Arc::new(event.clone()));
    }

    /// Emits a shared event to all subscribers without waiting.
    ///
    /// A full or closed queue drops the event for that subscriber and publishes a
    /// `SubscriberOverflow`, except when the dropped event is itself an overflow report.
    pub fn emit_arc(&self, event: Arc<Event>) {
        let reportable = !event.is_subscriber_overflow();

        for channel in &self.channels {
            let reason = match channel.sender.try_send(Arc::clone(&event)) {
                Ok(()) => continue,
                Err(mpsc::error::TrySendError::Full(_)) => "full",
                Err(mpsc::error::TrySendError::Closed(_)) => "closed",
            };
            if reportable {
                self.bus
                    .publish(Event::subscriber_overflow(channel.name, reason));
            }
        }
    }

    /// Closes every queue and waits until the workers have delivered what was queued.
    pub async fn shutdown(self) {
        let Self {
            channels, workers, ..
        } = self;
        drop(channels);
        futures::future::join_all(workers).await;
    }
}

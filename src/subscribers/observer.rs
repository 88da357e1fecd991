//! # Observer: bus → subscribers wiring.
//!
//! [`Observer`] owns a [`Bus`] and a listener task that forwards every event to a
//! [`SubscriberSet`]. Hand [`Observer::bus`] to any number of periodic tasks.
//!
//! ```text
//! task threads ── publish ──► Bus ──► listener ──► SubscriberSet ──► sub.on_event()
//!                                        ▲
//!                     shutdown() ── cancel ┘ (drain, then stop workers)
//! ```
//!
//! ## Rules
//! - Must be created inside a Tokio runtime.
//! - A lagging listener skips the oldest events and reports `SubscriberOverflow`.
//! - [`Observer::shutdown`] delivers everything published before the call, then stops
//!   the subscriber workers. Stop the tasks first to observe their final events.
//! - Dropping an [`Observer`] cancels the listener too; it still drains and stops the
//!   workers in the background, but nobody waits for it.

use std::sync::Arc;

use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::PeriodicConfig;
use crate::events::{Bus, Event};
use crate::subscribers::{Subscribe, SubscriberSet};

/// Routes events from periodic tasks to subscribers.
pub struct Observer {
    bus: Bus,
    token: CancellationToken,
    listener: JoinHandle<()>,
}

impl Observer {
    /// Creates the bus (capacity from `cfg`), spawns subscriber workers and the listener.
    pub fn new(cfg: &PeriodicConfig, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        let set = SubscriberSet::new(subscribers, bus.clone());
        let token = CancellationToken::new();
        let listener = tokio::spawn(listen(bus.subscribe(), set, token.clone()));

        Self {
            bus,
            token,
            listener,
        }
    }

    /// Returns a handle to the bus for [`PeriodicTaskBuilder::with_bus`](crate::PeriodicTaskBuilder::with_bus).
    pub fn bus(&self) -> Bus {
        self.bus.clone()
    }

    /// Delivers pending events, then stops the listener and all subscriber workers.
    pub async fn shutdown(mut self) {
        self.token.cancel();
        let _ = (&mut self.listener).await;
    }
}

impl Drop for Observer {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Forwards bus events to `set` until `token` is cancelled.
async fn listen(mut rx: Receiver<Event>, set: SubscriberSet, token: CancellationToken) {
    loop {
        tokio::select! {
            res = rx.recv() => match res {
                Ok(ev) => set.emit(&ev),
                Err(RecvError::Lagged(_)) => set.emit(&Event::subscriber_overflow("observer", "lagged")),
                Err(RecvError::Closed) => break,
            },
            _ = token.cancelled() => break,
        }
    }

    loop {
        match rx.try_recv() {
            Ok(ev) => set.emit(&ev),
            Err(TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
    set.shutdown().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use crate::tasks::TaskFn;
    use crate::PeriodicTask;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct Collect {
        seen: Mutex<Vec<Event>>,
    }

    #[async_trait]
    impl Subscribe for Collect {
        async fn on_event(&self, ev: &Event) {
            self.seen.lock().push(ev.clone());
        }
    }

    #[tokio::test]
    async fn test_routes_task_events_to_subscribers() {
        let collect = Arc::new(Collect::default());
        let observer = Observer::new(
            &PeriodicConfig::default(),
            vec![collect.clone() as Arc<dyn Subscribe>],
        );

        let task = PeriodicTask::builder(TaskFn::infallible("probe", || {}), Duration::from_millis(10))
            .with_bus(observer.bus())
            .spawn()
            .expect("spawn");
        tokio::time::sleep(Duration::from_millis(35)).await;
        drop(task);
        observer.shutdown().await;

        let seen = collect.seen.lock();
        let kinds: Vec<EventKind> = seen.iter().map(|e| e.kind).collect();
        assert_eq!(kinds.first(), Some(&EventKind::TaskStarted));
        assert_eq!(kinds.last(), Some(&EventKind::TaskStopped));
        assert!(kinds.contains(&EventKind::TickCompleted));
        assert!(seen.windows(2).all(|w| w[0].seq < w[1].seq));
    }

    #[tokio::test]
    async fn test_drop_stops_listener_and_workers() {
        let collect = Arc::new(Collect::default());
        let observer = Observer::new(
            &PeriodicConfig::default(),
            vec![collect.clone() as Arc<dyn Subscribe>],
        );
        let bus = observer.bus();
        assert_eq!(bus.receiver_count(), 1);

        drop(observer);

        let deadline = tokio::time::Instant::now() + Duration::from_secs(1);
        while bus.receiver_count() > 0 || Arc::strong_count(&collect) > 1 {
            assert!(tokio::time::Instant::now() < deadline, "observer kept running after drop");
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    #[tokio::test]
    async fn test_shutdown_without_tasks() {
        let observer = Observer::new(&PeriodicConfig::default(), Vec::new());
        observer.bus().publish(Event::new(EventKind::TaskStarted));
        observer.shutdown().await;
    }
}

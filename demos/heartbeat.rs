//! # Example: heartbeat
//!
//! Prints a heartbeat once per second for five seconds, with lifecycle events
//! routed through an [`Observer`] to the built-in [`LogWriter`].
//!
//! ## Flow
//! ```text
//! Observer::new() ──► Bus + listener + LogWriter worker
//! PeriodicTask::builder().with_bus().spawn()
//!     ├─► publish(TaskStarted)
//!     ├─► tick every 1s ─► publish(TickCompleted)
//!     └─► drop ─► publish(StopRequested) ─► publish(TaskStopped)
//! Observer::shutdown() ──► drain, stop LogWriter
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example heartbeat --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use tickvisor::{LogWriter, Observer, PeriodicConfig, PeriodicTask, Subscribe, TaskFn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = PeriodicConfig::default();
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let observer = Observer::new(&cfg, subs);

    let task = PeriodicTask::builder(
        TaskFn::infallible("heartbeat", || println!("Hello, world!")),
        Duration::from_secs(1),
    )
    .with_config(cfg)
    .with_bus(observer.bus())
    .spawn()?;

    tokio::time::sleep(Duration::from_secs(5)).await;

    drop(task);
    observer.shutdown().await;
    Ok(())
}

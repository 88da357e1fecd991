//! Task events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by periodic tasks and subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `core::worker` (started/stopped/aborted), `core::runner` (tick outcome),
//!   `PeriodicTask` owner side (stop requested, detached), `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the [`Observer`](crate::Observer) listener, or any `Bus::subscribe()` receiver.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};

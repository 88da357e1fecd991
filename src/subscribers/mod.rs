//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait and the machinery that delivers
//! events published on a [`Bus`](crate::Bus) to subscribers.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   task thread ── publish(Event) ──► Bus ──► Observer listener ──► SubscriberSet
//!                                                                   │
//!                                              ┌─────────┬──────────┼────────┐
//!                                              ▼         ▼          ▼        ▼
//!                                          LogWriter  Metrics    Custom     ...
//! ```
//!
//! ## Contents
//! - [`Subscribe`] async event handler contract
//! - [`SubscriberSet`] per-subscriber bounded queues and workers
//! - [`Observer`] bus + listener + subscriber set, ready to hand to tasks
//! - `LogWriter` stdout printer (feature `logging`)

#[cfg(feature = "logging")]
mod log;
mod observer;
mod subscribe;
mod subscriber_set;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use observer::Observer;
pub use subscribe::Subscribe;
pub use subscriber_set::SubscriberSet;

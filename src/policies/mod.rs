//! Tick failure policy.
//!
//! This module holds the knob that controls **what happens after a tick fails**.
//!
//! ## Contents
//! - [`FailurePolicy`] keep ticking (continue) or end the loop (stop)
//!
//! ## Quick wiring
//! ```text
//! PeriodicConfig { failure: FailurePolicy, .. }
//!      └─► core::worker::Worker uses:
//!           - failure.should_continue(&err) after every failed tick
//! ```
//!
//! ## Defaults
//! - `FailurePolicy::Continue`: failures are published as `TickFailed` and the cadence is kept.

mod failure;

pub use failure::FailurePolicy;

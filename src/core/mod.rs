//! Periodic task core: lifecycle and synchronization.
//!
//! The public API from this module is [`PeriodicTask`] (with [`PeriodicTaskBuilder`],
//! [`PeriodicConfig`] and [`Detached`]).
//!
//! Internal modules:
//! - [`shared`]: lock + condition variable + state block shared with the thread;
//! - [`worker`]: the background thread's wait/fire loop;
//! - [`runner`]: executes one tick with panic isolation and event publishing;
//! - [`periodic`]: owner side, start/stop handshakes and ownership transfer.

mod builder;
mod config;
mod periodic;
mod runner;
mod shared;
mod worker;

pub use builder::PeriodicTaskBuilder;
pub use config::PeriodicConfig;
pub use periodic::{Detached, PeriodicTask};

pub(crate) use runner::panic_info;

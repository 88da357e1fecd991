use std::time::Duration;

use crate::{
    core::{config::PeriodicConfig, periodic::PeriodicTask},
    error::SpawnError,
    events::Bus,
    policies::FailurePolicy,
    tasks::{Task, TaskBox},
};

/// Builder for a [`PeriodicTask`] with configuration and optional event publishing.
pub struct PeriodicTaskBuilder {
    task: TaskBox,
    period: Duration,
    cfg: PeriodicConfig,
    bus: Option<Bus>,
}

impl PeriodicTaskBuilder {
    /// Creates a new builder for `task` ticking every `period`.
    pub fn new(task: impl Task, period: Duration) -> Self {
        Self {
            task: Box::new(task),
            period,
            cfg: PeriodicConfig::default(),
            bus: None,
        }
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, cfg: PeriodicConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets what happens after a failed tick.
    pub fn with_failure_policy(mut self, failure: FailurePolicy) -> Self {
        self.cfg.failure = failure;
        self
    }

    /// Publishes lifecycle and tick events to `bus`.
    ///
    /// Use [`Observer::bus`](crate::Observer::bus) to route them to subscribers.
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Spawns the background thread and returns once it is running.
    ///
    /// # Errors
    /// - [`SpawnError::ZeroPeriod`] if the period is zero
    /// - [`SpawnError::Thread`] if the thread could not be created
    pub fn spawn(self) -> Result<PeriodicTask, SpawnError> {
        PeriodicTask::spawn_with(self.task, self.period, self.cfg, self.bus)
    }
}

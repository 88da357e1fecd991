//! # PeriodicTask: owner side of a periodic task.
//!
//! A [`PeriodicTask`] owns at most one background thread that invokes a [`Task`] once per period.
//!
//! ## Lifecycle
//! ```text
//! Default ──────────────────────────────► Empty (stopped, no thread, no callback)
//!
//! new / builder().spawn()
//!   └─► spawn thread ─► wait "running" ─► Running ──stop()/drop──► Stopped ──start()──► Running
//!                                            │                       │
//!                                            └── failure policy ─────┘ (loop ends on its own)
//!
//! take() / assign()    hand a live execution to another owner, source becomes Empty
//! detach()             stop, move callback + period out, source becomes Empty
//! replace() / resume() adopt detached parts, start fresh iff they were running
//! ```
//!
//! ## Guarantees
//! - At most one background thread per task at any time.
//! - Construction returns only after the thread confirmed it is running.
//! - `stop()`, drop, `assign()`, `replace()` and `detach()` return only after the previous
//!   thread confirmed it stopped **and** has been joined: the callback is never running
//!   (and never runs again) once they return.
//! - Stopping a stopped or empty task is a no-op.
//!
//! ## Caveat
//! The callback runs under the task's lock. Calling any of the methods above on the same
//! task from inside its own callback deadlocks.

use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::{
    core::{builder::PeriodicTaskBuilder, config::PeriodicConfig, shared::Shared, worker::Worker},
    error::{SpawnError, TaskError},
    events::{Bus, Event, EventKind},
    tasks::{Task, TaskBox, TaskFn},
};

/// Runs a callback once per period on a dedicated thread until stopped or dropped.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::time::Duration;
/// use tickvisor::PeriodicTask;
///
/// let beats = Arc::new(AtomicU32::new(0));
/// let counter = Arc::clone(&beats);
///
/// let mut task = PeriodicTask::new(
///     move || {
///         counter.fetch_add(1, Ordering::Relaxed);
///     },
///     Duration::from_millis(10),
/// )?;
/// assert!(task.is_running());
///
/// std::thread::sleep(Duration::from_millis(35));
/// task.stop();
/// assert!(!task.is_running());
/// assert_eq!(beats.load(Ordering::Relaxed) as u64, task.ticks());
/// # Ok::<(), tickvisor::SpawnError>(())
/// ```
#[derive(Default)]
pub struct PeriodicTask {
    core: Option<Core>,
}

impl PeriodicTask {
    /// Starts `f` every `period` with default configuration and no event bus.
    ///
    /// Returns once the background thread is running.
    pub fn new<F>(f: F, period: Duration) -> Result<Self, SpawnError>
    where
        F: FnMut() + Send + 'static,
    {
        Self::builder(TaskFn::infallible("periodic", f), period).spawn()
    }

    /// Returns a builder for a named task with configuration and an optional event bus.
    pub fn builder(task: impl Task, period: Duration) -> PeriodicTaskBuilder {
        PeriodicTaskBuilder::new(task, period)
    }

    pub(crate) fn spawn_with(
        task: TaskBox,
        period: Duration,
        cfg: PeriodicConfig,
        bus: Option<Bus>,
    ) -> Result<Self, SpawnError> {
        if period.is_zero() {
            return Err(SpawnError::ZeroPeriod);
        }
        let mut core = Core::new(task, period, cfg, bus);
        core.start()?;
        Ok(Self { core: Some(core) })
    }

    /// Returns `true` while the background thread is between its start and stop handshakes.
    pub fn is_running(&self) -> bool {
        self.core.as_ref().is_some_and(Core::is_running)
    }

    /// Returns `true` if the task holds no callback (default-constructed or handed off).
    pub fn is_empty(&self) -> bool {
        self.core.is_none()
    }

    /// Task name, if a callback is bound.
    pub fn name(&self) -> Option<&str> {
        self.core.as_ref().map(|c| &*c.shared.name)
    }

    /// Tick period, if a callback is bound.
    pub fn period(&self) -> Option<Duration> {
        self.core.as_ref().map(|c| c.shared.state.lock().period)
    }

    /// Number of ticks fired over the lifetime of the bound callback.
    ///
    /// Blocks while a tick is in progress.
    pub fn ticks(&self) -> u64 {
        self.core.as_ref().map_or(0, |c| c.shared.state.lock().ticks)
    }

    /// Takes the error that ended the loop under the failure policy, if any.
    ///
    /// Cleared on the next [`start`](Self::start).
    pub fn take_failure(&mut self) -> Option<TaskError> {
        self.core.as_ref()?.shared.state.lock().failure.take()
    }

    /// Stops the background thread and waits until it has exited.
    ///
    /// No-op if the task is stopped or empty. The callback stays bound, so the task
    /// can be started again.
    pub fn stop(&mut self) {
        if let Some(core) = self.core.as_mut() {
            core.stop();
        }
    }

    /// Starts a fresh background thread for a stopped task.
    ///
    /// No-op if already running.
    ///
    /// # Errors
    /// - [`SpawnError::Empty`] if no callback is bound
    /// - [`SpawnError::Thread`] if the thread could not be created
    pub fn start(&mut self) -> Result<(), SpawnError> {
        match self.core.as_mut() {
            Some(core) => core.start(),
            None => Err(SpawnError::Empty),
        }
    }

    /// Moves this task out, leaving `self` empty and stopped.
    ///
    /// A running execution is handed over as is: the thread is bound to heap-shared
    /// state rather than to this handle, so it keeps its cadence and no tick is lost.
    #[must_use = "dropping the returned task stops it"]
    pub fn take(&mut self) -> PeriodicTask {
        std::mem::take(self)
    }

    /// Moves `other` into `self`, leaving `other` empty.
    ///
    /// The execution previously owned by `self` is stopped and joined **before** `self`
    /// adopts `other`'s state; if `other` was running, its execution continues under `self`.
    pub fn assign(&mut self, other: &mut PeriodicTask) {
        let mut incoming = other.take();
        self.stop();
        self.core = incoming.core.take();
    }

    /// Stops the task and moves its callback and period out, leaving `self` empty.
    ///
    /// Returns `None` if the task is already empty. [`Detached::was_running`] records whether
    /// an execution was alive, so [`Detached::resume`] or [`replace`](Self::replace) can bring
    /// it back.
    pub fn detach(&mut self) -> Option<Detached> {
        let mut core = self.core.take()?;
        let was_running = core.is_running();
        core.stop();

        let (task, period) = {
            let mut st = core.shared.state.lock();
            (st.task.take()?, st.period)
        };
        core.publish(Event::new(EventKind::TaskDetached).with_period(period));

        Some(Detached {
            task,
            period,
            was_running,
            cfg: core.cfg,
            bus: core.bus,
        })
    }

    /// Adopts detached parts, replacing whatever `self` held.
    ///
    /// `self`'s previous execution is stopped first; a fresh one is started iff the
    /// detached task was running. If that start fails the callback stays bound and
    /// `self` is stopped.
    pub fn replace(&mut self, detached: Detached) -> Result<(), SpawnError> {
        self.stop();

        let Detached {
            task,
            period,
            was_running,
            cfg,
            bus,
        } = detached;
        let core = self.core.insert(Core::new(task, period, cfg, bus));
        if was_running { core.start() } else { Ok(()) }
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for PeriodicTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeriodicTask")
            .field("name", &self.name())
            .field("period", &self.period())
            .field("running", &self.is_running())
            .finish()
    }
}

/// Callback and period moved out of a [`PeriodicTask`] by [`PeriodicTask::detach`].
///
/// Also carries the task's configuration and event bus, so a resumed task keeps its wiring.
pub struct Detached {
    task: TaskBox,
    period: Duration,
    was_running: bool,
    cfg: PeriodicConfig,
    bus: Option<Bus>,
}

impl Detached {
    /// Task name.
    pub fn name(&self) -> &str {
        self.task.name()
    }

    /// Tick period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Whether an execution was alive when the task was detached.
    pub fn was_running(&self) -> bool {
        self.was_running
    }

    /// Gives up the wiring and returns the bare callback.
    pub fn into_task(self) -> TaskBox {
        self.task
    }

    /// Builds a new owner: running iff the detached task was running.
    pub fn resume(self) -> Result<PeriodicTask, SpawnError> {
        let mut task = PeriodicTask::default();
        task.replace(self)?;
        Ok(task)
    }
}

impl fmt::Debug for Detached {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Detached")
            .field("name", &self.name())
            .field("period", &self.period)
            .field("was_running", &self.was_running)
            .finish()
    }
}

/// Shared state plus the handle of the current execution.
struct Core {
    shared: Arc<Shared>,
    thread: Option<JoinHandle<()>>,
    cfg: PeriodicConfig,
    bus: Option<Bus>,
}

impl Core {
    fn new(task: TaskBox, period: Duration, cfg: PeriodicConfig, bus: Option<Bus>) -> Self {
        Self {
            shared: Shared::new(task, period),
            thread: None,
            cfg,
            bus,
        }
    }

    fn is_running(&self) -> bool {
        self.shared.state.lock().running
    }

    /// Start handshake: the lock is held from before the spawn until the thread
    /// reports `running`, so the thread cannot tick before this returns.
    fn start(&mut self) -> Result<(), SpawnError> {
        if self.is_running() {
            return Ok(());
        }
        // A loop that ended under the failure policy leaves a finished thread behind.
        self.join();

        let mut st = self.shared.state.lock();
        if st.task.is_none() {
            return Err(SpawnError::Empty);
        }
        st.should_stop = false;
        st.failure = None;

        let worker = Worker::new(Arc::clone(&self.shared), self.cfg.failure, self.bus.clone());
        let mut builder = thread::Builder::new().name(self.cfg.thread_name(&self.shared.name));
        if let Some(size) = self.cfg.stack_size_opt() {
            builder = builder.stack_size(size);
        }
        let handle = builder
            .spawn(move || worker.run())
            .map_err(|source| SpawnError::Thread { source })?;

        self.shared.cv.wait_while(&mut st, |s| !s.running);
        drop(st);

        self.thread = Some(handle);
        Ok(())
    }

    /// Stop handshake followed by a join.
    fn stop(&mut self) {
        {
            let mut st = self.shared.state.lock();
            if st.running {
                st.should_stop = true;
                self.publish(Event::new(EventKind::StopRequested).with_tick(st.ticks));
                self.shared.cv.notify_all();
                self.shared.cv.wait_while(&mut st, |s| s.running);
            }
        }
        self.join();
        self.shared.state.lock().should_stop = false;
    }

    fn join(&mut self) {
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }

    fn publish(&self, ev: Event) {
        if let Some(bus) = &self.bus {
            bus.publish(ev.with_task(Arc::clone(&self.shared.name)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::FailurePolicy;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::time::Instant;

    fn counting(period: Duration) -> (PeriodicTask, Arc<AtomicU64>) {
        let count = Arc::new(AtomicU64::new(0));
        let c = Arc::clone(&count);
        let task = PeriodicTask::new(
            move || {
                c.fetch_add(1, Ordering::SeqCst);
            },
            period,
        )
        .expect("spawn");
        (task, count)
    }

    fn sleep_ms(ms: u64) {
        thread::sleep(Duration::from_millis(ms));
    }

    #[test]
    fn test_running_right_after_construction() {
        let (task, _count) = counting(Duration::from_secs(60));
        assert!(task.is_running());
        assert!(!task.is_empty());
        assert_eq!(task.period(), Some(Duration::from_secs(60)));
        assert_eq!(task.name(), Some("periodic"));
    }

    #[test]
    fn test_drop_before_first_period_never_ticks() {
        let (task, count) = counting(Duration::from_millis(200));
        let started = Instant::now();
        drop(task);
        assert!(started.elapsed() < Duration::from_millis(200));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_fires_five_times_in_550ms_at_100ms() {
        let (task, count) = counting(Duration::from_millis(100));
        sleep_ms(550);
        drop(task);
        assert_eq!(count.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_slow_callback_does_not_drift() {
        let count = Arc::new(AtomicU64::new(0));
        let c = Arc::clone(&count);
        let task = PeriodicTask::new(
            move || {
                c.fetch_add(1, Ordering::SeqCst);
                sleep_ms(30);
            },
            Duration::from_millis(50),
        )
        .expect("spawn");

        // Ticks due at 50, 100, ..., 500ms. Rescheduling from "now" would give ~6.
        sleep_ms(525);
        drop(task);
        let n = count.load(Ordering::SeqCst);
        assert!((9..=10).contains(&n), "ticks={n}");
    }

    #[test]
    fn test_default_is_stopped_and_empty() {
        let mut task = PeriodicTask::default();
        assert!(!task.is_running());
        assert!(task.is_empty());
        assert_eq!(task.ticks(), 0);
        assert_eq!(task.period(), None);
        task.stop();
        assert!(matches!(task.start(), Err(SpawnError::Empty)));
        assert!(task.detach().is_none());

        let started = Instant::now();
        drop(task);
        assert!(started.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn test_zero_period_is_rejected() {
        let res = PeriodicTask::new(|| {}, Duration::ZERO);
        assert!(matches!(res, Err(SpawnError::ZeroPeriod)));
    }

    #[test]
    fn test_stop_twice_is_noop() {
        let (mut task, count) = counting(Duration::from_millis(10));
        sleep_ms(35);
        task.stop();
        let after_first = count.load(Ordering::SeqCst);
        task.stop();
        assert!(!task.is_running());
        sleep_ms(30);
        assert_eq!(count.load(Ordering::SeqCst), after_first);
        assert_eq!(task.ticks(), after_first);
    }

    #[test]
    fn test_start_after_stop_resumes() {
        let (mut task, count) = counting(Duration::from_millis(10));
        task.stop();
        assert_eq!(count.load(Ordering::SeqCst), 0);

        task.start().expect("restart");
        assert!(task.is_running());
        task.start().expect("start while running is a no-op");
        sleep_ms(55);
        task.stop();
        assert!(count.load(Ordering::SeqCst) >= 3);
    }

    #[test]
    fn test_stop_waits_for_inflight_tick() {
        let busy = Arc::new(AtomicBool::new(false));
        let finished = Arc::new(AtomicU64::new(0));
        let (b, f) = (Arc::clone(&busy), Arc::clone(&finished));
        let mut task = PeriodicTask::new(
            move || {
                b.store(true, Ordering::SeqCst);
                sleep_ms(80);
                b.store(false, Ordering::SeqCst);
                f.fetch_add(1, Ordering::SeqCst);
            },
            Duration::from_millis(10),
        )
        .expect("spawn");

        sleep_ms(30);
        task.stop();
        assert!(!busy.load(Ordering::SeqCst));
        let done = finished.load(Ordering::SeqCst);
        assert!(done >= 1);
        sleep_ms(50);
        assert_eq!(finished.load(Ordering::SeqCst), done);
    }

    #[test]
    fn test_take_hands_over_live_execution() {
        let (mut a, count) = counting(Duration::from_millis(20));
        sleep_ms(110);
        let b = a.take();

        assert!(a.is_empty());
        assert!(!a.is_running());
        assert!(b.is_running());

        sleep_ms(100);
        drop(b);
        // A single never-moved task would have fired 10 times.
        let n = count.load(Ordering::SeqCst);
        assert!((9..=11).contains(&n), "ticks={n}");
    }

    #[test]
    fn test_task_can_move_to_another_thread() {
        let (task, count) = counting(Duration::from_millis(10));
        thread::spawn(move || {
            sleep_ms(35);
            drop(task);
        })
        .join()
        .expect("join");
        let n = count.load(Ordering::SeqCst);
        sleep_ms(30);
        assert_eq!(count.load(Ordering::SeqCst), n);
    }

    #[test]
    fn test_assign_running_over_running() {
        let (mut a, count_a) = counting(Duration::from_millis(50));
        let (mut b, count_b) = counting(Duration::from_millis(10));
        sleep_ms(25);

        b.assign(&mut a);
        let b_frozen = count_b.load(Ordering::SeqCst);
        assert!(b_frozen >= 1);
        assert!(a.is_empty());
        assert!(b.is_running());
        assert_eq!(b.period(), Some(Duration::from_millis(50)));

        sleep_ms(130);
        assert_eq!(count_b.load(Ordering::SeqCst), b_frozen);
        assert!(count_a.load(Ordering::SeqCst) >= 2);
    }

    #[test]
    fn test_assign_stopped_over_running() {
        let (mut a, count_a) = counting(Duration::from_millis(10));
        a.stop();
        let (mut b, count_b) = counting(Duration::from_millis(10));

        b.assign(&mut a);
        assert!(!b.is_running());
        assert!(!b.is_empty());
        let frozen = count_b.load(Ordering::SeqCst);
        sleep_ms(40);
        assert_eq!(count_b.load(Ordering::SeqCst), frozen);
        assert_eq!(count_a.load(Ordering::SeqCst), 0);

        b.start().expect("start adopted callback");
        sleep_ms(35);
        b.stop();
        assert!(count_a.load(Ordering::SeqCst) >= 2);
    }

    #[test]
    fn test_assign_empty_over_running_stops_it() {
        let (mut b, count_b) = counting(Duration::from_millis(10));
        let mut empty = PeriodicTask::default();
        b.assign(&mut empty);
        assert!(b.is_empty());
        let frozen = count_b.load(Ordering::SeqCst);
        sleep_ms(30);
        assert_eq!(count_b.load(Ordering::SeqCst), frozen);
    }

    #[test]
    fn test_detach_and_resume() {
        let (mut task, count) = counting(Duration::from_millis(10));
        sleep_ms(25);

        let detached = task.detach().expect("bound");
        assert!(task.is_empty());
        assert!(detached.was_running());
        assert_eq!(detached.period(), Duration::from_millis(10));
        let frozen = count.load(Ordering::SeqCst);
        sleep_ms(30);
        assert_eq!(count.load(Ordering::SeqCst), frozen);

        let resumed = detached.resume().expect("resume");
        assert!(resumed.is_running());
        sleep_ms(35);
        drop(resumed);
        assert!(count.load(Ordering::SeqCst) > frozen);
    }

    #[test]
    fn test_replace_keeps_detached_state() {
        let (mut source, count_src) = counting(Duration::from_millis(10));
        source.stop();
        let stopped = source.detach().expect("bound");
        assert!(!stopped.was_running());

        let (mut dest, count_dest) = counting(Duration::from_millis(10));
        dest.replace(stopped).expect("replace");
        assert!(!dest.is_running());
        assert!(!dest.is_empty());

        let frozen = count_dest.load(Ordering::SeqCst);
        sleep_ms(30);
        assert_eq!(count_dest.load(Ordering::SeqCst), frozen);
        assert_eq!(count_src.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_stop_policy_ends_loop_and_keeps_error() {
        let mut n = 0u32;
        let mut task = PeriodicTask::builder(
            TaskFn::new("flaky", move || {
                n += 1;
                if n == 2 {
                    Err(TaskError::fail("second tick"))
                } else {
                    Ok(())
                }
            }),
            Duration::from_millis(10),
        )
        .with_failure_policy(FailurePolicy::Stop)
        .spawn()
        .expect("spawn");

        sleep_ms(60);
        assert!(!task.is_running());
        assert_eq!(task.ticks(), 2);
        assert_eq!(task.take_failure(), Some(TaskError::fail("second tick")));
        assert_eq!(task.take_failure(), None);
        task.stop();

        task.start().expect("restart after abort");
        sleep_ms(25);
        assert!(task.is_running());
    }

    #[test]
    fn test_continue_policy_survives_errors_and_panics() {
        let mut n = 0u32;
        let mut task = PeriodicTask::builder(
            TaskFn::new("noisy", move || {
                n += 1;
                match n % 3 {
                    0 => panic!("tick {n} exploded"),
                    1 => Err(TaskError::fail("meh")),
                    _ => Ok(()),
                }
            }),
            Duration::from_millis(5),
        )
        .spawn()
        .expect("spawn");

        let deadline = Instant::now() + Duration::from_secs(1);
        while task.ticks() < 6 {
            assert!(Instant::now() < deadline, "stuck at {} ticks", task.ticks());
            sleep_ms(5);
        }
        assert!(task.is_running());
        assert_eq!(task.take_failure(), None);
    }

    #[test]
    fn test_unreachable_deadline_waits_for_stop() {
        let (task, count) = counting(Duration::MAX);
        assert!(task.is_running());
        assert_eq!(task.period(), Some(Duration::MAX));

        sleep_ms(20);
        let started = Instant::now();
        drop(task);
        assert!(started.elapsed() < Duration::from_millis(200));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_fatal_ends_loop_under_continue() {
        let mut task = PeriodicTask::builder(
            TaskFn::new("doomed", || Err(TaskError::fatal("gone"))),
            Duration::from_millis(5),
        )
        .spawn()
        .expect("spawn");

        sleep_ms(30);
        assert!(!task.is_running());
        assert_eq!(task.ticks(), 1);
        assert_eq!(task.take_failure(), Some(TaskError::fatal("gone")));
    }

    #[test]
    fn test_thread_is_named_after_task() {
        let seen = Arc::new(parking_lot::Mutex::new(None::<String>));
        let s = Arc::clone(&seen);
        let task = PeriodicTask::builder(
            TaskFn::infallible("named", move || {
                *s.lock() = thread::current().name().map(str::to_owned);
            }),
            Duration::from_millis(5),
        )
        .spawn()
        .expect("spawn");

        sleep_ms(20);
        drop(task);
        assert_eq!(seen.lock().as_deref(), Some("tick:named"));
    }

    #[test]
    fn test_lifecycle_events_in_order() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let task = PeriodicTask::builder(TaskFn::infallible("beat", || {}), Duration::from_millis(10))
            .with_bus(bus)
            .spawn()
            .expect("spawn");
        sleep_ms(35);
        drop(task);

        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            assert_eq!(ev.task.as_deref(), Some("beat"));
            kinds.push(ev.kind);
        }
        assert_eq!(kinds.first(), Some(&EventKind::TaskStarted));
        assert_eq!(
            &kinds[kinds.len() - 2..],
            &[EventKind::StopRequested, EventKind::TaskStopped]
        );
        let ticks = kinds
            .iter()
            .filter(|k| **k == EventKind::TickCompleted)
            .count();
        assert!(ticks >= 2);
    }
}

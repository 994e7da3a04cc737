use crate::config::{RuntimeConfig, RuntimeFlavor};
use crate::registry::{self, RegistryGuard, SchedulerStatus};
use anyhow::{Result, anyhow};
use std::cell::Cell;
use std::future::Future;
use std::sync::{Arc, Condvar, Mutex, OnceLock, PoisonError};
use std::time::Duration;
use tokio::runtime::{Builder, EnterGuard, Handle, Runtime};
use tracing::{debug, info, warn};

/// A Tokio runtime that reports its activity to the thread-local [`registry`].
#[derive(Debug)]
pub struct Scheduler {
    runtime: Runtime,
    flavor: RuntimeFlavor,
}

/// Keeps the runtime context entered, with the thread registered as idle.
#[must_use = "The runtime context is left as soon as the guard is dropped"]
#[derive(Debug)]
pub struct SchedulerEnterGuard<'a> {
    _registration: RegistryGuard,
    _context: EnterGuard<'a>,
}

impl Scheduler {
    /// Builds a scheduler from a runtime profile.
    ///
    /// Every thread the runtime starts is registered as idle. Workers report running
    /// between unpark and park; for the multi-thread flavor this waits until each
    /// worker has parked once.
    ///
    /// # Errors
    ///
    /// Returns an [`anyhow::Error`] if the Tokio runtime cannot be created, typically
    /// due to OS-level limits on thread creation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use loopguard_runtime::{RuntimeConfig, Scheduler};
    ///
    /// let scheduler = Scheduler::new(&RuntimeConfig::high_performance().with_worker_threads(2))?;
    /// assert_eq!(scheduler.block_on(async { 40 + 2 }), 42);
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        let config = config.normalized();
        debug!(config = ?config, "Building tokio runtime");

        let latch = Arc::new(SettleLatch::default());
        let mut builder = match config.flavor {
            RuntimeFlavor::CurrentThread => Builder::new_current_thread(),
            RuntimeFlavor::MultiThread => {
                let mut builder = Builder::new_multi_thread();
                builder.worker_threads(config.worker_threads);
                builder
            }
        };

        let parked = Arc::clone(&latch);
        builder
            .thread_name(&config.thread_name)
            .thread_stack_size(config.stack_size)
            .thread_keep_alive(config.thread_keep_alive)
            .on_thread_start(|| registry::register_thread(SchedulerStatus::Idle))
            .on_thread_park(move || {
                registry::transition(SchedulerStatus::Idle);
                parked.arrive();
            })
            .on_thread_unpark(|| registry::transition(SchedulerStatus::Running))
            .enable_all();

        let runtime = builder.build().map_err(|e| anyhow!("Failed to initialize runtime: {e}"))?;

        // Workers run tasks without an unpark until they first park.
        if config.flavor == RuntimeFlavor::MultiThread
            && !latch.wait(config.worker_threads, WORKER_SETTLE_TIMEOUT)
        {
            warn!(
                workers = config.worker_threads,
                "Workers did not settle in time; early tasks may be reported as idle"
            );
        }

        Ok(Self { runtime, flavor: config.flavor })
    }

    /// Drives `future` to completion on the current thread.
    ///
    /// The thread is registered as [`SchedulerStatus::Running`] until the future
    /// resolves; the previous registration is restored afterwards, also on panic.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`Runtime::block_on`], e.g. when called
    /// from inside another runtime's async context.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        let _running = registry::enter(SchedulerStatus::Running);
        self.runtime.block_on(future)
    }

    /// Enters the runtime context without driving it.
    ///
    /// Spawning is possible while the guard is alive, but the thread counts as idle.
    pub fn enter(&self) -> SchedulerEnterGuard<'_> {
        SchedulerEnterGuard {
            _context: self.runtime.enter(),
            _registration: registry::enter(SchedulerStatus::Idle),
        }
    }

    #[must_use]
    pub fn handle(&self) -> &Handle {
        self.runtime.handle()
    }

    #[must_use]
    pub const fn flavor(&self) -> RuntimeFlavor {
        self.flavor
    }
}

/// Runs a synchronous closure on the blocking pool and awaits its result.
///
/// The pool thread is registered as idle while `f` runs, so functions guarded
/// against running on the scheduler may be called from inside it.
///
/// A panic inside `f` is resumed on the awaiting task.
///
/// # Errors
///
/// Returns an error if the blocking task was cancelled, which happens when the
/// runtime shuts down before `f` got to run.
///
/// # Panics
///
/// Must be awaited within a Tokio runtime; panics otherwise.
pub async fn sync_to_async<F, R>(f: F) -> Result<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let task = tokio::task::spawn_blocking(move || {
        let _offloaded = registry::enter(SchedulerStatus::Idle);
        f()
    });

    match task.await {
        Ok(value) => Ok(value),
        Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
        Err(err) => Err(anyhow!("Offloaded call did not complete: {err}")),
    }
}

const WORKER_SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

thread_local! {
    static PARKED_ONCE: Cell<bool> = const { Cell::new(false) };
}

/// Counts runtime threads that reached their first park.
#[derive(Debug, Default)]
struct SettleLatch {
    parked: Mutex<usize>,
    settled: Condvar,
}

impl SettleLatch {
    fn arrive(&self) {
        if PARKED_ONCE.with(|once| once.replace(true)) {
            return;
        }
        let mut parked = self.parked.lock().unwrap_or_else(PoisonError::into_inner);
        *parked += 1;
        self.settled.notify_all();
    }

    fn wait(&self, workers: usize, timeout: Duration) -> bool {
        let parked = self.parked.lock().unwrap_or_else(PoisonError::into_inner);
        let (parked, _) = self
            .settled
            .wait_timeout_while(parked, timeout, |parked| *parked < workers)
            .unwrap_or_else(PoisonError::into_inner);
        *parked >= workers
    }
}

static GLOBAL_SCHEDULER: OnceLock<Scheduler> = OnceLock::new();

/// Access the lazily initialized process-wide scheduler (default profile).
///
/// # Panics
///
/// Panics if the Tokio runtime cannot be initialized (e.g. the OS refuses to
/// allocate threads). This is considered a fatal system error.
pub fn get_global_scheduler() -> &'static Scheduler {
    GLOBAL_SCHEDULER.get_or_init(|| {
        let config = RuntimeConfig::default();
        info!(
            threads = config.worker_threads,
            stack = config.stack_size,
            "Initializing global scheduler"
        );
        Scheduler::new(&config).expect("CRITICAL: Failed to initialize global scheduler")
    })
}

//! Per-thread scheduler registry.
//!
//! Each thread has one slot describing the scheduler it is currently associated
//! with. [`Scheduler`](crate::Scheduler) fills the slot while it drives work, and
//! every thread its runtime starts is registered as idle. Workers flip to running
//! when they unpark and back to idle when they park; blocking-pool threads never
//! park through the scheduler, so they stay idle.
//!
//! Threads that never touched the registry (runtimes built elsewhere) fall back to
//! Tokio's own context: a reachable runtime handle means a scheduler exists, and
//! being inside a Tokio task means it is running.

use std::cell::Cell;
use std::marker::PhantomData;
use tokio::runtime::Handle;

thread_local! {
    static CURRENT: Cell<Option<SchedulerStatus>> = const { Cell::new(None) };
}

/// Whether the scheduler associated with a thread is driving work on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchedulerStatus {
    /// A scheduler exists but this thread is not executing scheduled work.
    Idle,
    /// This thread is executing work on behalf of the scheduler.
    Running,
}

/// Where a [`SchedulerProbe`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeSource {
    Registry,
    Tokio,
}

/// Result of asking the registry about the current thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchedulerProbe {
    pub status: SchedulerStatus,
    pub source: ProbeSource,
}

impl SchedulerProbe {
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.status, SchedulerStatus::Running)
    }
}

/// Restores the previous registry slot when dropped.
///
/// Bound to the thread that created it.
#[must_use = "The registration is undone as soon as the guard is dropped"]
#[derive(Debug)]
pub struct RegistryGuard {
    prev: Option<SchedulerStatus>,
    _thread_bound: PhantomData<*const ()>,
}

impl Drop for RegistryGuard {
    fn drop(&mut self) {
        let prev = self.prev;
        let _ = CURRENT.try_with(|slot| slot.set(prev));
    }
}

/// Associates the current thread with a scheduler in the given state.
///
/// Registrations nest; dropping the guard restores whatever was there before.
pub fn enter(status: SchedulerStatus) -> RegistryGuard {
    let prev = CURRENT.with(|slot| slot.replace(Some(status)));
    RegistryGuard { prev, _thread_bound: PhantomData }
}

/// Registers the current thread for the rest of its lifetime.
pub(crate) fn register_thread(status: SchedulerStatus) {
    let _ = CURRENT.try_with(|slot| slot.set(Some(status)));
}

/// Updates an existing registration in place.
///
/// Unregistered threads are left alone, so runtime hooks firing on a thread that
/// only borrowed the scheduler do not leave a stale status behind.
pub(crate) fn transition(status: SchedulerStatus) {
    let _ = CURRENT.try_with(|slot| {
        if slot.get().is_some() {
            slot.set(Some(status));
        }
    });
}

/// Looks up the scheduler associated with the current thread.
///
/// Returns `None` when no scheduler exists for this thread.
///
/// Without a registration the answer comes from Tokio, which cannot tell a future
/// driven by a foreign `Runtime::block_on` (`#[tokio::main]`, `#[tokio::test]`)
/// apart from an idle runtime context: such futures report idle.
#[must_use]
pub fn current() -> Option<SchedulerProbe> {
    if let Some(status) = CURRENT.try_with(Cell::get).ok().flatten() {
        return Some(SchedulerProbe { status, source: ProbeSource::Registry });
    }

    Handle::try_current().ok().map(|_| {
        let status = if tokio::task::try_id().is_some() {
            SchedulerStatus::Running
        } else {
            SchedulerStatus::Idle
        };
        SchedulerProbe { status, source: ProbeSource::Tokio }
    })
}

/// Shorthand for "a scheduler exists here and is running".
#[must_use]
pub fn is_running() -> bool {
    current().is_some_and(|probe| probe.is_running())
}

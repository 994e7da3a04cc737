//! # Runtime
//!
//! A thin orchestration layer over the [Tokio](https://tokio.rs) runtime that keeps
//! track of *whether the current thread is driving scheduled work*.
//!
//! * [`registry`] holds the per-thread scheduler state queried by the guard.
//! * [`Scheduler`] builds a runtime from a [`RuntimeConfig`] profile and registers the
//!   calling thread as running for the duration of [`Scheduler::block_on`].
//! * [`sync_to_async`] offloads synchronous work to the blocking pool, where the
//!   thread is registered as idle.
//!
//! ## Profiles
//! * **Default**: Worker threads auto-detected, 3 `MiB` stacks.
//! * **High Performance**: Larger stacks and longer keep-alive for servers.
//! * **Memory Efficient**: Half the workers and smaller stacks for clients.
//! * **Current Thread**: A single-threaded cooperative scheduler.
//!
//! ## Example
//!
//! ```rust
//! use loopguard_runtime::{RuntimeConfig, Scheduler, registry};
//!
//! let scheduler = Scheduler::new(&RuntimeConfig::current_thread())?;
//! let running = scheduler.block_on(async { registry::is_running() });
//! assert!(running);
//! assert!(!registry::is_running());
//! # Ok::<(), anyhow::Error>(())
//! ```

mod config;
pub mod registry;
mod scheduler;

pub use anyhow::Result;
pub use config::{RuntimeConfig, RuntimeFlavor};
pub use registry::{ProbeSource, SchedulerProbe, SchedulerStatus};
pub use scheduler::{Scheduler, SchedulerEnterGuard, get_global_scheduler, sync_to_async};

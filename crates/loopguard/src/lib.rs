//! Facade crate for the loopguard workspace.
//! Re-exports the guard, the scheduler and the settings, plus the macros whose
//! expansions resolve through `::loopguard`.
//! Keep this crate thin: it composes other crates, it does not implement logic.
//!
//! ## Usage
//! ```rust
//! use loopguard::{GuardError, async_unsafe, runtime::{RuntimeConfig, Scheduler}};
//!
//! #[async_unsafe("open files from a worker thread")]
//! fn read_config() -> Result<&'static str, GuardError> {
//!     Ok("[guard]")
//! }
//!
//! // Plain synchronous call: no scheduler on this thread.
//! assert_eq!(read_config(), Ok("[guard]"));
//!
//! // Called while the scheduler drives this thread: refused.
//! let scheduler = Scheduler::new(&RuntimeConfig::current_thread())?;
//! let refused = scheduler.block_on(async { read_config() });
//! assert_eq!(refused.unwrap_err().message(), "open files from a worker thread");
//!
//! // Offloaded to the blocking pool: allowed.
//! let offloaded = scheduler.block_on(loopguard::sync_to_async(read_config))?;
//! assert_eq!(offloaded, Ok("[guard]"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use loopguard_derive::{async_unsafe, main};
pub use loopguard_guard::{
    AsyncUnsafe, DEFAULT_MESSAGE, GuardError, GuardErrorExt, guard_default, guard_with_message,
};
pub use loopguard_kernel as kernel;
pub use loopguard_kernel::settings;
pub use loopguard_runtime as runtime;
pub use loopguard_runtime::sync_to_async;

/// Loads settings from `path` (plus `LOOPGUARD__*` overrides) and installs them
/// process-wide.
///
/// # Errors
/// Returns an error if loading fails or settings were already installed.
pub fn init(
    path: Option<impl AsRef<std::path::Path>>,
) -> Result<&'static settings::Settings, kernel::ConfigError> {
    let loaded = kernel::config::load_settings(path)?;
    settings::install(loaded)
}

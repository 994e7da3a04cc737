//! Kernel utilities shared across the workspace.
//! Keep this crate lightweight: it owns the settings model and how settings reach the
//! process, nothing else.
//!
//! ## Settings
//! Settings are loaded once at startup and installed as a read-only process-wide value:
//! ```rust,no_run
//! use loopguard_kernel::{config::load_settings, settings};
//!
//! let loaded = load_settings(None::<&str>)?;
//! let installed = settings::install(loaded)?;
//! assert!(!installed.guard.allow_async_unsafe);
//! # Ok::<(), loopguard_kernel::config::ConfigError>(())
//! ```
//!
//! Nothing mutates the installed value afterwards. Components that need different
//! settings (tests, embedded use) take an explicit [`settings::Settings`] instead.

pub mod config;
pub mod settings;

pub use crate::config::{ConfigError, ConfigErrorExt};
pub use crate::settings::{DEFAULT_MESSAGE, GuardSettings, LoggingSettings, Settings};

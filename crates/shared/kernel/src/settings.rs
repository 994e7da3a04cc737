use crate::config::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::{debug, info};

/// Message reported when a guarded function is called while a scheduler runs.
pub const DEFAULT_MESSAGE: &str =
    "You cannot call this from an async context - use a thread or sync_to_async.";

static SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Top-level settings shared across the workspace.
#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub guard: GuardSettings,
    pub logging: LoggingSettings,
}

/// Knobs of the async-unsafe guard.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GuardSettings {
    /// Disables the guard entirely when `true`.
    pub allow_async_unsafe: bool,
    /// Message used by guards that were not given one explicitly.
    pub default_message: String,
}

/// Logger defaults applied by `Logger::from_settings`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub env_filter: Option<String>,
    /// Directory for rolling log files; console only when unset.
    pub directory: Option<PathBuf>,
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self { allow_async_unsafe: false, default_message: DEFAULT_MESSAGE.to_owned() }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: "info".to_owned(), env_filter: None, directory: None }
    }
}

/// Installs the process-wide settings.
///
/// Call once during startup, before any guarded function runs.
///
/// # Errors
/// Returns [`ConfigError::AlreadyInstalled`] if settings were installed before, or if
/// [`current`] was already called and locked in the defaults.
pub fn install(settings: Settings) -> Result<&'static Settings, ConfigError> {
    SETTINGS.set(settings).map_err(|_| ConfigError::AlreadyInstalled {
        context: Some("settings::install called twice or after first read".into()),
    })?;

    let installed = current();
    info!(allow_async_unsafe = installed.guard.allow_async_unsafe, "Settings installed");
    Ok(installed)
}

/// The process-wide settings.
///
/// Falls back to [`Settings::default`] when nothing was installed; that fallback is
/// permanent for the rest of the process.
pub fn current() -> &'static Settings {
    SETTINGS.get_or_init(|| {
        debug!("No settings installed, using defaults");
        Settings::default()
    })
}

/// Whether the process-wide settings have been fixed, by [`install`] or a first read.
pub fn is_initialized() -> bool {
    SETTINGS.get().is_some()
}

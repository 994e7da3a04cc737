use crate::settings::Settings;
use config::{Config, Environment, File, Map};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// File looked up when no explicit path is given (any supported extension).
const DEFAULT_SOURCE: &str = "loopguard";
/// Prefix for environment overrides, e.g. `LOOPGUARD__GUARD__ALLOW_ASYNC_UNSAFE`.
const ENV_PREFIX: &str = "LOOPGUARD";

/// Errors raised while loading or installing settings.
#[loopguard_derive::loopguard_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },

    #[error("Settings are already installed{}", format_context(.context))]
    AlreadyInstalled { context: Option<Cow<'static, str>> },
}

/// Loads the workspace [`Settings`].
///
/// Layers, lowest priority first:
/// 1. Built-in defaults.
/// 2. **Base File**: `path`, or `loopguard.{toml,json,yaml,...}` in the working
///    directory. An explicit path must exist; the default file is optional.
/// 3. **Environment Overrides**: variables prefixed with `LOOPGUARD__`, nested keys
///    separated by `__` (`LOOPGUARD__GUARD__ALLOW_ASYNC_UNSAFE=true`).
///
/// # Errors
/// Returns [`ConfigError::Config`] if an explicit file is missing, a source is
/// malformed, or the merged values do not deserialize into [`Settings`].
pub fn load_settings(path: Option<impl AsRef<Path>>) -> Result<Settings, ConfigError> {
    load_config(path)
}

/// Loads any deserializable config type with the same layering as [`load_settings`].
///
/// # Errors
/// See [`load_settings`].
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load_with_env(path.map(|p| p.as_ref().to_path_buf()), None)
}

fn load_with_env<T>(path: Option<PathBuf>, env: Option<Map<String, String>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let required = path.is_some();
    let effective_path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE));

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

    info!(required, "Loading config from {}", effective_path.display());

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::DEFAULT_MESSAGE;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> Option<Map<String, String>> {
        Some(pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect())
    }

    #[test]
    fn test_missing_default_file_yields_defaults() -> Result<(), ConfigError> {
        let settings: Settings = load_with_env(None, env(&[]))?;
        assert_eq!(settings, Settings::default());
        Ok(())
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result: Result<Settings, _> =
            load_with_env(Some(PathBuf::from("definitely/not/here.toml")), env(&[]));
        assert!(matches!(result, Err(ConfigError::Config { .. })));
    }

    #[test]
    fn test_env_overrides_flag() -> Result<(), ConfigError> {
        let settings: Settings = load_with_env(
            None,
            env(&[("LOOPGUARD__GUARD__ALLOW_ASYNC_UNSAFE", "true")]),
        )?;

        assert!(settings.guard.allow_async_unsafe);
        assert_eq!(settings.guard.default_message, DEFAULT_MESSAGE);
        Ok(())
    }

    #[test]
    fn test_file_then_env_layering() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("loopguard.toml");
        let mut file = std::fs::File::create(&path)?;
        writeln!(
            file,
            "[guard]\nallow_async_unsafe = true\ndefault_message = \"use a worker thread\"\n\n[logging]\nlevel = \"debug\""
        )?;

        let settings: Settings =
            load_with_env(Some(path), env(&[("LOOPGUARD__GUARD__ALLOW_ASYNC_UNSAFE", "false")]))?;

        assert!(!settings.guard.allow_async_unsafe, "environment must win over the file");
        assert_eq!(settings.guard.default_message, "use a worker thread");
        assert_eq!(settings.logging.level, "debug");
        Ok(())
    }
}

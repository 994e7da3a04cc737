use crate::error::GuardError;
use loopguard_kernel::settings::{self, Settings};
use loopguard_runtime::registry;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{trace, warn};

#[derive(Debug, Clone)]
enum SettingsSource {
    Global,
    Pinned(Arc<Settings>),
}

/// Refuses calls made while a scheduler is running on the calling thread.
///
/// A guard is a message plus a settings source. It holds no mutable state, so one
/// value can be shared freely and checked from any thread.
///
/// Each [`check`](Self::check):
/// 1. passes if `guard.allow_async_unsafe` is set,
/// 2. passes if the thread has no scheduler, or its scheduler is idle,
/// 3. fails with [`GuardError::SynchronousOnlyOperation`] otherwise.
#[derive(Debug, Clone)]
pub struct AsyncUnsafe {
    message: Option<Cow<'static, str>>,
    settings: SettingsSource,
}

impl Default for AsyncUnsafe {
    fn default() -> Self {
        Self::new()
    }
}

impl AsyncUnsafe {
    /// A guard reporting the configured default message.
    #[must_use]
    pub const fn new() -> Self {
        Self { message: None, settings: SettingsSource::Global }
    }

    /// A guard reporting `message`.
    #[must_use]
    pub fn with_message(message: impl Into<Cow<'static, str>>) -> Self {
        Self { message: Some(message.into()), settings: SettingsSource::Global }
    }

    /// `const` form of [`with_message`](Self::with_message), used by `#[async_unsafe("..")]`.
    #[must_use]
    pub const fn from_static(message: &'static str) -> Self {
        Self { message: Some(Cow::Borrowed(message)), settings: SettingsSource::Global }
    }

    /// Reads `settings` instead of the process-wide value.
    #[must_use]
    pub fn with_settings(mut self, settings: Arc<Settings>) -> Self {
        self.settings = SettingsSource::Pinned(settings);
        self
    }

    /// The message a failed check reports.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_else(|| self.settings().guard.default_message.as_str())
    }

    /// Fails if the calling thread is executing scheduled work.
    ///
    /// # Errors
    /// Returns [`GuardError::SynchronousOnlyOperation`] carrying [`message`](Self::message)
    /// when a scheduler is running on this thread and the override is off.
    pub fn check(&self) -> Result<(), GuardError> {
        if self.settings().guard.allow_async_unsafe {
            trace!("async-unsafe guard disabled by settings");
            return Ok(());
        }

        match registry::current() {
            Some(probe) if probe.is_running() => {
                let message = self.owned_message();
                warn!(source = ?probe.source, "Blocked synchronous-only call: {message}");
                Err(GuardError::SynchronousOnlyOperation { message, context: None })
            }
            _ => Ok(()),
        }
    }

    /// Wraps `f` so every call runs [`check`](Self::check) first.
    ///
    /// The wrapped callable has the same signature as `f`; several arguments are
    /// passed as a tuple. Errors from `f` are returned untouched.
    ///
    /// ```rust
    /// use loopguard_guard::{AsyncUnsafe, GuardError};
    ///
    /// let add = AsyncUnsafe::with_message("no adding on the scheduler")
    ///     .wrap(|(a, b): (i32, i32)| Ok::<_, GuardError>(a + b));
    /// assert_eq!(add((2, 3)), Ok(5));
    /// ```
    pub fn wrap<F, A, R, E>(self, f: F) -> impl Fn(A) -> Result<R, E>
    where
        F: Fn(A) -> Result<R, E>,
        E: From<GuardError>,
    {
        move |args| {
            self.check()?;
            f(args)
        }
    }

    fn settings(&self) -> &Settings {
        match &self.settings {
            SettingsSource::Global => settings::current(),
            SettingsSource::Pinned(settings) => settings.as_ref(),
        }
    }

    fn owned_message(&self) -> Cow<'static, str> {
        match (&self.message, &self.settings) {
            (Some(message), _) => message.clone(),
            (None, SettingsSource::Global) => {
                Cow::Borrowed(settings::current().guard.default_message.as_str())
            }
            (None, SettingsSource::Pinned(settings)) => {
                Cow::Owned(settings.guard.default_message.clone())
            }
        }
    }
}

/// Wraps `f` with a guard reporting the default message.
///
/// ```rust
/// use loopguard_guard::{GuardError, guard_default};
///
/// let double = guard_default(|x: u64| Ok::<_, GuardError>(x * 2));
/// assert_eq!(double(21), Ok(42));
/// ```
pub fn guard_default<F, A, R, E>(f: F) -> impl Fn(A) -> Result<R, E>
where
    F: Fn(A) -> Result<R, E>,
    E: From<GuardError>,
{
    AsyncUnsafe::new().wrap(f)
}

/// Builds a guard reporting `message`; apply it with [`AsyncUnsafe::wrap`].
#[must_use]
pub fn guard_with_message(message: impl Into<Cow<'static, str>>) -> AsyncUnsafe {
    AsyncUnsafe::with_message(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use loopguard_kernel::{DEFAULT_MESSAGE, GuardSettings};
    use loopguard_runtime::registry::SchedulerStatus;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn pinned(allow_async_unsafe: bool, default_message: &str) -> Arc<Settings> {
        Arc::new(Settings {
            guard: GuardSettings { allow_async_unsafe, default_message: default_message.to_owned() },
            ..Settings::default()
        })
    }

    #[test]
    fn test_passes_without_scheduler() {
        assert_eq!(AsyncUnsafe::new().check(), Ok(()));
    }

    #[test]
    fn test_passes_when_scheduler_idle() {
        let _idle = registry::enter(SchedulerStatus::Idle);
        assert_eq!(AsyncUnsafe::new().check(), Ok(()));
    }

    #[test]
    fn test_blocks_when_running_without_calling() {
        let calls = AtomicUsize::new(0);
        let wrapped = guard_with_message("custom message").wrap(|()| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, GuardError>(())
        });

        let _running = registry::enter(SchedulerStatus::Running);
        let err = wrapped(()).expect_err("guard should block");

        assert_eq!(err.message(), "custom message");
        assert_eq!(err.to_string(), "custom message");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_default_message_literal() {
        let _running = registry::enter(SchedulerStatus::Running);
        let err = AsyncUnsafe::new()
            .with_settings(Arc::new(Settings::default()))
            .check()
            .expect_err("guard should block");

        assert_eq!(err.message(), DEFAULT_MESSAGE);
        assert_eq!(
            err.message(),
            "You cannot call this from an async context - use a thread or sync_to_async."
        );
    }

    #[test]
    fn test_default_message_follows_settings() {
        let guard = AsyncUnsafe::new().with_settings(pinned(false, "offload me"));
        assert_eq!(guard.message(), "offload me");

        let _running = registry::enter(SchedulerStatus::Running);
        assert_eq!(guard.check().map_err(|e| e.message().to_owned()), Err("offload me".to_owned()));
    }

    #[test]
    fn test_explicit_message_wins_over_settings() {
        let guard = AsyncUnsafe::with_message("explicit").with_settings(pinned(false, "offload me"));
        assert_eq!(guard.message(), "explicit");
    }

    #[test]
    fn test_override_flag_bypasses_running_scheduler() {
        let calls = AtomicUsize::new(0);
        let wrapped = AsyncUnsafe::new().with_settings(pinned(true, DEFAULT_MESSAGE)).wrap(|x: u8| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, GuardError>(x + 1)
        });

        let _running = registry::enter(SchedulerStatus::Running);
        assert_eq!(wrapped(1), Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_inner_errors_pass_through() {
        #[derive(Debug, PartialEq)]
        enum AppError {
            Guard(GuardError),
            NotFound(u32),
        }
        impl From<GuardError> for AppError {
            fn from(err: GuardError) -> Self {
                Self::Guard(err)
            }
        }

        let lookup = guard_default(|id: u32| Err::<(), _>(AppError::NotFound(id)));
        assert_eq!(lookup(7), Err(AppError::NotFound(7)));

        let _running = registry::enter(SchedulerStatus::Running);
        assert!(matches!(lookup(7), Err(AppError::Guard(_))));
    }

    #[test]
    fn test_double_wrapping_is_idempotent() {
        let calls = AtomicUsize::new(0);
        let once = |x: i64| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, GuardError>(x * 3)
        };
        let twice = guard_default(guard_default(once));

        assert_eq!(twice(2), Ok(6));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let _running = registry::enter(SchedulerStatus::Running);
        let err = twice(2).expect_err("guard should block");
        assert!(err.is_synchronous_only_operation());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_both_forms_differ_only_in_message() {
        let bare = guard_default(|x: u8| Ok::<_, GuardError>(x));
        let with_message = guard_with_message("custom message").wrap(|x: u8| Ok::<_, GuardError>(x));
        assert_eq!(bare(4), with_message(4));

        let _running = registry::enter(SchedulerStatus::Running);
        let (a, b) = (bare(4).expect_err("blocked"), with_message(4).expect_err("blocked"));
        assert!(a.is_synchronous_only_operation() && b.is_synchronous_only_operation());
        assert_eq!(b.message(), "custom message");
    }
}

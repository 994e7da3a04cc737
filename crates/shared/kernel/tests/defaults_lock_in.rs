use loopguard_kernel::settings::{self, Settings};
use loopguard_kernel::ConfigError;

#[test]
fn first_read_locks_in_defaults() {
    assert!(!settings::is_initialized());
    assert_eq!(settings::current(), &Settings::default());

    let err = settings::install(Settings::default()).expect_err("install after read must fail");
    assert!(matches!(err, ConfigError::AlreadyInstalled { .. }));
    assert_eq!(err.to_string(), "Settings are already installed (settings::install called twice or after first read)");
}

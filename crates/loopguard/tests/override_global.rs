use loopguard::runtime::{RuntimeConfig, Scheduler};
use loopguard::settings::{self, GuardSettings, Settings};
use loopguard::{GuardError, async_unsafe, guard_default};

#[async_unsafe]
fn blocking_read() -> Result<&'static str, GuardError> {
    Ok("data")
}

#[test]
fn installed_override_disables_the_guard() {
    settings::install(Settings {
        guard: GuardSettings { allow_async_unsafe: true, ..GuardSettings::default() },
        ..Settings::default()
    })
    .expect("settings should install once");

    let wrapped = guard_default(|x: u8| Ok::<_, GuardError>(x * 2));
    let scheduler = Scheduler::new(&RuntimeConfig::current_thread()).expect("scheduler should build");

    let (read, doubled) = scheduler.block_on(async { (blocking_read(), wrapped(21)) });
    assert_eq!(read, Ok("data"));
    assert_eq!(doubled, Ok(42));
}

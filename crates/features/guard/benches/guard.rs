use criterion::{Criterion, criterion_group, criterion_main};
use loopguard_guard::{AsyncUnsafe, GuardError, guard_default};
use loopguard_runtime::registry::{self, SchedulerStatus};
use std::hint::black_box;

fn bench_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("check");
    let guard = AsyncUnsafe::new();

    group.bench_function("no_scheduler", |b| {
        b.iter(|| black_box(guard.check()).is_ok());
    });

    group.bench_function("idle_scheduler", |b| {
        let _idle = registry::enter(SchedulerStatus::Idle);
        b.iter(|| black_box(guard.check()).is_ok());
    });

    group.bench_function("running_scheduler_blocked", |b| {
        let _running = registry::enter(SchedulerStatus::Running);
        b.iter(|| black_box(guard.check()).is_err());
    });

    group.finish();
}

fn bench_wrapped_call(c: &mut Criterion) {
    let mut group = c.benchmark_group("wrapped_call");
    let direct = |x: u64| Ok::<_, GuardError>(x.wrapping_mul(31));
    let wrapped = guard_default(direct);

    group.bench_function("direct", |b| b.iter(|| direct(black_box(7))));
    group.bench_function("guarded", |b| b.iter(|| wrapped(black_box(7))));

    group.finish();
}

criterion_group!(benches, bench_check, bench_wrapped_call);
criterion_main!(benches);

use loopguard::{GuardError, async_unsafe, sync_to_async};
use loopguard_logger::Logger;
use tracing::{error, info};

#[loopguard::main(current_thread)]
async fn main() -> anyhow::Result<()> {
    let settings = loopguard::init(std::env::args_os().nth(1))?;
    let _logger = Logger::from_settings(env!("CARGO_PKG_NAME"), &settings.logging)?;
    info!(allow_async_unsafe = settings.guard.allow_async_unsafe, "Settings loaded");

    match checksum(b"loopguard") {
        Ok(sum) => info!(sum, "Guarded call ran on the scheduler thread"),
        Err(err) => error!("Guarded call refused: {err}"),
    }

    let sum = sync_to_async(|| checksum(b"loopguard")).await??;
    info!(sum, "Guarded call ran on the blocking pool");

    Ok(())
}

#[async_unsafe("checksum reads the whole buffer synchronously; offload it")]
fn checksum(bytes: &[u8]) -> Result<u32, GuardError> {
    Ok(bytes.iter().fold(0u32, |acc, b| acc.rotate_left(5) ^ u32::from(*b)))
}

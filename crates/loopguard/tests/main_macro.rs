use loopguard::runtime::registry::{self, ProbeSource};

#[loopguard::main(current_thread)]
async fn drive_current_thread() -> anyhow::Result<bool> {
    Ok(registry::is_running())
}

#[loopguard::main]
async fn drive_default() -> anyhow::Result<Option<ProbeSource>> {
    Ok(registry::current().map(|probe| probe.source))
}

#[test]
fn main_attribute_registers_the_driving_thread() -> anyhow::Result<()> {
    assert!(drive_current_thread()?);
    assert_eq!(drive_default()?, Some(ProbeSource::Registry));
    assert!(!registry::is_running(), "registration must end with the generated function");
    Ok(())
}

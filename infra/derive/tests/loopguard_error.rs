#[test]
fn loopguard_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/loopguard_error_pass.rs");
}

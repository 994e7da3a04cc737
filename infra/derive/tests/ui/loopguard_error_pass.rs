use loopguard_derive::loopguard_error;
use std::borrow::Cow;

#[loopguard_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<(), DemoError> {
    Err::<(), _>(std::io::Error::other("disk")).context("reading demo file")?;
    Ok(())
}

fn main() {
    let err = read().expect_err("io error expected");
    assert_eq!(err.to_string(), "IO error (reading demo file): disk");

    let internal: DemoError = "boom".into();
    assert_eq!(internal.to_string(), "Internal error: boom");
}

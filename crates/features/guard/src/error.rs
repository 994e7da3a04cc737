use std::borrow::Cow;

/// Errors raised by the async-unsafe guard.
#[loopguard_derive::loopguard_error]
#[derive(Clone, PartialEq, Eq)]
pub enum GuardError {
    /// A synchronous-only function was called while a scheduler was running on the
    /// calling thread. The function did not run.
    #[error("{message}{}", format_context(.context))]
    SynchronousOnlyOperation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl GuardError {
    /// The guard message, without any attached context.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::SynchronousOnlyOperation { message, .. } => message,
        }
    }

    #[must_use]
    pub const fn is_synchronous_only_operation(&self) -> bool {
        matches!(self, Self::SynchronousOnlyOperation { .. })
    }
}

//! Guard feature slice: refuses synchronous-only calls made while a scheduler is
//! running on the calling thread.
//!
//! The guard consults two collaborators and nothing else:
//! * the process-wide (or injected) settings from `loopguard-kernel`, for the
//!   `guard.allow_async_unsafe` override and the default message,
//! * the thread-local scheduler registry from `loopguard-runtime`.
//!
//! ```rust
//! use loopguard_guard::{GuardError, guard_with_message};
//!
//! let shout = guard_with_message("render on a worker thread")
//!     .wrap(|s: String| Ok::<_, GuardError>(s.to_uppercase()));
//! assert_eq!(shout("hi".to_owned()), Ok("HI".to_owned()));
//! ```

mod error;
mod guard;

pub use crate::error::{GuardError, GuardErrorExt};
pub use crate::guard::{AsyncUnsafe, guard_default, guard_with_message};
pub use loopguard_kernel::DEFAULT_MESSAGE;

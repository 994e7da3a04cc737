#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the loopguard workspace.
//!
//! * [`macro@async_unsafe`] marks a synchronous function as unsafe to call while a
//!   scheduler is running on the calling thread.
//! * [`macro@main`] bootstraps an `async fn main` on a pre-configured scheduler.
//! * [`macro@loopguard_error`] turns an enum into a context-aware error type.
//!
//! ## Usage
//! Consumers should depend on the `loopguard` facade; every expansion resolves its
//! paths through `::loopguard`, except [`macro@loopguard_error`] which only needs
//! `thiserror` in scope.
//!
//! Examples below are `ignore`d to avoid compiling in this crate.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, parse_macro_input};

/// Guards a synchronous function against calls made while a scheduler is running.
///
/// The attribute inserts a check in front of the function body. When the check fails
/// the function returns early with `GuardError::SynchronousOnlyOperation`, converted
/// into the function's error type through `From`. The signature is left untouched.
///
/// # Arguments
///
/// * *(none)* - Uses the configured default message.
/// * `"message"` - A string literal reported on failure.
///
/// # Errors
///
/// Emits a compile-time error when applied to an `async fn`, to a function that does
/// not return a `Result`, or when the argument is not a single string literal.
///
/// # Examples
///
/// ```rust,ignore
/// use loopguard::{GuardError, async_unsafe};
///
/// #[async_unsafe]
/// fn read_blocking(path: &str) -> Result<String, GuardError> {
///     Ok(std::fs::read_to_string(path).unwrap_or_default())
/// }
///
/// #[async_unsafe("database cursors are synchronous")]
/// fn fetch_row(id: u64) -> Result<u64, GuardError> {
///     Ok(id)
/// }
/// ```
#[proc_macro_attribute]
pub fn async_unsafe(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::guard::expand_async_unsafe(args.into(), input).into()
}

/// Attribute macro to bootstrap the scheduler.
///
/// Transforms an `async fn main` into a standard `fn main` that builds a
/// `loopguard::runtime::Scheduler` from the named profile and drives the body with
/// `Scheduler::block_on`, so the main thread is registered as running.
///
/// # Arguments
///
/// * `high_performance` - Optimized for high-throughput server environments.
/// * `memory_efficient` - Optimized for low-footprint client or edge environments.
/// * `current_thread` - Single-threaded scheduler driven by the main thread only.
/// * `default` - Worker threads auto-detected based on available parallelism.
///
/// # Examples
///
/// ```rust,ignore
/// #[loopguard::main(current_thread)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Attribute macro for defining domain-specific error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` when missing.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants carrying a source
///   field, enabling `?` on upstream errors.
/// * **Internal Fallback**: Implements `From<&'static str>` and `From<String>` when an
///   `Internal` variant is present.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants.
/// 2. A `context` field, when present, must be `Option<Cow<'static, str>>`.
/// 3. Variants with a `source` field (or a field marked `#[source]`/`#[from]`) must
///    also carry a `context` field.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[loopguard_derive::loopguard_error]
/// pub enum StoreError {
///     #[error("IO error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn loopguard_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

use super::returns_result;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Error, ItemFn, LitStr};

/// Expands the `#[loopguard::async_unsafe]` attribute macro.
#[must_use]
pub fn expand_async_unsafe(args: TokenStream, input: ItemFn) -> TokenStream {
    if let Some(asyncness) = &input.sig.asyncness {
        return Error::new_spanned(
            asyncness,
            "The #[async_unsafe] attribute can only be used on synchronous functions",
        )
        .to_compile_error();
    }

    if !returns_result(&input.sig.output) {
        return Error::new_spanned(
            &input.sig,
            "The #[async_unsafe] attribute requires a Result return type whose error implements From<GuardError>",
        )
        .to_compile_error();
    }

    let guard = match parse_guard(args) {
        Ok(guard) => guard,
        Err(err) => return err,
    };

    let ItemFn { attrs, vis, sig, block } = input;

    quote! {
        #(#attrs)*
        #vis #sig {
            #guard.check()?;
            #block
        }
    }
}

fn parse_guard(args: TokenStream) -> Result<TokenStream, TokenStream> {
    if args.is_empty() {
        return Ok(quote! { ::loopguard::AsyncUnsafe::new() });
    }

    let message: LitStr = syn::parse2(args).map_err(|err| {
        Error::new(err.span(), "Expected a single string literal, e.g. #[async_unsafe(\"reason\")]")
            .to_compile_error()
    })?;

    Ok(quote! { ::loopguard::AsyncUnsafe::from_static(#message) })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(args: TokenStream, item: TokenStream) -> String {
        let input: ItemFn = syn::parse2(item).expect("item should parse");
        expand_async_unsafe(args, input).to_string()
    }

    #[test]
    fn bare_form_uses_default_guard() {
        let out = expand(quote! {}, quote! { fn f() -> Result<(), E> { Ok(()) } });
        assert!(out.contains("AsyncUnsafe :: new ()"));
        assert!(out.contains("check ()"));
    }

    #[test]
    fn message_form_embeds_literal() {
        let out = expand(quote! { "custom message" }, quote! { fn f() -> Result<(), E> { Ok(()) } });
        assert!(out.contains("from_static (\"custom message\")"));
    }

    #[test]
    fn async_fn_is_rejected() {
        let out = expand(quote! {}, quote! { async fn f() -> Result<(), E> { Ok(()) } });
        assert!(out.contains("compile_error"));
    }

    #[test]
    fn non_result_return_is_rejected() {
        let out = expand(quote! {}, quote! { fn f() -> u32 { 1 } });
        assert!(out.contains("compile_error"));
    }

    #[test]
    fn non_literal_argument_is_rejected() {
        let out = expand(quote! { some_ident }, quote! { fn f() -> Result<(), E> { Ok(()) } });
        assert!(out.contains("compile_error"));
    }
}

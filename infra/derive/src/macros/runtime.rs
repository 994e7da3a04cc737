use super::returns_result;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Error, ItemFn};

/// Expands the `#[loopguard::main]` attribute macro.
#[must_use]
pub fn expand_main(args: TokenStream, input: ItemFn) -> TokenStream {
    if input.sig.asyncness.is_none() {
        return Error::new_spanned(
            &input.sig.ident,
            "The #[loopguard::main] attribute can only be used on async functions",
        )
        .to_compile_error();
    }

    if !returns_result(&input.sig.output) {
        return Error::new_spanned(
            &input.sig.output,
            "The #[loopguard::main] attribute requires a Result return type",
        )
        .to_compile_error();
    }

    let name = &input.sig.ident;
    let body = &input.block;
    let vis = &input.vis;
    let attrs = &input.attrs;
    let output = &input.sig.output;

    let runtime_call = match parse_profile(args) {
        Ok(profile) => profile,
        Err(err) => return err,
    };

    quote! {
        #(#attrs)*
        #vis fn #name() #output {
            let config = #runtime_call;
            let scheduler = ::loopguard::runtime::Scheduler::new(&config)?;
            scheduler.block_on(async { #body })
        }
    }
}

fn parse_profile(args: TokenStream) -> Result<TokenStream, TokenStream> {
    if args.is_empty() {
        return Ok(quote! { ::loopguard::runtime::RuntimeConfig::default() });
    }

    let ident: syn::Ident = syn::parse2(args).map_err(|err| err.to_compile_error())?;
    let preset = match ident.to_string().as_str() {
        "high_performance" => quote! { high_performance() },
        "memory_efficient" => quote! { memory_efficient() },
        "current_thread" => quote! { current_thread() },
        "default" => quote! { default() },
        _ => {
            return Err(Error::new_spanned(
                ident,
                "Unknown runtime profile. Use: high_performance, memory_efficient, current_thread, or default",
            )
            .to_compile_error());
        }
    };

    Ok(quote! { ::loopguard::runtime::RuntimeConfig::#preset })
}

//! Compile-time wiring macros for layergen.
//!
//! This crate provides derive macros for resolving values out of a shared
//! context:
//! - `#[derive(Provider)]` makes every field of a context struct extractable
//! - `#[derive(Wired)]` builds a struct by resolving each field from a context
//!
//! Generated code references `crate::di::FromRef`, so the consuming crate
//! must expose the trait at that path.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod fields;
mod provider;
mod wired;

/// Derive macro for a context that hands out its fields.
///
/// Generates one `FromRef<Self>` implementation per field (cloning the
/// field) and an inherent `provide::<T>()` accessor. Fields marked
/// `#[provider(skip)]` are not exposed.
///
/// # Example
///
/// ```ignore
/// #[derive(Provider, Clone)]
/// pub struct Context {
///     pub conventions: Arc<Conventions>,
/// }
///
/// // Generated:
/// // impl FromRef<Context> for Arc<Conventions> { ... }
/// // impl Context { pub fn provide<T: FromRef<Self>>(&self) -> T { ... } }
/// ```
#[proc_macro_derive(Provider, attributes(provider))]
pub fn derive_provider(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    provider::expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Derive macro for types that are assembled from a context.
///
/// Each field is resolved through `FromRef<Context>`. The context defaults
/// to `crate::context::Context` and can be overridden with
/// `#[wired(context = path::To::Context)]`. A field marked
/// `#[wired(default)]` is initialized with `Default::default()` instead.
///
/// # Example
///
/// ```ignore
/// #[derive(Wired, Clone)]
/// pub struct InjectableRule {
///     conventions: Arc<Conventions>, // Arc<Conventions>::from_ref(ctx)
/// }
/// ```
#[proc_macro_derive(Wired, attributes(wired))]
pub fn derive_wired(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    wired::expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

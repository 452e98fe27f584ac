//! Implementation of `#[derive(Wired)]`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse_quote, Data, DeriveInput, Fields, Path};

use crate::fields::{has_flag, named_fields};

pub fn expand(input: DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let context = context_path(&input)?;

    // Stateless unit structs are built as-is
    if let Data::Struct(data) = &input.data {
        if matches!(data.fields, Fields::Unit) {
            return Ok(quote! {
                impl #impl_generics crate::di::FromRef<#context> for #name #ty_generics #where_clause {
                    fn from_ref(_ctx: &#context) -> Self {
                        Self
                    }
                }
            });
        }
    }

    let mut field_inits = Vec::new();
    for field in named_fields(&input, "Wired")? {
        let field_name = &field.ident;
        let field_type = &field.ty;

        if has_flag(&field.attrs, "wired", "default")? {
            field_inits.push(quote! {
                #field_name: ::std::default::Default::default()
            });
        } else {
            field_inits.push(quote! {
                #field_name: <#field_type as crate::di::FromRef<#context>>::from_ref(ctx)
            });
        }
    }

    Ok(quote! {
        impl #impl_generics crate::di::FromRef<#context> for #name #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn from_ref(ctx: &#context) -> Self {
                Self {
                    #(#field_inits),*
                }
            }
        }
    })
}

/// Reads `#[wired(context = path::To::Context)]`, defaulting to the crate context.
fn context_path(input: &DeriveInput) -> syn::Result<Path> {
    let mut context: Option<Path> = None;

    for attribute in input.attrs.iter().filter(|a| a.path().is_ident("wired")) {
        attribute.parse_nested_meta(|meta| {
            if meta.path.is_ident("context") {
                context = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("unsupported `wired` option, expected `context = Path`"))
            }
        })?;
    }

    Ok(context.unwrap_or_else(|| parse_quote!(crate::context::Context)))
}

//! Implementation of `#[derive(Provider)]`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

use crate::fields::{has_flag, named_fields};

pub fn expand(input: DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut impls = Vec::new();
    for field in named_fields(&input, "Provider")? {
        if has_flag(&field.attrs, "provider", "skip")? {
            continue;
        }
        let field_name = &field.ident;
        let field_type = &field.ty;

        impls.push(quote! {
            impl #impl_generics crate::di::FromRef<#name #ty_generics> for #field_type #where_clause {
                fn from_ref(ctx: &#name #ty_generics) -> Self {
                    ::std::clone::Clone::clone(&ctx.#field_name)
                }
            }
        });
    }

    Ok(quote! {
        #(#impls)*

        impl #impl_generics #name #ty_generics #where_clause {
            /// Resolves any value that can be assembled from this context.
            pub fn provide<T: crate::di::FromRef<Self>>(&self) -> T {
                <T as crate::di::FromRef<Self>>::from_ref(self)
            }
        }
    })
}

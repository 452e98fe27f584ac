//! Shared field and attribute helpers.

use syn::punctuated::Punctuated;
use syn::token::Comma;
use syn::{Attribute, Data, DeriveInput, Field, Fields};

/// Returns the named fields of a struct, or an error naming the derive.
pub fn named_fields<'a>(
    input: &'a DeriveInput,
    derive: &str,
) -> syn::Result<&'a Punctuated<Field, Comma>> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(&fields.named),
            _ => Err(syn::Error::new_spanned(
                &input.ident,
                format!("{derive} can only be derived for structs with named fields"),
            )),
        },
        _ => Err(syn::Error::new_spanned(
            &input.ident,
            format!("{derive} can only be derived for structs"),
        )),
    }
}

/// Checks for `#[attr(flag)]` on a field, rejecting any other option.
pub fn has_flag(attrs: &[Attribute], attr: &str, flag: &str) -> syn::Result<bool> {
    let mut found = false;
    for attribute in attrs.iter().filter(|a| a.path().is_ident(attr)) {
        attribute.parse_nested_meta(|meta| {
            if meta.path.is_ident(flag) {
                found = true;
                Ok(())
            } else {
                Err(meta.error(format!("unsupported `{attr}` option, expected `{flag}`")))
            }
        })?;
    }
    Ok(found)
}

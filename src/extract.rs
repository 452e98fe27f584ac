//! Member extraction.
//!
//! Selects the members each rule works on and interprets the marker
//! attributes `@EquatableKey` and `@Convertible(key:)`.

use crate::models::{
    BindingSpecifier, DeclarationDescriptor, FunctionDescriptor, PropertyDescriptor,
};
use crate::syntax;

/// Marks a property as part of generated equality.
pub const EQUATABLE_KEY: &str = "EquatableKey";

/// Overrides the domain key of a property: `@Convertible(key: "username")`.
pub const CONVERTIBLE: &str = "Convertible";

/// Recomputes `identity_key` / `explicit_key` from the property's attributes.
pub fn apply_markers(property: &mut PropertyDescriptor) {
    property.identity_key = property.attributes.iter().any(|a| a.name == EQUATABLE_KEY);
    property.explicit_key = property
        .attributes
        .iter()
        .filter(|a| a.name == CONVERTIBLE)
        .find_map(|a| {
            let clause = syntax::parse_clause(&a.clause).ok()?;
            let key = clause.value("key")?.string_literal()?;
            Some(key.to_string())
        });
}

/// Stored instance properties: not static, no accessor block.
pub fn stored_properties(decl: &DeclarationDescriptor) -> Vec<&PropertyDescriptor> {
    let properties: Vec<_> = decl
        .properties()
        .filter(|p| p.is_stored_instance())
        .collect();
    tracing::trace!(declaration = %decl.name, count = properties.len(), "Extracted stored properties");
    properties
}

/// Stored properties a memberwise initializer must (or may) assign.
///
/// `let` properties with an initial value cannot be reassigned and are
/// skipped, as are properties whose type could not be determined.
pub fn initializable_properties(decl: &DeclarationDescriptor) -> Vec<&PropertyDescriptor> {
    stored_properties(decl)
        .into_iter()
        .filter(|p| !(p.binding == BindingSpecifier::Let && p.initial_value.is_some()))
        .filter(|p| !p.ty.is_empty())
        .collect()
}

/// Immutable dependencies: `let`, stored, non-static, without initial value.
pub fn immutable_dependencies(decl: &DeclarationDescriptor) -> Vec<&PropertyDescriptor> {
    stored_properties(decl)
        .into_iter()
        .filter(|p| p.binding == BindingSpecifier::Let && p.initial_value.is_none())
        .filter(|p| !p.ty.is_empty())
        .collect()
}

/// Instance functions visible outside the type.
pub fn public_functions(decl: &DeclarationDescriptor) -> Vec<&FunctionDescriptor> {
    let functions: Vec<_> = decl
        .functions()
        .filter(|f| !f.is_private() && !f.is_static())
        .collect();
    tracing::trace!(declaration = %decl.name, count = functions.len(), "Extracted functions");
    functions
}

/// A designated initializer exists (non-failable, non-convenience).
pub fn has_usable_initializer(decl: &DeclarationDescriptor) -> bool {
    decl.initializers()
        .any(|init| !init.is_failable && !init.is_convenience)
}

pub fn has_property(decl: &DeclarationDescriptor, name: &str) -> bool {
    decl.properties().any(|p| p.name == name)
}

pub fn find_property<'a>(decl: &'a DeclarationDescriptor, name: &str) -> Option<&'a PropertyDescriptor> {
    decl.properties().find(|p| p.name == name)
}

pub fn find_function<'a>(decl: &'a DeclarationDescriptor, name: &str) -> Option<&'a FunctionDescriptor> {
    decl.functions().find(|f| f.name == name)
}

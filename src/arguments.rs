//! Argument clause parsing.
//!
//! Turns the raw clause of an invocation into typed arguments and the
//! ordered dependency bindings derived from them.
//!
//! # Example
//!
//! ```
//! use layergen::arguments::ArgumentClause;
//!
//! let clause = ArgumentClause::parse("<AuthRepository & ProfileRepository>").unwrap();
//! let names: Vec<_> = clause.bindings().unwrap().into_iter().map(|b| b.name).collect();
//! assert_eq!(names, vec!["authRepository", "profileRepository"]);
//! ```

use indexmap::IndexSet;

use crate::diagnostics::{self, Diagnostic, DiagnosticKind};
use crate::models::ArgumentBinding;
use crate::naming;
use crate::syntax::{self, TypeElement, ValueArgument};

/// Shape of one generic argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeArgument {
    /// `A & B & C`
    Composition(Vec<TypeElement>),
    /// `any X` / `some X`
    Existential(TypeElement),
    /// `X`
    Named(TypeElement),
}

impl TypeArgument {
    fn from_elements(mut elements: Vec<TypeElement>) -> Self {
        if elements.len() > 1 {
            return TypeArgument::Composition(elements);
        }
        let element = elements.remove(0);
        if element.qualifier.is_some() {
            TypeArgument::Existential(element)
        } else {
            TypeArgument::Named(element)
        }
    }

    pub fn elements(&self) -> &[TypeElement] {
        match self {
            TypeArgument::Composition(elements) => elements,
            TypeArgument::Existential(element) | TypeArgument::Named(element) => {
                std::slice::from_ref(element)
            }
        }
    }

    /// Type text as it would be written back: `A & B`, `any X`, `X`.
    pub fn text(&self) -> String {
        self.elements()
            .iter()
            .map(|e| e.text.as_str())
            .collect::<Vec<_>>()
            .join(" & ")
    }

    pub fn is_composition(&self) -> bool {
        matches!(self, TypeArgument::Composition(_))
    }

    pub fn is_existential(&self) -> bool {
        matches!(self, TypeArgument::Existential(_))
    }

    /// The single element of a non-composed argument.
    pub fn single(&self) -> Option<&TypeElement> {
        match self {
            TypeArgument::Composition(_) => None,
            TypeArgument::Existential(element) | TypeArgument::Named(element) => Some(element),
        }
    }

    /// One binding per element, in source order.
    pub fn bindings(&self) -> Result<Vec<ArgumentBinding>, Diagnostic> {
        self.elements().iter().map(binding_for).collect()
    }
}

/// Binding for one type element, named after its nominal base.
pub fn binding_for(element: &TypeElement) -> Result<ArgumentBinding, Diagnostic> {
    let base = element.base_name.as_deref().ok_or_else(|| {
        diagnostics::invalid_arguments(format!(
            "Cannot derive a dependency name from '{}'.",
            element.text
        ))
    })?;
    Ok(ArgumentBinding::new(
        naming::as_variable_name(base),
        element.text.clone(),
    ))
}

/// A parsed argument clause.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentClause {
    pub type_arguments: Vec<TypeArgument>,
    pub value_arguments: Vec<ValueArgument>,
}

impl ArgumentClause {
    /// Parses a raw clause; unparsable text is an `invalidArguments` diagnostic.
    pub fn parse(text: &str) -> Result<Self, Diagnostic> {
        let parsed = syntax::parse_clause(text).map_err(|err| {
            diagnostics::invalid_arguments(format!("Unable to parse arguments '{text}': {err}"))
        })?;
        Ok(Self {
            type_arguments: parsed
                .type_arguments
                .into_iter()
                .map(TypeArgument::from_elements)
                .collect(),
            value_arguments: parsed.value_arguments,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.type_arguments.is_empty() && self.value_arguments.is_empty()
    }

    /// Bindings of every type argument, in order, rejecting duplicate names.
    pub fn bindings(&self) -> Result<Vec<ArgumentBinding>, Diagnostic> {
        collect_bindings(&self.type_arguments)
    }

    /// Types named by the value arguments (`Foo.self`, `Foo`), in order.
    pub fn value_types(&self) -> Vec<&str> {
        self.value_arguments
            .iter()
            .filter_map(ValueArgument::type_name)
            .collect()
    }
}

/// Flattens the bindings of several arguments, rejecting duplicate names.
pub fn collect_bindings<'a>(
    arguments: impl IntoIterator<Item = &'a TypeArgument>,
) -> Result<Vec<ArgumentBinding>, Diagnostic> {
    let mut seen = IndexSet::new();
    let mut bindings = Vec::new();
    for argument in arguments {
        for binding in argument.bindings()? {
            if !seen.insert(binding.name.clone()) {
                return Err(Diagnostic::error(
                    DiagnosticKind::DuplicateDependency,
                    format!("Dependency '{}' is listed more than once.", binding.name),
                ));
            }
            bindings.push(binding);
        }
    }
    Ok(bindings)
}

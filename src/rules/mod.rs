//! Generator rules and their registry.
//!
//! Each rule is a stateless value resolved from the engine [`Context`](crate::context::Context)
//! and turns one invocation into fragments or a single diagnostic:
//!
//! - **Attached**: `Injectable`, `Configurable`, `Entity`, `ModelConvertible`,
//!   `UseCase`, `AppService`, `ServiceContainer`
//! - **Freestanding**: `MakeDataSource`, `MakeRepository`, `MakeUseCase`

mod app_service;
mod configurable;
mod entity;
mod injectable;
mod make_data_source;
mod make_repository;
mod make_use_case;
mod model_convertible;
mod service_container;
mod use_case;

pub use app_service::AppServiceRule;
pub use configurable::ConfigurableRule;
pub use entity::EntityRule;
pub use injectable::InjectableRule;
pub use make_data_source::MakeDataSourceRule;
pub use make_repository::MakeRepositoryRule;
pub use make_use_case::MakeUseCaseRule;
pub use model_convertible::ModelConvertibleRule;
pub use service_container::ServiceContainerRule;
pub use use_case::UseCaseRule;

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::diagnostics::{self, Diagnostic};
use crate::models::{DeclarationDescriptor, DeclarationKind, GeneratedFragment, Invocation};

/// How a rule is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleRole {
    /// `@Name<...>` on a declaration.
    Attached,
    /// `#Name<...>(...)` inside a declaration body.
    Freestanding,
}

impl fmt::Display for RuleRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleRole::Attached => f.write_str("attached"),
            RuleRole::Freestanding => f.write_str("freestanding"),
        }
    }
}

/// A generator rule.
pub trait Rule: Send + Sync {
    /// Invocation name, e.g. `Injectable`.
    fn name(&self) -> &'static str;
    fn role(&self) -> RuleRole;
    fn description(&self) -> &'static str;
    fn expand(&self, invocation: &Invocation) -> Result<Vec<GeneratedFragment>, Diagnostic>;
}

/// Registry of rules keyed by invocation name, in registration order.
pub struct Register {
    rules: IndexMap<&'static str, Box<dyn Rule>>,
}

impl Register {
    pub fn new() -> Self {
        Self {
            rules: IndexMap::new(),
        }
    }

    /// Adds a rule; a later rule with the same name replaces the earlier one.
    pub fn register(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.insert(rule.name(), Box::new(rule));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn Rule> {
        self.rules.get(name).map(|r| r.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Iterate over rules.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.values().map(|r| r.as_ref())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for Register {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Site and shape checks shared by the rules
// =============================================================================

/// Annotated declaration of an attached invocation, required to be record-like.
pub(crate) fn record<'a>(
    rule: &str,
    invocation: &'a Invocation,
) -> Result<&'a DeclarationDescriptor, Diagnostic> {
    match invocation.declaration() {
        Some(decl) if !invocation.is_freestanding() && decl.is_record_like() => Ok(decl),
        _ => Err(diagnostics::not_a_record(rule)),
    }
}

/// Annotated declaration, required to be a struct.
pub(crate) fn struct_declaration<'a>(
    rule: &str,
    invocation: &'a Invocation,
) -> Result<&'a DeclarationDescriptor, Diagnostic> {
    let decl = attached(rule, invocation)?;
    match decl.kind {
        DeclarationKind::Struct => Ok(decl),
        DeclarationKind::Class
        | DeclarationKind::Actor
        | DeclarationKind::Enum
        | DeclarationKind::Protocol
        | DeclarationKind::Extension => Err(diagnostics::not_a_struct(rule, decl)),
    }
}

/// Annotated declaration, required to be a class.
pub(crate) fn class_declaration<'a>(
    rule: &str,
    invocation: &'a Invocation,
) -> Result<&'a DeclarationDescriptor, Diagnostic> {
    let decl = attached(rule, invocation)?;
    match decl.kind {
        DeclarationKind::Class => Ok(decl),
        DeclarationKind::Struct
        | DeclarationKind::Actor
        | DeclarationKind::Enum
        | DeclarationKind::Protocol
        | DeclarationKind::Extension => Err(diagnostics::not_a_class(rule, decl)),
    }
}

/// Record-like container of a freestanding invocation.
pub(crate) fn container<'a>(
    rule: &str,
    invocation: &'a Invocation,
) -> Result<&'a DeclarationDescriptor, Diagnostic> {
    match invocation.declaration() {
        Some(decl) if invocation.is_freestanding() && decl.is_record_like() => Ok(decl),
        _ => Err(diagnostics::not_a_record(rule)),
    }
}

fn attached<'a>(
    rule: &str,
    invocation: &'a Invocation,
) -> Result<&'a DeclarationDescriptor, Diagnostic> {
    match invocation.declaration() {
        Some(decl) if !invocation.is_freestanding() => Ok(decl),
        _ => Err(diagnostics::not_a_record(rule)),
    }
}

//! Rule dispatch.
//!
//! The engine owns the rule registry and routes each invocation to exactly
//! one rule. Expansion is all-or-nothing: an [`Expansion`] carries either
//! fragments or a single diagnostic, never both.

use serde::Serialize;

use crate::context::Context;
use crate::diagnostics::Diagnostic;
use crate::error::AppError;
use crate::models::{GeneratedFragment, Invocation, Span};
use crate::rules::{
    AppServiceRule, ConfigurableRule, EntityRule, InjectableRule, MakeDataSourceRule,
    MakeRepositoryRule, MakeUseCaseRule, ModelConvertibleRule, Register, Rule,
    ServiceContainerRule, UseCaseRule,
};
use crate::syntax::{self, SourceFile};

/// Outcome of one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expansion {
    pub rule: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    pub fragments: Vec<GeneratedFragment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<Diagnostic>,
}

impl Expansion {
    fn generated(rule: &str, span: Option<Span>, fragments: Vec<GeneratedFragment>) -> Self {
        Self {
            rule: rule.to_string(),
            span,
            fragments,
            diagnostic: None,
        }
    }

    fn failed(rule: &str, span: Option<Span>, diagnostic: Diagnostic) -> Self {
        Self {
            rule: rule.to_string(),
            span,
            fragments: Vec::new(),
            diagnostic: Some(diagnostic),
        }
    }

    pub fn is_success(&self) -> bool {
        self.diagnostic.is_none()
    }
}

/// Registry of every generator rule, resolved from a [`Context`].
pub struct Engine {
    rules: Register,
}

impl Engine {
    pub fn new(ctx: &Context) -> Self {
        let rules = Register::new()
            .register(ctx.provide::<InjectableRule>())
            .register(ctx.provide::<ConfigurableRule>())
            .register(ctx.provide::<EntityRule>())
            .register(ctx.provide::<ModelConvertibleRule>())
            .register(ctx.provide::<UseCaseRule>())
            .register(ctx.provide::<MakeDataSourceRule>())
            .register(ctx.provide::<MakeRepositoryRule>())
            .register(ctx.provide::<MakeUseCaseRule>())
            .register(ctx.provide::<AppServiceRule>())
            .register(ctx.provide::<ServiceContainerRule>());
        tracing::debug!(rules = rules.len(), "Engine ready");
        Self { rules }
    }

    /// Registered rules, in registration order.
    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter()
    }

    pub fn is_rule(&self, name: &str) -> bool {
        self.rules.contains(name)
    }

    /// Expands one invocation. Only an unregistered rule name is an error;
    /// rule failures come back as a diagnostic inside the [`Expansion`].
    pub fn expand(&self, invocation: &Invocation) -> Result<Expansion, AppError> {
        let rule = self
            .rules
            .get(&invocation.name)
            .ok_or_else(|| AppError::UnknownRule(invocation.name.clone()))?;

        tracing::debug!(rule = rule.name(), role = %rule.role(), "Dispatching invocation");
        let span = invocation.span.clone();
        let expansion = match rule.expand(invocation) {
            Ok(fragments) => Expansion::generated(rule.name(), span, fragments),
            Err(diagnostic) => {
                let diagnostic = diagnostic.with_rule(rule.name()).at(span.clone());
                tracing::warn!(
                    rule = rule.name(),
                    id = %diagnostic.id(),
                    message = %diagnostic.message,
                    "Invocation failed"
                );
                Expansion::failed(rule.name(), span, diagnostic)
            }
        };
        Ok(expansion)
    }

    /// Invocations of registered rules found in a parsed file, in source order.
    pub fn invocations(&self, file: &SourceFile) -> Vec<Invocation> {
        file.invocations(|name| self.is_rule(name))
    }

    /// Parses source text and expands every invocation in it.
    pub fn expand_source(&self, source: &str) -> Result<Vec<Expansion>, AppError> {
        let file = syntax::parse_source(source)?;
        self.invocations(&file)
            .iter()
            .map(|invocation| self.expand(invocation))
            .collect()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(&Context::default())
    }
}

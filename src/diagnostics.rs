//! Diagnostics and mechanical fix-its.
//!
//! A failed invocation yields exactly one [`Diagnostic`] and no fragments.
//! Fix-its describe a textual edit; [`apply_fix_its`] performs the edits on
//! the source they were computed from.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::models::{DeclarationDescriptor, DeclarationKind, Span};

/// Domain that scopes every diagnostic id: `layergen.notAStruct`.
pub const DOMAIN: &str = "layergen";

/// Closed diagnostic taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    NotAStruct,
    NotAClass,
    NotARecord,
    InvalidArguments,
    NoInitTypes,
    NoConfigurationType,
    NoMultipleConfigurationTypes,
    MissingProperties,
    ExistingMember,
    InvalidNaming,
    NoExecuteMethod,
    MissingAnyKeyword,
    NoRepositoryProtocol,
    NoUseCaseFactoryType,
    DuplicateDependency,
}

impl DiagnosticKind {
    pub fn id(self) -> &'static str {
        match self {
            DiagnosticKind::NotAStruct => "notAStruct",
            DiagnosticKind::NotAClass => "notAClass",
            DiagnosticKind::NotARecord => "notARecord",
            DiagnosticKind::InvalidArguments => "invalidArguments",
            DiagnosticKind::NoInitTypes => "noInitTypes",
            DiagnosticKind::NoConfigurationType => "noConfigurationType",
            DiagnosticKind::NoMultipleConfigurationTypes => "noMultipleConfigurationTypes",
            DiagnosticKind::MissingProperties => "missingProperties",
            DiagnosticKind::ExistingMember => "existingMember",
            DiagnosticKind::InvalidNaming => "invalidNaming",
            DiagnosticKind::NoExecuteMethod => "noExecuteMethod",
            DiagnosticKind::MissingAnyKeyword => "missingAnyKeyword",
            DiagnosticKind::NoRepositoryProtocol => "noRepositoryProtocol",
            DiagnosticKind::NoUseCaseFactoryType => "noUseCaseFactoryType",
            DiagnosticKind::DuplicateDependency => "duplicateDependency",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
        }
    }
}

/// Part of the source a mechanical edit rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EditTarget {
    DeclarationKeyword,
    DeclarationName,
    Member,
}

/// Replace `original` with `replacement`, at `range` when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MechanicalEdit {
    pub target: EditTarget,
    pub original: String,
    pub replacement: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixIt {
    pub message: String,
    pub edit: MechanicalEdit,
}

impl FixIt {
    /// Swap the declaration keyword, e.g. `class` → `struct`.
    pub fn replace_keyword(decl: &DeclarationDescriptor, to: DeclarationKind) -> Self {
        Self {
            message: format!("Replace '{}' with '{}'", decl.kind, to),
            edit: MechanicalEdit {
                target: EditTarget::DeclarationKeyword,
                original: decl.kind.keyword().to_string(),
                replacement: to.keyword().to_string(),
                range: decl.spans.as_ref().map(|s| s.keyword.clone()),
            },
        }
    }

    /// Append a suffix to the declaration name.
    pub fn append_suffix(decl: &DeclarationDescriptor, suffix: &str) -> Self {
        Self {
            message: format!("Add '{suffix}' suffix to {} name", decl.kind),
            edit: MechanicalEdit {
                target: EditTarget::DeclarationName,
                original: decl.name.clone(),
                replacement: format!("{}{suffix}", decl.name),
                range: decl.spans.as_ref().map(|s| s.name.clone()),
            },
        }
    }

    /// Delete an existing member.
    pub fn remove_member(name: &str, span: Option<&Span>) -> Self {
        Self {
            message: "Remove existing member".to_string(),
            edit: MechanicalEdit {
                target: EditTarget::Member,
                original: name.to_string(),
                replacement: String::new(),
                range: span.cloned(),
            },
        }
    }
}

/// One reported failure of an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{message}")]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
    /// Rule that reported the diagnostic, filled in by the engine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix_it: Option<FixIt>,
    /// Where the diagnostic points, when parsed from source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn error(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            message: message.into(),
            rule: None,
            fix_it: None,
            span: None,
        }
    }

    pub fn with_fix_it(mut self, fix_it: FixIt) -> Self {
        self.fix_it = Some(fix_it);
        self
    }

    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    pub fn at(mut self, span: Option<Span>) -> Self {
        self.span = span;
        self
    }

    /// Domain-scoped id: `layergen.notAStruct`.
    pub fn id(&self) -> String {
        format!("{DOMAIN}.{}", self.kind.id())
    }

    /// Multi-line human readable rendering.
    pub fn render(&self) -> String {
        let mut out = format!("{}[{}]: {}", self.severity, self.id(), self.message);
        if let Some(fix_it) = &self.fix_it {
            out.push_str(&format!("\n  fix-it: {}", fix_it.message));
        }
        out
    }
}

// -- Shared constructors, one per message shape --

/// `'@Entity' can only be applied to structs.`, with a keyword fix-it for classes.
pub fn not_a_struct(rule: &str, decl: &DeclarationDescriptor) -> Diagnostic {
    let diagnostic = Diagnostic::error(
        DiagnosticKind::NotAStruct,
        format!("'@{rule}' can only be applied to structs."),
    );
    match decl.kind {
        DeclarationKind::Class => {
            diagnostic.with_fix_it(FixIt::replace_keyword(decl, DeclarationKind::Struct))
        }
        _ => diagnostic,
    }
}

/// `'@AppService' can only be applied to classes.`, with a keyword fix-it for structs.
pub fn not_a_class(rule: &str, decl: &DeclarationDescriptor) -> Diagnostic {
    let diagnostic = Diagnostic::error(
        DiagnosticKind::NotAClass,
        format!("'@{rule}' can only be applied to classes."),
    );
    match decl.kind {
        DeclarationKind::Struct => {
            diagnostic.with_fix_it(FixIt::replace_keyword(decl, DeclarationKind::Class))
        }
        _ => diagnostic,
    }
}

pub fn not_a_record(rule: &str) -> Diagnostic {
    Diagnostic::error(
        DiagnosticKind::NotARecord,
        format!("'{rule}' can only be used with a struct, class or actor."),
    )
}

pub fn existing_member(name: &str, span: Option<&Span>) -> Diagnostic {
    Diagnostic::error(
        DiagnosticKind::ExistingMember,
        format!("Member '{name}' already exists. Remove existing implementation before applying macro."),
    )
    .with_fix_it(FixIt::remove_member(name, span))
}

pub fn missing_properties() -> Diagnostic {
    Diagnostic::error(
        DiagnosticKind::MissingProperties,
        "No properties found to map in the struct.",
    )
}

pub fn invalid_arguments(detail: impl fmt::Display) -> Diagnostic {
    Diagnostic::error(DiagnosticKind::InvalidArguments, detail.to_string())
}

/// Errors raised while applying fix-its to source text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FixItError {
    #[error("fix-it '{0}' has no source range")]
    MissingRange(String),

    #[error("fix-it range {start}..{end} is outside the source")]
    OutOfBounds { start: usize, end: usize },

    #[error("expected '{expected}' at {start}, found '{found}'")]
    Stale {
        expected: String,
        found: String,
        start: usize,
    },

    #[error("fix-its overlap at byte {0}")]
    Overlap(usize),
}

/// Applies non-overlapping fix-its, back to front so earlier ranges stay valid.
/// Identical edits are applied once.
///
/// Keyword and name edits are checked against the text they expect to
/// replace; member removals take the recorded range as is.
pub fn apply_fix_its<'a>(
    source: &str,
    fix_its: impl IntoIterator<Item = &'a FixIt>,
) -> Result<String, FixItError> {
    let mut edits = Vec::new();
    for fix_it in fix_its {
        let edit = &fix_it.edit;
        let range = edit
            .range
            .clone()
            .ok_or_else(|| FixItError::MissingRange(fix_it.message.clone()))?;
        let found = source
            .get(range.clone())
            .ok_or(FixItError::OutOfBounds {
                start: range.start,
                end: range.end,
            })?;
        if edit.target != EditTarget::Member && found != edit.original {
            return Err(FixItError::Stale {
                expected: edit.original.clone(),
                found: found.to_string(),
                start: range.start,
            });
        }
        edits.push((range, edit.replacement.as_str()));
    }

    // Several invocations on one declaration can propose the same edit
    edits.sort_by(|(a, a_text), (b, b_text)| {
        b.start
            .cmp(&a.start)
            .then(a.end.cmp(&b.end))
            .then(a_text.cmp(b_text))
    });
    edits.dedup();

    let mut output = source.to_string();
    let mut limit = usize::MAX;
    for (range, replacement) in edits {
        if range.end > limit {
            return Err(FixItError::Overlap(range.end));
        }
        output.replace_range(range.clone(), replacement);
        limit = range.start;
    }
    Ok(output)
}

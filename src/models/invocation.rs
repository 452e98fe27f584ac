use serde::Serialize;

use super::declaration::{DeclarationDescriptor, Span};

/// Where an invocation was written.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "site", rename_all = "lowercase")]
pub enum InvocationSite {
    /// Attribute attached to a declaration.
    Attached { declaration: Box<DeclarationDescriptor> },
    /// Freestanding expansion, with the declaration whose body contains it.
    Freestanding {
        container: Option<Box<DeclarationDescriptor>>,
    },
}

/// One use of a generator rule: its name, argument clause and site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invocation {
    pub name: String,
    /// Raw argument clause, empty when none was written.
    pub clause: String,
    #[serde(flatten)]
    pub site: InvocationSite,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl Invocation {
    pub fn attached(
        name: impl Into<String>,
        clause: impl Into<String>,
        declaration: DeclarationDescriptor,
    ) -> Self {
        Self {
            name: name.into(),
            clause: clause.into(),
            site: InvocationSite::Attached {
                declaration: Box::new(declaration),
            },
            span: None,
        }
    }

    pub fn freestanding(
        name: impl Into<String>,
        clause: impl Into<String>,
        container: Option<DeclarationDescriptor>,
    ) -> Self {
        Self {
            name: name.into(),
            clause: clause.into(),
            site: InvocationSite::Freestanding {
                container: container.map(Box::new),
            },
            span: None,
        }
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// The annotated declaration, or the container of a freestanding expansion.
    pub fn declaration(&self) -> Option<&DeclarationDescriptor> {
        match &self.site {
            InvocationSite::Attached { declaration } => Some(declaration),
            InvocationSite::Freestanding { container } => container.as_deref(),
        }
    }

    pub fn is_freestanding(&self) -> bool {
        matches!(self.site, InvocationSite::Freestanding { .. })
    }
}

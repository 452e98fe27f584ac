use std::fmt;

use serde::Serialize;

/// Where a generated fragment is spliced relative to the invocation site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Inside the annotated declaration.
    Member,
    /// Next to the annotated declaration.
    Peer,
    /// In place of a freestanding expansion.
    Freestanding,
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placement::Member => f.write_str("member"),
            Placement::Peer => f.write_str("peer"),
            Placement::Freestanding => f.write_str("freestanding"),
        }
    }
}

/// Generated source text with its placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFragment {
    pub placement: Placement,
    pub text: String,
}

impl GeneratedFragment {
    pub fn member(text: impl Into<String>) -> Self {
        Self {
            placement: Placement::Member,
            text: text.into(),
        }
    }

    pub fn peer(text: impl Into<String>) -> Self {
        Self {
            placement: Placement::Peer,
            text: text.into(),
        }
    }

    pub fn freestanding(text: impl Into<String>) -> Self {
        Self {
            placement: Placement::Freestanding,
            text: text.into(),
        }
    }
}

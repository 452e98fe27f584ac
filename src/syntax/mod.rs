//! Declaration source front-end.
//!
//! A pest grammar over annotated Swift-style declarations. The walker turns
//! parse trees into [`DeclarationDescriptor`](crate::models::DeclarationDescriptor)s
//! and collects the invocations written in them. Argument clauses and
//! standalone types go through the same grammar.
//!
//! # Example
//!
//! ```
//! use layergen::syntax::parse_source;
//!
//! let file = parse_source("@Entity\nstruct User {\n    let id: UUID\n}").unwrap();
//! assert_eq!(file.declarations[0].name, "User");
//! assert_eq!(file.declarations[0].attributes[0].name, "Entity");
//! ```

mod clause;
mod source;

use pest_derive::Parser;
use thiserror::Error;

pub use clause::{parse_clause, ParsedClause, Qualifier, TypeElement, ValueArgument};
pub use source::{parse_source, SourceFile};

#[derive(Parser)]
#[grammar = "syntax/swift.pest"]
pub(crate) struct SwiftParser;

/// Errors raised while parsing source text or clauses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("Invalid syntax: {0}")]
    InvalidSyntax(String),

    #[error("Malformed {what} at byte {offset}")]
    Malformed { what: &'static str, offset: usize },
}

impl From<pest::error::Error<Rule>> for SyntaxError {
    fn from(err: pest::error::Error<Rule>) -> Self {
        SyntaxError::InvalidSyntax(err.to_string())
    }
}

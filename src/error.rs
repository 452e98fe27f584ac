//! Host-level error types.
//!
//! Per-invocation failures are reported as [`Diagnostic`](crate::diagnostics::Diagnostic)
//! values, never as `AppError`.

use std::path::PathBuf;

use thiserror::Error;

use crate::diagnostics::FixItError;
use crate::syntax::SyntaxError;

/// Application-level errors for layergen.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("Unknown rule: {0}")]
    UnknownRule(String),

    #[error("Cannot apply fix-its: {0}")]
    FixIt(#[from] FixItError),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl AppError {
    /// Wraps an I/O error with the path that caused it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

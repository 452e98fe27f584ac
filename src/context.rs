//! Engine context providing the dependency injection root.

use std::sync::Arc;

use crate::config::Config;
use crate::di::Provider;
use crate::naming::Conventions;

/// Root context for dependency injection.
///
/// Every field is exposed through `FromRef` by `#[derive(Provider)]`, so
/// rules declared with `#[derive(Wired)]` can be resolved from it.
#[derive(Provider, Clone, Debug, Default)]
pub struct Context {
    /// Naming conventions shared by every rule.
    pub conventions: Arc<Conventions>,
}

impl Context {
    /// Creates a context around the given conventions.
    pub fn new(conventions: Conventions) -> Self {
        Self {
            conventions: Arc::new(conventions),
        }
    }

    /// Creates a context from a loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.conventions.clone())
    }
}

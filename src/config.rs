//! Configuration with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. User config: `~/.config/layergen/config.toml` (XDG) or platform config dir
//! 2. Project config: `.layergen.toml`
//! 3. Environment variables: `LAYERGEN_*` (nested keys split on `__`)
//!
//! Every key has a default, so a missing file is not an error.
//!
//! # Example
//!
//! **Project config** (`.layergen.toml`):
//! ```toml
//! [conventions]
//! transport_suffix = "DTO"
//! default_prefix = "Live"
//!
//! [output]
//! format = "json"
//! ```
//!
//! The same keys can be set from the environment, e.g.
//! `LAYERGEN_CONVENTIONS__DEFAULT_PREFIX=Live`.

use std::ops::Deref;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::naming::Conventions;

/// Project config file name, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = ".layergen.toml";

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Literal names used when deriving generated identifiers.
    pub conventions: Conventions,
    /// How the CLI renders expansion results.
    pub output: OutputConfig,
}

/// Output settings for the CLI host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// Rendering format for expansion results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human readable fragments and diagnostics.
    #[default]
    Text,
    /// One JSON document per file.
    Json,
}

impl Config {
    /// Load config with layered resolution (defaults → user → project → env).
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment(Self::user_config_path(), PROJECT_CONFIG_FILE)
            .extract()
            .map_err(ConfigError::from)
    }

    /// Builds the layered figment from explicit file locations.
    pub fn figment(user_config: impl AsRef<Path>, project_config: impl AsRef<Path>) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            // Layer 1: User config (lowest priority)
            .merge(Toml::file(user_config.as_ref()))
            // Layer 2: Project config
            .merge(Toml::file(project_config.as_ref()))
            // Layer 3: Environment variables (highest priority)
            .merge(Env::prefixed("LAYERGEN_").split("__"))
    }

    /// User config path: ~/.config/layergen/config.toml (XDG) or platform config dir.
    fn user_config_path() -> PathBuf {
        // Prefer XDG config location (~/.config) on all platforms
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home.join(".config").join("layergen").join("config.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }
        // Fall back to platform-specific config dir
        dirs::config_dir()
            .map(|p| p.join("layergen").join("config.toml"))
            .unwrap_or_default()
    }
}

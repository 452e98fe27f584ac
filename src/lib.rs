//! layergen - convention-driven code generation for layered dependency injection
//!
//! Expands generator rules written on Swift-style declarations into the
//! DataSource → Repository → UseCase → Service → Container wiring.

pub mod arguments;
pub mod cli;
pub mod codegen;
pub mod config;
pub mod context;
pub mod di;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod extract;
pub mod models;
pub mod naming;
pub mod rules;
pub mod syntax;

// Re-export FromRef at crate root for wire-macros generated code
pub use di::FromRef;

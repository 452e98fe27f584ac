//! Dependency injection infrastructure.
//!
//! Compile-time wiring through the `FromRef` trait and the derive macros from
//! `wire-macros`.
//!
//! # Overview
//!
//! - `FromRef<T>`: extract a value from a reference to `T`
//! - `#[derive(Provider)]`: makes each field of a context extractable via `FromRef`
//! - `#[derive(Wired)]`: generates a `FromRef` impl by resolving each field
//!
//! # Example
//!
//! ```ignore
//! use crate::di::{FromRef, Provider, Wired};
//!
//! #[derive(Provider, Clone)]
//! pub struct Context {
//!     pub conventions: Arc<Conventions>,
//! }
//!
//! #[derive(Wired, Clone)]
//! pub struct EntityRule {
//!     conventions: Arc<Conventions>, // resolved via FromRef<Context>
//! }
//!
//! let rule: EntityRule = ctx.provide();
//! ```

/// Trait for extracting a value from a reference to another type.
///
/// Types that implement `FromRef<T>` can be assembled from `&T`.
pub trait FromRef<T> {
    fn from_ref(input: &T) -> Self;
}

/// Blanket implementation: any Clone type can be extracted from itself.
impl<T: Clone> FromRef<T> for T {
    fn from_ref(input: &T) -> Self {
        input.clone()
    }
}

pub use wire_macros::{Provider, Wired};

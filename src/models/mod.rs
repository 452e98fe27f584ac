//! Declaration model consumed and produced by the generation engine.
//!
//! Descriptors are plain owned values: built programmatically through the
//! builder methods or parsed from source by [`crate::syntax`].

mod binding;
mod declaration;
mod fragment;
mod invocation;
mod member;

pub use binding::ArgumentBinding;
pub use declaration::{
    Attribute, DeclarationDescriptor, DeclarationKind, DeclarationSpans, Modifier, Span,
};
pub use fragment::{GeneratedFragment, Placement};
pub use invocation::{Invocation, InvocationSite};
pub use member::{
    BindingSpecifier, ExpansionSite, FunctionDescriptor, InitializerDescriptor, Member, Parameter,
    PropertyDescriptor,
};

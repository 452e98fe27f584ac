//! Members of a type declaration.

use indexmap::IndexSet;
use serde::Serialize;

use super::declaration::{Attribute, DeclarationDescriptor, Modifier, Span};
use crate::extract;
use crate::naming;

/// One member of a declaration, in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "member", rename_all = "lowercase")]
pub enum Member {
    Property(PropertyDescriptor),
    Function(FunctionDescriptor),
    Initializer(InitializerDescriptor),
    /// A freestanding expansion written inside the declaration body.
    Expansion(ExpansionSite),
    /// A nested type declaration.
    Type(Box<DeclarationDescriptor>),
}

impl Member {
    /// Member name; initializers are named `init`.
    pub fn name(&self) -> Option<&str> {
        match self {
            Member::Property(p) => Some(&p.name),
            Member::Function(f) => Some(&f.name),
            Member::Initializer(_) => Some("init"),
            Member::Expansion(_) => None,
            Member::Type(decl) => Some(&decl.name),
        }
    }

    pub fn span(&self) -> Option<&Span> {
        match self {
            Member::Property(p) => p.span.as_ref(),
            Member::Function(f) => f.span.as_ref(),
            Member::Initializer(i) => i.span.as_ref(),
            Member::Expansion(e) => e.span.as_ref(),
            Member::Type(decl) => decl.spans.as_ref().map(|s| &s.whole),
        }
    }

    pub fn as_property(&self) -> Option<&PropertyDescriptor> {
        match self {
            Member::Property(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionDescriptor> {
        match self {
            Member::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_initializer(&self) -> Option<&InitializerDescriptor> {
        match self {
            Member::Initializer(i) => Some(i),
            _ => None,
        }
    }
}

impl From<PropertyDescriptor> for Member {
    fn from(p: PropertyDescriptor) -> Self {
        Member::Property(p)
    }
}

impl From<FunctionDescriptor> for Member {
    fn from(f: FunctionDescriptor) -> Self {
        Member::Function(f)
    }
}

impl From<InitializerDescriptor> for Member {
    fn from(i: InitializerDescriptor) -> Self {
        Member::Initializer(i)
    }
}

impl From<ExpansionSite> for Member {
    fn from(e: ExpansionSite) -> Self {
        Member::Expansion(e)
    }
}

impl From<DeclarationDescriptor> for Member {
    fn from(decl: DeclarationDescriptor) -> Self {
        Member::Type(Box::new(decl))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingSpecifier {
    Let,
    Var,
}

/// A stored or computed property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub is_optional: bool,
    pub is_array: bool,
    pub is_static: bool,
    pub has_accessor: bool,
    /// The accessor block only holds `willSet`/`didSet` observers.
    pub is_observer: bool,
    pub binding: BindingSpecifier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<String>,
    pub modifiers: IndexSet<Modifier>,
    pub attributes: Vec<Attribute>,
    /// Participates in generated equality (`@EquatableKey`).
    pub identity_key: bool,
    /// Domain key overriding the property name (`@Convertible(key:)`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explicit_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl PropertyDescriptor {
    pub fn new(binding: BindingSpecifier, name: impl Into<String>, ty: impl Into<String>) -> Self {
        let ty = ty.into();
        Self {
            name: name.into(),
            is_optional: naming::is_optional_type(&ty),
            is_array: naming::is_array_type(&ty),
            ty,
            is_static: false,
            has_accessor: false,
            is_observer: false,
            binding,
            initial_value: None,
            modifiers: IndexSet::new(),
            attributes: Vec::new(),
            identity_key: false,
            explicit_key: None,
            span: None,
        }
    }

    /// `let name: ty`
    pub fn constant(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self::new(BindingSpecifier::Let, name, ty)
    }

    /// `var name: ty`
    pub fn variable(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self::new(BindingSpecifier::Var, name, ty)
    }

    pub fn with_initial_value(mut self, value: impl Into<String>) -> Self {
        self.initial_value = Some(value.into());
        self
    }

    pub fn with_accessor(mut self) -> Self {
        self.has_accessor = true;
        self
    }

    /// Stored property with `willSet`/`didSet` observers.
    pub fn with_observers(mut self) -> Self {
        self.has_accessor = true;
        self.is_observer = true;
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.is_static |= modifier.is_type_level();
        self.modifiers.insert(modifier);
        self
    }

    /// Adds an attribute, picking up marker metadata it carries.
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        extract::apply_markers(&mut self);
        self
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Stored instance property: not static, and either no accessor block
    /// or only property observers.
    pub fn is_stored_instance(&self) -> bool {
        !self.is_static && (!self.has_accessor || self.is_observer)
    }

    /// Name used on the domain side of a conversion.
    pub fn domain_key(&self) -> &str {
        self.explicit_key.as_deref().unwrap_or(&self.name)
    }
}

/// A function parameter: `label name: Type = default`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    /// External label when it differs from the name (`_` suppresses it).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub is_inout: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            label: None,
            name: name.into(),
            ty: ty.into(),
            is_inout: false,
            default_value: None,
        }
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn inout(mut self) -> Self {
        self.is_inout = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Declaration text without the default value: `for user: inout User`.
    pub fn declaration(&self) -> String {
        let ty = if self.is_inout {
            format!("inout {}", self.ty)
        } else {
            self.ty.clone()
        };
        match &self.label {
            Some(label) => format!("{label} {}: {ty}", self.name),
            None => format!("{}: {ty}", self.name),
        }
    }

    /// Argument text forwarding this parameter: `for: user`, `user`, `&user`.
    pub fn forwarding_argument(&self) -> String {
        let value = if self.is_inout {
            format!("&{}", self.name)
        } else {
            self.name.clone()
        };
        match self.label.as_deref() {
            Some("_") => value,
            Some(label) => format!("{label}: {value}"),
            None => format!("{}: {value}", self.name),
        }
    }
}

/// A function signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionDescriptor {
    pub name: String,
    /// Generic parameter clause as written, e.g. `<T: Decodable>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generic_params: Option<String>,
    pub params: Vec<Parameter>,
    pub is_async: bool,
    pub is_throwing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<String>,
    pub modifiers: IndexSet<Modifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl FunctionDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generic_params: None,
            params: Vec::new(),
            is_async: false,
            is_throwing: false,
            return_type: None,
            where_clause: None,
            modifiers: IndexSet::new(),
            span: None,
        }
    }

    pub fn with_param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    pub fn returning(mut self, ty: impl Into<String>) -> Self {
        self.return_type = Some(ty.into());
        self
    }

    pub fn async_(mut self) -> Self {
        self.is_async = true;
        self
    }

    pub fn throwing(mut self) -> Self {
        self.is_throwing = true;
        self
    }

    pub fn with_generics(mut self, clause: impl Into<String>) -> Self {
        self.generic_params = Some(clause.into());
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.iter().any(Modifier::is_type_level)
    }

    /// Private and fileprivate functions stay out of generated interfaces.
    pub fn is_private(&self) -> bool {
        self.modifiers.contains(&Modifier::Private) || self.modifiers.contains(&Modifier::Fileprivate)
    }
}

/// An initializer signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitializerDescriptor {
    pub params: Vec<Parameter>,
    pub is_failable: bool,
    pub is_convenience: bool,
    pub modifiers: IndexSet<Modifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl InitializerDescriptor {
    pub fn new() -> Self {
        Self {
            params: Vec::new(),
            is_failable: false,
            is_convenience: false,
            modifiers: IndexSet::new(),
            span: None,
        }
    }

    pub fn with_param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    pub fn failable(mut self) -> Self {
        self.is_failable = true;
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.is_convenience |= modifier == Modifier::Convenience;
        self.modifiers.insert(modifier);
        self
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Parameter names in order, e.g. `["entity"]` for `init(entity:)`.
    pub fn param_names(&self) -> Vec<&str> {
        self.params
            .iter()
            .map(|p| p.label.as_deref().unwrap_or(&p.name))
            .collect()
    }
}

impl Default for InitializerDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

/// A freestanding expansion (`#MakeRepository<AuthRepository>()`) inside a body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpansionSite {
    pub name: String,
    pub clause: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl ExpansionSite {
    pub fn new(name: impl Into<String>, clause: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            clause: clause.into(),
            span: None,
        }
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_flags_follow_type() {
        let p = PropertyDescriptor::constant("tags", "[String]?");
        assert!(p.is_optional);
        assert!(p.is_array);
        assert!(p.is_stored_instance());

        let p = PropertyDescriptor::variable("shared", "Config").with_modifier(Modifier::Static);
        assert!(p.is_static);
        assert!(!p.is_stored_instance());
    }

    #[test]
    fn test_parameter_rendering() {
        let plain = Parameter::new("user", "User");
        assert_eq!(plain.declaration(), "user: User");
        assert_eq!(plain.forwarding_argument(), "user: user");

        let labeled = Parameter::new("user", "User").labeled("for");
        assert_eq!(labeled.declaration(), "for user: User");
        assert_eq!(labeled.forwarding_argument(), "for: user");

        let unlabeled = Parameter::new("value", "Int").labeled("_").inout();
        assert_eq!(unlabeled.declaration(), "_ value: inout Int");
        assert_eq!(unlabeled.forwarding_argument(), "&value");
    }

    #[test]
    fn test_initializer_flags() {
        let init = InitializerDescriptor::new()
            .with_modifier(Modifier::Convenience)
            .with_param(Parameter::new("entity", "User"));
        assert!(init.is_convenience);
        assert!(!init.is_failable);
        assert_eq!(init.param_names(), vec!["entity"]);
    }

    #[test]
    fn test_member_names() {
        let member: Member = FunctionDescriptor::new("execute").into();
        assert_eq!(member.name(), Some("execute"));
        let member: Member = InitializerDescriptor::new().into();
        assert_eq!(member.name(), Some("init"));
        let member: Member = ExpansionSite::new("MakeRepository", "<A>()").into();
        assert_eq!(member.name(), None);
    }
}

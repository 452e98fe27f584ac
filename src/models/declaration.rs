//! Type declarations, their modifiers and attributes.

use std::fmt;
use std::ops::Range;

use indexmap::IndexSet;
use serde::{Serialize, Serializer};

use super::member::{FunctionDescriptor, InitializerDescriptor, Member, PropertyDescriptor};

/// Byte range into the source text a descriptor was parsed from.
pub type Span = Range<usize>;

/// Closed set of declaration kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Struct,
    Class,
    Actor,
    Enum,
    Protocol,
    Extension,
}

impl DeclarationKind {
    /// Source keyword introducing this kind.
    pub fn keyword(self) -> &'static str {
        match self {
            DeclarationKind::Struct => "struct",
            DeclarationKind::Class => "class",
            DeclarationKind::Actor => "actor",
            DeclarationKind::Enum => "enum",
            DeclarationKind::Protocol => "protocol",
            DeclarationKind::Extension => "extension",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "struct" => Some(DeclarationKind::Struct),
            "class" => Some(DeclarationKind::Class),
            "actor" => Some(DeclarationKind::Actor),
            "enum" => Some(DeclarationKind::Enum),
            "protocol" => Some(DeclarationKind::Protocol),
            "extension" => Some(DeclarationKind::Extension),
            _ => None,
        }
    }

    /// Struct, class and actor declarations carry stored properties.
    pub fn is_record_like(self) -> bool {
        match self {
            DeclarationKind::Struct | DeclarationKind::Class | DeclarationKind::Actor => true,
            DeclarationKind::Enum | DeclarationKind::Protocol | DeclarationKind::Extension => {
                false
            }
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Declaration modifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Modifier {
    Public,
    Internal,
    Private,
    Fileprivate,
    Open,
    Package,
    Final,
    Static,
    Class,
    Convenience,
    Required,
    Override,
    Mutating,
    Nonmutating,
    Lazy,
    Weak,
    Unowned,
    Nonisolated,
    Indirect,
    Dynamic,
    /// Anything else, kept verbatim (e.g. `private(set)`).
    Other(String),
}

impl Modifier {
    pub fn parse(text: &str) -> Self {
        match text.trim() {
            "public" => Modifier::Public,
            "internal" => Modifier::Internal,
            "private" => Modifier::Private,
            "fileprivate" => Modifier::Fileprivate,
            "open" => Modifier::Open,
            "package" => Modifier::Package,
            "final" => Modifier::Final,
            "static" => Modifier::Static,
            "class" => Modifier::Class,
            "convenience" => Modifier::Convenience,
            "required" => Modifier::Required,
            "override" => Modifier::Override,
            "mutating" => Modifier::Mutating,
            "nonmutating" => Modifier::Nonmutating,
            "lazy" => Modifier::Lazy,
            "weak" => Modifier::Weak,
            "unowned" => Modifier::Unowned,
            "nonisolated" => Modifier::Nonisolated,
            "indirect" => Modifier::Indirect,
            "dynamic" => Modifier::Dynamic,
            other => Modifier::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Modifier::Public => "public",
            Modifier::Internal => "internal",
            Modifier::Private => "private",
            Modifier::Fileprivate => "fileprivate",
            Modifier::Open => "open",
            Modifier::Package => "package",
            Modifier::Final => "final",
            Modifier::Static => "static",
            Modifier::Class => "class",
            Modifier::Convenience => "convenience",
            Modifier::Required => "required",
            Modifier::Override => "override",
            Modifier::Mutating => "mutating",
            Modifier::Nonmutating => "nonmutating",
            Modifier::Lazy => "lazy",
            Modifier::Weak => "weak",
            Modifier::Unowned => "unowned",
            Modifier::Nonisolated => "nonisolated",
            Modifier::Indirect => "indirect",
            Modifier::Dynamic => "dynamic",
            Modifier::Other(text) => text,
        }
    }

    /// `static` and `class` both make a member type-level.
    pub fn is_type_level(&self) -> bool {
        matches!(self, Modifier::Static | Modifier::Class)
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Modifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Attribute attached to a declaration or member, e.g. `@Injectable<A & B>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    /// Raw argument clause (`<A & B>`, `(key: "id")`), empty when absent.
    pub clause: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl Attribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            clause: String::new(),
            span: None,
        }
    }

    pub fn with_clause(mut self, clause: impl Into<String>) -> Self {
        self.clause = clause.into();
        self
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

/// Source locations of the parts of a declaration that fix-its rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclarationSpans {
    pub whole: Span,
    pub keyword: Span,
    pub name: Span,
}

/// Normalized view of one type declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeclarationDescriptor {
    pub kind: DeclarationKind,
    pub name: String,
    pub modifiers: IndexSet<Modifier>,
    pub inherited_names: IndexSet<String>,
    pub attributes: Vec<Attribute>,
    pub members: Vec<Member>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spans: Option<DeclarationSpans>,
}

impl DeclarationDescriptor {
    pub fn new(kind: DeclarationKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            modifiers: IndexSet::new(),
            inherited_names: IndexSet::new(),
            attributes: Vec::new(),
            members: Vec::new(),
            spans: None,
        }
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    pub fn inheriting(mut self, name: impl Into<String>) -> Self {
        self.inherited_names.insert(name.into());
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_member(mut self, member: impl Into<Member>) -> Self {
        self.members.push(member.into());
        self
    }

    pub fn with_spans(mut self, spans: DeclarationSpans) -> Self {
        self.spans = Some(spans);
        self
    }

    pub fn is_record_like(&self) -> bool {
        self.kind.is_record_like()
    }

    pub fn inherits(&self, name: &str) -> bool {
        self.inherited_names.contains(name)
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Access level prefix for generated members, including the trailing space.
    ///
    /// Generated members are as visible as their type: `open` types get
    /// `public` members, internal types get no prefix.
    pub fn access_prefix(&self) -> &'static str {
        for modifier in &self.modifiers {
            match modifier {
                Modifier::Public | Modifier::Open => return "public ",
                Modifier::Package => return "package ",
                Modifier::Fileprivate => return "fileprivate ",
                Modifier::Private => return "private ",
                _ => {}
            }
        }
        ""
    }

    pub fn properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.members.iter().filter_map(Member::as_property)
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionDescriptor> {
        self.members.iter().filter_map(Member::as_function)
    }

    pub fn initializers(&self) -> impl Iterator<Item = &InitializerDescriptor> {
        self.members.iter().filter_map(Member::as_initializer)
    }

    /// Nested type declarations, in source order.
    pub fn nested_types(&self) -> impl Iterator<Item = &DeclarationDescriptor> {
        self.members.iter().filter_map(|m| match m {
            Member::Type(decl) => Some(decl.as_ref()),
            _ => None,
        })
    }

    /// Finds a member by name (properties, functions, nested types).
    pub fn member_named(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name() == Some(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_like_kinds() {
        assert!(DeclarationKind::Struct.is_record_like());
        assert!(DeclarationKind::Class.is_record_like());
        assert!(DeclarationKind::Actor.is_record_like());
        assert!(!DeclarationKind::Enum.is_record_like());
        assert!(!DeclarationKind::Protocol.is_record_like());
        assert!(!DeclarationKind::Extension.is_record_like());
    }

    #[test]
    fn test_keyword_round_trip() {
        for kind in [
            DeclarationKind::Struct,
            DeclarationKind::Class,
            DeclarationKind::Actor,
            DeclarationKind::Enum,
            DeclarationKind::Protocol,
            DeclarationKind::Extension,
        ] {
            assert_eq!(DeclarationKind::from_keyword(kind.keyword()), Some(kind));
        }
        assert_eq!(DeclarationKind::from_keyword("func"), None);
    }

    #[test]
    fn test_access_prefix() {
        let decl = DeclarationDescriptor::new(DeclarationKind::Struct, "User");
        assert_eq!(decl.access_prefix(), "");

        let decl = decl.with_modifier(Modifier::Final).with_modifier(Modifier::Open);
        assert_eq!(decl.access_prefix(), "public ");

        let decl = DeclarationDescriptor::new(DeclarationKind::Struct, "User")
            .with_modifier(Modifier::Fileprivate);
        assert_eq!(decl.access_prefix(), "fileprivate ");
    }

    #[test]
    fn test_modifier_parse() {
        assert_eq!(Modifier::parse("static"), Modifier::Static);
        assert_eq!(
            Modifier::parse("private(set)"),
            Modifier::Other("private(set)".to_string())
        );
        assert!(Modifier::Class.is_type_level());
        assert_eq!(Modifier::Other("x".into()).to_string(), "x");
    }

    #[test]
    fn test_inherited_names_keep_order() {
        let decl = DeclarationDescriptor::new(DeclarationKind::Struct, "User")
            .inheriting("Equatable")
            .inheriting("Codable")
            .inheriting("Equatable");
        let names: Vec<_> = decl.inherited_names.iter().map(String::as_str).collect();
        assert_eq!(names, vec!["Equatable", "Codable"]);
        assert!(decl.inherits("Codable"));
    }
}

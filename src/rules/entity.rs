//! `@Entity`: memberwise initializer with defaults and key-based equality.

use crate::codegen::{self, Node, Signature};
use crate::di::Wired;
use crate::diagnostics::{self, Diagnostic};
use crate::extract;
use crate::models::{BindingSpecifier, GeneratedFragment, Invocation, PropertyDescriptor};
use crate::naming;

use super::{Rule, RuleRole};

const EQUATABLE: &str = "Equatable";

#[derive(Wired, Clone, Debug, Default)]
pub struct EntityRule;

impl EntityRule {
    /// `email: String = ""`; a `var` keeps its own initial value as default.
    fn parameter(property: &PropertyDescriptor) -> String {
        let default = match (&property.binding, &property.initial_value) {
            (BindingSpecifier::Var, Some(value)) => Some(value.as_str()),
            _ => naming::default_value_literal(&property.ty),
        };
        match default {
            Some(value) => format!("{}: {} = {value}", property.name, property.ty),
            None => format!("{}: {}", property.name, property.ty),
        }
    }

    fn initializer(access: &str, properties: &[&PropertyDescriptor]) -> Node {
        Node::block(
            Signature::new(format!("{access}init"))
                .params(properties.iter().map(|p| Self::parameter(p)))
                .render(),
            codegen::assignments(properties.iter().map(|p| p.name.as_str())),
        )
    }

    fn equality(access: &str, keys: &[&PropertyDescriptor]) -> Node {
        let last = keys.len().saturating_sub(1);
        let comparisons = keys
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let comparison = format!("lhs.{0} == rhs.{0}", p.name);
                if i == last {
                    Node::line(comparison)
                } else {
                    Node::line(format!("{comparison} &&"))
                }
            })
            .collect();
        Node::block(
            format!("{access}static func == (lhs: Self, rhs: Self) -> Bool"),
            comparisons,
        )
    }
}

impl Rule for EntityRule {
    fn name(&self) -> &'static str {
        "Entity"
    }

    fn role(&self) -> RuleRole {
        RuleRole::Attached
    }

    fn description(&self) -> &'static str {
        "Adds a defaulted memberwise initializer and == over @EquatableKey properties"
    }

    fn expand(&self, invocation: &Invocation) -> Result<Vec<GeneratedFragment>, Diagnostic> {
        let decl = super::struct_declaration(self.name(), invocation)?;
        let properties = extract::initializable_properties(decl);
        if properties.is_empty() {
            return Err(diagnostics::missing_properties());
        }

        let access = decl.access_prefix();
        let mut fragments = Vec::new();

        if !extract::has_usable_initializer(decl) {
            let init = Self::initializer(access, &properties);
            fragments.push(GeneratedFragment::member(codegen::render(&[init])));
        }

        let keys: Vec<_> = properties.iter().copied().filter(|p| p.identity_key).collect();
        if decl.inherits(EQUATABLE) && !keys.is_empty() {
            if let Some(existing) = extract::find_function(decl, "==") {
                return Err(diagnostics::existing_member("==", existing.span.as_ref()));
            }
            let equality = Self::equality(access, &keys);
            fragments.push(GeneratedFragment::member(codegen::render(&[equality])));
        }

        tracing::trace!(entity = %decl.name, fragments = fragments.len(), "Entity expanded");
        Ok(fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use crate::rules::testing;
    use pretty_assertions::assert_eq;

    fn rule() -> EntityRule {
        testing::context().provide()
    }

    #[test]
    fn test_defaults_per_type() {
        let texts = testing::texts(
            &rule(),
            r#"
            @Entity
            public struct Profile {
                let id: UUID
                let name: String
                let nickname: String?
                let tags: [String]
                let age: Int
                let active: Bool
                let created: Date
                let avatar: Avatar
            }
            "#,
        );
        assert_eq!(
            texts,
            vec![
                "public init(id: UUID = UUID(), name: String = \"\", nickname: String? = nil, tags: [String] = [], age: Int = 0, active: Bool = false, created: Date = .now, avatar: Avatar) {\n    self.id = id\n    self.name = name\n    self.nickname = nickname\n    self.tags = tags\n    self.age = age\n    self.active = active\n    self.created = created\n    self.avatar = avatar\n}".to_string(),
            ]
        );
    }

    #[test]
    fn test_skips_static_computed_and_assigned_constants() {
        let texts = testing::texts(
            &rule(),
            r#"
            @Entity
            struct Counter {
                static let shared = Counter()
                let kind = "counter"
                var count: Int = 5
                var label: String { String(count) }
            }
            "#,
        );
        assert_eq!(
            texts,
            vec!["init(count: Int = 5) {\n    self.count = count\n}".to_string()]
        );
    }

    #[test]
    fn test_observed_properties_are_assigned() {
        let texts = testing::texts(
            &rule(),
            r#"
            @Entity
            struct Slider {
                var value: Int = 0 {
                    didSet { print(value) }
                }
                var step: Int {
                    willSet { print(newValue) }
                }
            }
            "#,
        );
        assert_eq!(
            texts,
            vec!["init(value: Int = 0, step: Int = 0) {\n    self.value = value\n    self.step = step\n}".to_string()]
        );
    }

    #[test]
    fn test_equality_over_keys() {
        let texts = testing::texts(
            &rule(),
            r#"
            @Entity
            struct User: Equatable {
                @EquatableKey let id: UUID
                @EquatableKey let email: String
                let name: String
            }
            "#,
        );
        assert_eq!(texts.len(), 2);
        assert_eq!(
            texts[1],
            "static func == (lhs: Self, rhs: Self) -> Bool {\n    lhs.id == rhs.id &&\n    lhs.email == rhs.email\n}"
        );
    }

    #[test]
    fn test_equality_needs_conformance() {
        let texts = testing::texts(
            &rule(),
            "@Entity\nstruct User {\n    @EquatableKey let id: UUID\n}",
        );
        assert_eq!(texts.len(), 1);
    }

    #[test]
    fn test_existing_initializer_is_kept() {
        let texts = testing::texts(
            &rule(),
            r#"
            @Entity
            struct User {
                let id: UUID
                init(id: UUID) {
                    self.id = id
                }
            }
            "#,
        );
        assert!(texts.is_empty());
    }

    #[test]
    fn test_class_gets_keyword_fix() {
        let err = testing::expand(&rule(), "@Entity\nclass User {\n    let id: UUID\n}").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::NotAStruct);
        assert_eq!(err.message, "'@Entity' can only be applied to structs.");
        assert_eq!(err.fix_it.unwrap().message, "Replace 'class' with 'struct'");
    }

    #[test]
    fn test_no_properties() {
        let err = testing::expand(&rule(), "@Entity\nstruct Empty {}").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::MissingProperties);
    }
}

//! `@ModelConvertible`: two-way conversion between a transport model and its
//! domain model.
//!
//! `UserData` converts to and from `User`. Properties whose type is itself a
//! transport model (`ProfileData`, `[ProfileData]`) convert through their own
//! generated members; `@Convertible(key:)` renames the domain-side key.

use std::sync::Arc;

use crate::codegen::{self, Node, Signature};
use crate::di::Wired;
use crate::diagnostics::{self, Diagnostic, DiagnosticKind, FixIt};
use crate::extract;
use crate::models::{GeneratedFragment, Invocation, PropertyDescriptor};
use crate::naming::{self, Conventions};

use super::{Rule, RuleRole};

const DOMAIN_PROPERTY: &str = "asDomainEntity";
const ENTITY_PARAMETER: &str = "entity";

/// How one property crosses the transport/domain boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mapping<'a> {
    Direct,
    /// `ProfileData`
    Nested(&'a str),
    /// `[ProfileData]`
    Collection(&'a str),
}

#[derive(Wired, Clone, Debug)]
pub struct ModelConvertibleRule {
    conventions: Arc<Conventions>,
}

impl ModelConvertibleRule {
    fn mapping<'a>(&self, property: &'a PropertyDescriptor) -> Mapping<'a> {
        if !self.conventions.is_transport_type(&property.ty) {
            return Mapping::Direct;
        }
        match naming::array_element_type(&property.ty) {
            Some(element) => Mapping::Collection(element),
            None => Mapping::Nested(property.ty.trim().trim_end_matches('?')),
        }
    }

    /// `key: value` passed to the domain initializer.
    fn to_domain(&self, property: &PropertyDescriptor) -> String {
        let access = if property.is_optional { "?." } else { "." };
        let value = match self.mapping(property) {
            Mapping::Direct => property.name.clone(),
            Mapping::Nested(_) => format!("{}{access}{DOMAIN_PROPERTY}", property.name),
            Mapping::Collection(_) => {
                format!("{}{access}map(\\.{DOMAIN_PROPERTY})", property.name)
            }
        };
        format!("{}: {value}", property.domain_key())
    }

    /// `name: value` passed to the transport initializer.
    fn from_domain(&self, property: &PropertyDescriptor) -> String {
        let source = format!("{ENTITY_PARAMETER}.{}", property.domain_key());
        let value = match self.mapping(property) {
            Mapping::Direct => source,
            Mapping::Nested(ty) if property.is_optional => {
                format!("{source}.map {{ {ty}({ENTITY_PARAMETER}: $0) }}")
            }
            Mapping::Nested(ty) => format!("{ty}({ENTITY_PARAMETER}: {source})"),
            Mapping::Collection(element) => {
                let access = if property.is_optional { "?." } else { "." };
                format!("{source}{access}map {{ {element}({ENTITY_PARAMETER}: $0) }}")
            }
        };
        format!("{}: {value}", property.name)
    }
}

impl Rule for ModelConvertibleRule {
    fn name(&self) -> &'static str {
        "ModelConvertible"
    }

    fn role(&self) -> RuleRole {
        RuleRole::Attached
    }

    fn description(&self) -> &'static str {
        "Converts a transport model to its domain model and back"
    }

    fn expand(&self, invocation: &Invocation) -> Result<Vec<GeneratedFragment>, Diagnostic> {
        let decl = super::struct_declaration(self.name(), invocation)?;
        let suffix = &self.conventions.transport_suffix;
        let domain = self.conventions.domain_model_name(&decl.name).ok_or_else(|| {
            Diagnostic::error(
                DiagnosticKind::InvalidNaming,
                format!("Struct must end with '{suffix}' suffix to use '@ModelConvertible'."),
            )
            .with_fix_it(FixIt::append_suffix(decl, suffix))
        })?;

        if let Some(existing) = extract::find_property(decl, DOMAIN_PROPERTY) {
            return Err(diagnostics::existing_member(DOMAIN_PROPERTY, existing.span.as_ref()));
        }
        if let Some(existing) = decl
            .initializers()
            .find(|init| init.param_names() == [ENTITY_PARAMETER])
        {
            return Err(diagnostics::existing_member("init(entity:)", existing.span.as_ref()));
        }

        let properties = extract::initializable_properties(decl);
        if properties.is_empty() {
            return Err(diagnostics::missing_properties());
        }

        let access = decl.access_prefix();
        let mut fragments = Vec::new();

        let to_domain: Vec<String> = properties.iter().map(|p| self.to_domain(p)).collect();
        let domain_property = Node::block(
            format!("{access}var {DOMAIN_PROPERTY}: {domain}"),
            codegen::call_vertical(".init", &to_domain),
        );
        fragments.push(GeneratedFragment::member(codegen::render(&[domain_property])));

        if !extract::has_usable_initializer(decl) {
            let params = properties.iter().map(|p| {
                if p.is_optional {
                    format!("{}: {} = nil", p.name, p.ty)
                } else {
                    format!("{}: {}", p.name, p.ty)
                }
            });
            let init = Node::block(
                Signature::new(format!("{access}init")).params(params).render(),
                codegen::assignments(properties.iter().map(|p| p.name.as_str())),
            );
            fragments.push(GeneratedFragment::member(codegen::render(&[init])));
        }

        let from_domain: Vec<String> = properties.iter().map(|p| self.from_domain(p)).collect();
        let entity_init = Node::block(
            Signature::new(format!("{access}init"))
                .param(format!("{ENTITY_PARAMETER}: {domain}"))
                .render(),
            codegen::call_vertical("self.init", &from_domain),
        );
        fragments.push(GeneratedFragment::member(codegen::render(&[entity_init])));

        tracing::trace!(model = %decl.name, domain, "Model conversion generated");
        Ok(fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing;
    use pretty_assertions::assert_eq;

    fn rule() -> ModelConvertibleRule {
        testing::context().provide()
    }

    #[test]
    fn test_conversion_with_explicit_key() {
        let texts = testing::texts(
            &rule(),
            r#"
            @ModelConvertible
            struct UserData {
                @Convertible(key: "username")
                let email: String
                let firstName: String?
                let lastName: String?
            }
            "#,
        );
        assert_eq!(
            texts,
            vec![
                "var asDomainEntity: User {\n    .init(\n        username: email,\n        firstName: firstName,\n        lastName: lastName\n    )\n}".to_string(),
                "init(email: String, firstName: String? = nil, lastName: String? = nil) {\n    self.email = email\n    self.firstName = firstName\n    self.lastName = lastName\n}".to_string(),
                "init(entity: User) {\n    self.init(\n        email: entity.username,\n        firstName: entity.firstName,\n        lastName: entity.lastName\n    )\n}".to_string(),
            ]
        );
    }

    #[test]
    fn test_nested_transport_models() {
        let texts = testing::texts(
            &rule(),
            r#"
            @ModelConvertible
            public struct AccountData {
                let owner: ProfileData
                let backup: ProfileData?
                let members: [ProfileData]
                init(owner: ProfileData, backup: ProfileData?, members: [ProfileData]) {
                    self.owner = owner
                    self.backup = backup
                    self.members = members
                }
            }
            "#,
        );
        assert_eq!(texts.len(), 2);
        assert_eq!(
            texts[0],
            "public var asDomainEntity: Account {\n    .init(\n        owner: owner.asDomainEntity,\n        backup: backup?.asDomainEntity,\n        members: members.map(\\.asDomainEntity)\n    )\n}"
        );
        assert_eq!(
            texts[1],
            "public init(entity: Account) {\n    self.init(\n        owner: ProfileData(entity: entity.owner),\n        backup: entity.backup.map { ProfileData(entity: $0) },\n        members: entity.members.map { ProfileData(entity: $0) }\n    )\n}"
        );
    }

    #[test]
    fn test_naming_violation_offers_suffix() {
        let err = testing::expand(
            &rule(),
            "@ModelConvertible\nstruct LoginCredentials {\n    let email: String\n}",
        )
        .unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::InvalidNaming);
        assert_eq!(
            err.message,
            "Struct must end with 'Data' suffix to use '@ModelConvertible'."
        );
        let fix_it = err.fix_it.unwrap();
        assert_eq!(fix_it.message, "Add 'Data' suffix to struct name");
        assert_eq!(fix_it.edit.replacement, "LoginCredentialsData");
    }

    #[test]
    fn test_existing_conversion() {
        let err = testing::expand(
            &rule(),
            r#"
            @ModelConvertible
            struct UserData {
                let email: String
                var asDomainEntity: User { User(email: email) }
            }
            "#,
        )
        .unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::ExistingMember);
    }

    #[test]
    fn test_no_properties() {
        let err = testing::expand(&rule(), "@ModelConvertible\nstruct UserData {}").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::MissingProperties);
    }

    #[test]
    fn test_class_is_rejected() {
        let err = testing::expand(&rule(), "@ModelConvertible\nclass UserData {}").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::NotAStruct);
    }
}

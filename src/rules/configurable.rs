//! `@Configurable<Config>`: a stored configuration and its initializer.

use crate::arguments::ArgumentClause;
use crate::codegen::{self, Node, Signature};
use crate::di::Wired;
use crate::diagnostics::{self, Diagnostic, DiagnosticKind};
use crate::extract;
use crate::models::{ArgumentBinding, GeneratedFragment, Invocation};

use super::{Rule, RuleRole};

const PROPERTY: &str = "configuration";

#[derive(Wired, Clone, Debug, Default)]
pub struct ConfigurableRule;

impl Rule for ConfigurableRule {
    fn name(&self) -> &'static str {
        "Configurable"
    }

    fn role(&self) -> RuleRole {
        RuleRole::Attached
    }

    fn description(&self) -> &'static str {
        "Stores one configuration value and adds init(configuration:)"
    }

    fn expand(&self, invocation: &Invocation) -> Result<Vec<GeneratedFragment>, Diagnostic> {
        let decl = super::record(self.name(), invocation)?;
        let clause = ArgumentClause::parse(&invocation.clause)?;

        let argument = match clause.type_arguments.as_slice() {
            [] => {
                return Err(Diagnostic::error(
                    DiagnosticKind::NoConfigurationType,
                    "Expected a type to be used for configuration.",
                ))
            }
            [single] if !single.is_composition() => single,
            _ => {
                return Err(Diagnostic::error(
                    DiagnosticKind::NoMultipleConfigurationTypes,
                    "Expected only one type to be used for configuration.",
                ))
            }
        };

        if let Some(existing) = extract::find_property(decl, PROPERTY) {
            return Err(diagnostics::existing_member(PROPERTY, existing.span.as_ref()));
        }
        if let Some(init) = decl
            .initializers()
            .find(|init| init.param_names() == [PROPERTY])
        {
            return Err(diagnostics::existing_member("init", init.span.as_ref()));
        }

        let binding = ArgumentBinding::new(PROPERTY, argument.text());
        let init = Node::block(
            Signature::new("public init").param(binding.parameter()).render(),
            codegen::assignments([PROPERTY]),
        );

        Ok(vec![
            GeneratedFragment::member(format!("let {}", binding.parameter())),
            GeneratedFragment::member(codegen::render(&[init])),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing;
    use pretty_assertions::assert_eq;

    fn rule() -> ConfigurableRule {
        testing::context().provide()
    }

    #[test]
    fn test_named_configuration() {
        let texts = testing::texts(
            &rule(),
            "@Configurable<RemoteDataSourceConfig>\nfinal class DefaultAuthDataSource: AuthDataSource {}",
        );
        assert_eq!(
            texts,
            vec![
                "let configuration: RemoteDataSourceConfig".to_string(),
                "public init(configuration: RemoteDataSourceConfig) {\n    self.configuration = configuration\n}".to_string(),
            ]
        );
    }

    #[test]
    fn test_existential_configuration() {
        let texts = testing::texts(
            &rule(),
            "@Configurable<any DataSourceConfig>\nfinal class DefaultAuthDataSource {}",
        );
        assert_eq!(texts[0], "let configuration: any DataSourceConfig");
    }

    #[test]
    fn test_missing_and_multiple_types() {
        let err = testing::expand(&rule(), "@Configurable\nstruct Source {}").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::NoConfigurationType);

        let err = testing::expand(&rule(), "@Configurable<A & B>\nstruct Source {}").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::NoMultipleConfigurationTypes);

        let err = testing::expand(&rule(), "@Configurable<A, B>\nstruct Source {}").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::NoMultipleConfigurationTypes);
    }

    #[test]
    fn test_existing_configuration_property() {
        let err = testing::expand(
            &rule(),
            "@Configurable<Config>\nstruct Source {\n    let configuration: Config\n}",
        )
        .unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::ExistingMember);
    }
}

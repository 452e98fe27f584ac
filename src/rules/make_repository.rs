//! `#MakeRepository<AuthRepository>()`: factory method resolving the
//! repository's data source through the data source factory.

use std::sync::Arc;

use crate::arguments::{ArgumentClause, TypeArgument};
use crate::codegen::{self, Node, Signature};
use crate::di::Wired;
use crate::diagnostics::{self, Diagnostic, DiagnosticKind};
use crate::extract;
use crate::models::{ArgumentBinding, GeneratedFragment, Invocation};
use crate::naming::{self, Conventions};

use super::{Rule, RuleRole};

#[derive(Wired, Clone, Debug)]
pub struct MakeRepositoryRule {
    conventions: Arc<Conventions>,
}

impl Rule for MakeRepositoryRule {
    fn name(&self) -> &'static str {
        "MakeRepository"
    }

    fn role(&self) -> RuleRole {
        RuleRole::Freestanding
    }

    fn description(&self) -> &'static str {
        "Factory method building a repository on top of its data source"
    }

    fn expand(&self, invocation: &Invocation) -> Result<Vec<GeneratedFragment>, Diagnostic> {
        let container = super::container(self.name(), invocation)?;
        let clause = ArgumentClause::parse(&invocation.clause)?;

        let repository = match clause.type_arguments.as_slice() {
            [] => {
                return Err(Diagnostic::error(
                    DiagnosticKind::NoRepositoryProtocol,
                    "Expected a repository protocol type in the macro.",
                ))
            }
            [TypeArgument::Existential(repository) | TypeArgument::Named(repository)] => repository,
            _ => {
                return Err(diagnostics::invalid_arguments(
                    "Expected a single repository protocol type in the macro.",
                ))
            }
        };

        let method = self.conventions.factory_method(&repository.text);
        if let Some(existing) = extract::find_function(container, &method) {
            return Err(diagnostics::existing_member(&method, existing.span.as_ref()));
        }

        let implementation = match clause.value_types().first() {
            Some(custom) => custom.to_string(),
            None => self.conventions.default_implementation(&repository.text),
        };
        let data_source = self.conventions.data_source_for_repository(&repository.text);
        let binding = ArgumentBinding::new(naming::as_variable_name(&data_source), data_source.as_str());

        let function = Node::block(
            Signature::new(format!("public func {method}"))
                .tail(format!(" -> {}", repository.text))
                .render(),
            vec![
                Node::line(format!(
                    "let {} = {}.{}()",
                    binding.name,
                    self.conventions.data_source_factory,
                    self.conventions.factory_method(&data_source)
                )),
                Node::line(format!(
                    "return {}",
                    codegen::call(&implementation, &[binding.argument()])
                )),
            ],
        );

        tracing::trace!(container = %container.name, %method, %implementation, "Repository factory generated");
        Ok(vec![GeneratedFragment::freestanding(codegen::render(&[function]))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing;
    use pretty_assertions::assert_eq;

    fn rule() -> MakeRepositoryRule {
        testing::context().provide()
    }

    #[test]
    fn test_default_implementation() {
        let texts = testing::texts(
            &rule(),
            "struct RepositoryFactory {\n    #MakeRepository<AuthRepository>()\n}",
        );
        assert_eq!(
            texts,
            vec!["public func makeAuthRepository() -> AuthRepository {\n    let authDataSource = dataSourceFactory.makeAuthDataSource()\n    return DefaultAuthRepository(authDataSource: authDataSource)\n}".to_string()]
        );
    }

    #[test]
    fn test_implementation_override() {
        let texts = testing::texts(
            &rule(),
            "struct RepositoryFactory {\n    #MakeRepository<ProfileRepository>(CachedProfileRepository.self)\n}",
        );
        assert!(texts[0].ends_with("    return CachedProfileRepository(profileDataSource: profileDataSource)\n}"));
    }

    #[test]
    fn test_configured_conventions() {
        let rule = MakeRepositoryRule {
            conventions: Arc::new(Conventions {
                default_prefix: "Live".to_string(),
                data_source_factory: "sources".to_string(),
                ..Conventions::default()
            }),
        };
        let texts = testing::texts(&rule, "struct F {\n    #MakeRepository<AuthRepository>()\n}");
        assert!(texts[0].contains("let authDataSource = sources.makeAuthDataSource()"));
        assert!(texts[0].contains("return LiveAuthRepository(authDataSource: authDataSource)"));
    }

    #[test]
    fn test_missing_repository() {
        let err = testing::expand(&rule(), "struct F {\n    #MakeRepository()\n}").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::NoRepositoryProtocol);
        assert_eq!(err.message, "Expected a repository protocol type in the macro.");
    }

    #[test]
    fn test_composition_is_invalid() {
        let err = testing::expand(
            &rule(),
            "struct F {\n    #MakeRepository<AuthRepository & ProfileRepository>()\n}",
        )
        .unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::InvalidArguments);
        assert_eq!(err.message, "Expected a single repository protocol type in the macro.");
    }

    #[test]
    fn test_extra_type_arguments_are_invalid() {
        let err = testing::expand(
            &rule(),
            "struct F {\n    #MakeRepository<AuthRepository, ProfileRepository>()\n}",
        )
        .unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::InvalidArguments);
    }

    #[test]
    fn test_inside_enum_is_rejected() {
        let err = testing::expand(
            &rule(),
            "enum Factories {\n    #MakeRepository<AuthRepository>()\n}",
        )
        .unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::NotARecord);
    }
}

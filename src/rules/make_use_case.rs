//! `#MakeUseCase<AuthRepository & ProfileRepository, LoginUseCase>()`:
//! factory method resolving repositories, then extra dependencies, then
//! constructing the use case.
//!
//! The target may also be given as a value argument, leaving every generic
//! argument after the repositories as an extra dependency:
//! `#MakeUseCase<AuthRepository, Clock>(LoginUseCase.self)`.

use std::sync::Arc;

use crate::arguments::{self, ArgumentClause, TypeArgument};
use crate::codegen::{self, Node, Signature};
use crate::di::Wired;
use crate::diagnostics::{self, Diagnostic, DiagnosticKind};
use crate::extract;
use crate::models::{ArgumentBinding, GeneratedFragment, Invocation};
use crate::naming::Conventions;

use super::{Rule, RuleRole};

#[derive(Wired, Clone, Debug)]
pub struct MakeUseCaseRule {
    conventions: Arc<Conventions>,
}

fn invalid_arguments() -> Diagnostic {
    diagnostics::invalid_arguments("Expected a repository protocol and a use case type in the macro.")
}

/// Use case type and the generic arguments naming extra dependencies.
fn target_and_extras(clause: &ArgumentClause) -> Result<(String, &[TypeArgument]), Diagnostic> {
    if let Some(target) = clause.value_types().first() {
        let extras = clause.type_arguments.get(1..).unwrap_or_default();
        return Ok((target.to_string(), extras));
    }
    match clause.type_arguments.get(1) {
        Some(TypeArgument::Named(target)) => Ok((target.text.clone(), &clause.type_arguments[2..])),
        _ => Err(invalid_arguments()),
    }
}

impl Rule for MakeUseCaseRule {
    fn name(&self) -> &'static str {
        "MakeUseCase"
    }

    fn role(&self) -> RuleRole {
        RuleRole::Freestanding
    }

    fn description(&self) -> &'static str {
        "Factory method building a use case from its repositories and extra dependencies"
    }

    fn expand(&self, invocation: &Invocation) -> Result<Vec<GeneratedFragment>, Diagnostic> {
        let container = super::container(self.name(), invocation)?;
        let clause = ArgumentClause::parse(&invocation.clause)?;

        let repositories = clause.type_arguments.first().ok_or_else(|| {
            Diagnostic::error(
                DiagnosticKind::NoRepositoryProtocol,
                "Expected a repository protocol type in the macro.",
            )
        })?;
        let (target, extras) = target_and_extras(&clause)?;

        // Duplicate names across repositories and extras are rejected together
        let bindings = arguments::collect_bindings(std::iter::once(repositories).chain(extras))?;
        let (repository_bindings, extra_bindings) = bindings.split_at(repositories.elements().len());

        let method = self.conventions.factory_method(&target);
        if let Some(existing) = extract::find_function(container, &method) {
            return Err(diagnostics::existing_member(&method, existing.span.as_ref()));
        }

        let mut body: Vec<Node> = repository_bindings
            .iter()
            .map(|b| {
                Node::line(format!(
                    "let {} = {}.{}()",
                    b.name,
                    self.conventions.repository_factory,
                    self.conventions.factory_method(&b.ty)
                ))
            })
            .collect();
        body.extend(extra_bindings.iter().map(|b| {
            Node::line(format!("let {} = {}()", b.name, self.conventions.factory_method(&b.ty)))
        }));
        let args: Vec<String> = bindings.iter().map(ArgumentBinding::argument).collect();
        body.push(Node::line(format!("return {}", codegen::call(&target, &args))));

        let function = Node::block(
            Signature::new(format!("public func {method}"))
                .tail(format!(" -> {target}"))
                .render(),
            body,
        );

        tracing::trace!(
            container = %container.name,
            %method,
            repositories = repository_bindings.len(),
            extras = extra_bindings.len(),
            "Use case factory generated"
        );
        Ok(vec![GeneratedFragment::freestanding(codegen::render(&[function]))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing;
    use pretty_assertions::assert_eq;

    fn rule() -> MakeUseCaseRule {
        testing::context().provide()
    }

    #[test]
    fn test_composed_repositories() {
        let texts = testing::texts(
            &rule(),
            "struct UseCaseFactory {\n    #MakeUseCase<AuthRepository & ProfileRepository, LoginUseCase>()\n}",
        );
        assert_eq!(
            texts,
            vec!["public func makeLoginUseCase() -> LoginUseCase {\n    let authRepository = repositoryFactory.makeAuthRepository()\n    let profileRepository = repositoryFactory.makeProfileRepository()\n    return LoginUseCase(authRepository: authRepository, profileRepository: profileRepository)\n}".to_string()]
        );
    }

    #[test]
    fn test_extras_after_repositories() {
        let texts = testing::texts(
            &rule(),
            "struct UseCaseFactory {\n    #MakeUseCase<AuthRepository, LoginUseCase, Clock>()\n}",
        );
        assert_eq!(
            texts[0],
            "public func makeLoginUseCase() -> LoginUseCase {\n    let authRepository = repositoryFactory.makeAuthRepository()\n    let clock = makeClock()\n    return LoginUseCase(authRepository: authRepository, clock: clock)\n}"
        );
    }

    #[test]
    fn test_target_as_value_argument() {
        let texts = testing::texts(
            &rule(),
            "struct UseCaseFactory {\n    #MakeUseCase<AuthRepository, Clock>(LoginUseCase.self)\n}",
        );
        assert!(texts[0].starts_with("public func makeLoginUseCase() -> LoginUseCase {"));
        assert!(texts[0].contains("    let clock = makeClock()\n"));
    }

    #[test]
    fn test_missing_repository() {
        let err = testing::expand(&rule(), "struct F {\n    #MakeUseCase()\n}").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::NoRepositoryProtocol);
    }

    #[test]
    fn test_missing_or_existential_target() {
        for source in [
            "struct F {\n    #MakeUseCase<AuthRepository>()\n}",
            "struct F {\n    #MakeUseCase<AuthRepository, any LoginUseCase>()\n}",
        ] {
            let err = testing::expand(&rule(), source).unwrap_err();
            assert_eq!(err.kind, DiagnosticKind::InvalidArguments, "{source}");
        }
    }

    #[test]
    fn test_duplicate_dependency() {
        let err = testing::expand(
            &rule(),
            "struct F {\n    #MakeUseCase<AuthRepository, LoginUseCase, AuthRepository>()\n}",
        )
        .unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::DuplicateDependency);
    }
}

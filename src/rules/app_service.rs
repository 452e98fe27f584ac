//! `@AppService<UseCaseFactory>`: initializer pulling every use case field
//! from an injected use case factory.

use std::sync::Arc;

use crate::arguments::ArgumentClause;
use crate::codegen::{self, Node, Signature};
use crate::di::Wired;
use crate::diagnostics::{self, Diagnostic, DiagnosticKind};
use crate::extract;
use crate::models::{GeneratedFragment, Invocation};
use crate::naming::Conventions;

use super::{Rule, RuleRole};

#[derive(Wired, Clone, Debug)]
pub struct AppServiceRule {
    conventions: Arc<Conventions>,
}

impl Rule for AppServiceRule {
    fn name(&self) -> &'static str {
        "AppService"
    }

    fn role(&self) -> RuleRole {
        RuleRole::Attached
    }

    fn description(&self) -> &'static str {
        "Initializer assigning each use case field from the injected use case factory"
    }

    fn expand(&self, invocation: &Invocation) -> Result<Vec<GeneratedFragment>, Diagnostic> {
        let decl = super::class_declaration(self.name(), invocation)?;
        let clause = ArgumentClause::parse(&invocation.clause)?;
        let factory = match clause.type_arguments.as_slice() {
            [argument] => argument.single(),
            _ => None,
        }
        .ok_or_else(|| {
            Diagnostic::error(
                DiagnosticKind::NoUseCaseFactoryType,
                "Expected a use case factory type in the macro.",
            )
        })?;

        let parameter = &self.conventions.use_case_factory;
        if let Some(existing) = decl
            .initializers()
            .find(|init| init.param_names() == [parameter.as_str()])
        {
            return Err(diagnostics::existing_member("init", existing.span.as_ref()));
        }

        // Fields outside the heuristic keep whatever value they already have
        let assignments = extract::initializable_properties(decl)
            .into_iter()
            .filter(|p| self.conventions.is_use_case_type(&p.ty))
            .map(|p| {
                let ty = p.ty.trim().trim_end_matches('?');
                Node::line(format!(
                    "self.{} = {parameter}.{}()",
                    p.name,
                    self.conventions.factory_method(ty)
                ))
            })
            .collect::<Vec<_>>();

        tracing::trace!(service = %decl.name, use_cases = assignments.len(), "Service initializer generated");
        let init = Node::block(
            Signature::new("init")
                .param(format!("{parameter}: {}", factory.text))
                .render(),
            assignments,
        );
        Ok(vec![GeneratedFragment::member(codegen::render(&[init]))])
    }
}

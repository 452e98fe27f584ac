//! `#MakeDataSource<any AuthDataSource, RemoteDataSourceConfig>()`: factory
//! method building the default data source from a stored configuration.

use std::sync::Arc;

use crate::arguments::{ArgumentClause, TypeArgument};
use crate::codegen::{self, Node, Signature};
use crate::di::Wired;
use crate::diagnostics::{self, Diagnostic, DiagnosticKind};
use crate::extract;
use crate::models::{GeneratedFragment, Invocation};
use crate::naming::{self, Conventions};
use crate::syntax::Qualifier;

use super::{Rule, RuleRole};

#[derive(Wired, Clone, Debug)]
pub struct MakeDataSourceRule {
    conventions: Arc<Conventions>,
}

fn invalid_arguments() -> Diagnostic {
    diagnostics::invalid_arguments(
        "Expected a datasource protocol and configuration types in the macro.",
    )
}

impl Rule for MakeDataSourceRule {
    fn name(&self) -> &'static str {
        "MakeDataSource"
    }

    fn role(&self) -> RuleRole {
        RuleRole::Freestanding
    }

    fn description(&self) -> &'static str {
        "Factory method returning the default data source built from a configuration"
    }

    fn expand(&self, invocation: &Invocation) -> Result<Vec<GeneratedFragment>, Diagnostic> {
        let container = super::container(self.name(), invocation)?;
        let clause = ArgumentClause::parse(&invocation.clause)?;

        let (source, config) = match clause.type_arguments.as_slice() {
            [TypeArgument::Composition(_), _] | [_, TypeArgument::Composition(_)] => {
                return Err(invalid_arguments())
            }
            [source, config] => (source, config),
            _ => return Err(invalid_arguments()),
        };
        let source = source.single().ok_or_else(invalid_arguments)?;
        let config = config.single().ok_or_else(invalid_arguments)?;

        if source.qualifier != Some(Qualifier::Any) {
            return Err(Diagnostic::error(
                DiagnosticKind::MissingAnyKeyword,
                format!(
                    "Data source type '{0}' must be written as 'any {0}'.",
                    naming::strip_existential(&source.text)
                ),
            ));
        }
        let config_name = config.base_name.as_deref().ok_or_else(invalid_arguments)?;

        let method = self.conventions.factory_method(&source.text);
        if let Some(existing) = extract::find_function(container, &method) {
            return Err(diagnostics::existing_member(&method, existing.span.as_ref()));
        }

        let implementation = self.conventions.default_implementation(&source.text);
        let configuration = format!("configuration: {}", naming::as_variable_name(config_name));
        let function = Node::block(
            Signature::new(format!("func {method}"))
                .tail(format!(" -> {}", source.text))
                .render(),
            vec![Node::line(codegen::call(&implementation, &[configuration]))],
        );

        tracing::trace!(container = %container.name, %method, "Data source factory generated");
        Ok(vec![GeneratedFragment::freestanding(codegen::render(&[function]))])
    }
}

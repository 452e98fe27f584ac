//! `@Injectable<A & B>`: stored dependencies and a memberwise initializer.

use crate::arguments::ArgumentClause;
use crate::codegen::{self, Node, Signature};
use crate::di::Wired;
use crate::diagnostics::{self, Diagnostic, DiagnosticKind};
use crate::extract;
use crate::models::{ArgumentBinding, GeneratedFragment, Invocation};

use super::{Rule, RuleRole};

#[derive(Wired, Clone, Debug, Default)]
pub struct InjectableRule;

impl Rule for InjectableRule {
    fn name(&self) -> &'static str {
        "Injectable"
    }

    fn role(&self) -> RuleRole {
        RuleRole::Attached
    }

    fn description(&self) -> &'static str {
        "Stores each listed dependency and adds an initializer taking them before existing constants"
    }

    fn expand(&self, invocation: &Invocation) -> Result<Vec<GeneratedFragment>, Diagnostic> {
        let decl = super::record(self.name(), invocation)?;
        let clause = ArgumentClause::parse(&invocation.clause)?;
        if clause.type_arguments.is_empty() {
            return Err(Diagnostic::error(
                DiagnosticKind::NoInitTypes,
                "Expected at least one protocol to be injectable.",
            ));
        }

        let bindings = clause.bindings()?;
        for binding in &bindings {
            if let Some(existing) = extract::find_property(decl, &binding.name) {
                return Err(diagnostics::existing_member(&binding.name, existing.span.as_ref()));
            }
        }

        let mut parameters: Vec<ArgumentBinding> = bindings.clone();
        parameters.extend(
            extract::immutable_dependencies(decl)
                .into_iter()
                .map(|p| ArgumentBinding::new(p.name.clone(), p.ty.clone())),
        );

        let names: Vec<&str> = parameters.iter().map(|b| b.name.as_str()).collect();
        if let Some(init) = decl.initializers().find(|init| init.param_names() == names) {
            return Err(diagnostics::existing_member("init", init.span.as_ref()));
        }

        let init = Node::block(
            Signature::new("public init")
                .params(parameters.iter().map(ArgumentBinding::parameter))
                .vertical()
                .render(),
            codegen::assignments(names.iter().copied()),
        );

        let mut fragments: Vec<GeneratedFragment> = bindings
            .iter()
            .map(|b| GeneratedFragment::member(format!("private let {}", b.parameter())))
            .collect();
        fragments.push(GeneratedFragment::member(codegen::render(&[init])));
        Ok(fragments)
    }
}

//! `@UseCase`: protocol, delegating implementation and factory for a use case
//! struct.
//!
//! For `struct EmailLogin` three peers are generated:
//!
//! - `public protocol EmailLoginUseCase` listing the visible functions
//! - `class EmailLoginDefaultUseCase` owning an `EmailLogin` and forwarding to it
//! - `public struct EmailLoginFactory` with `makeUseCase(...)`

use std::sync::Arc;

use crate::codegen::{self, Node, Signature};
use crate::di::Wired;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::extract;
use crate::models::{FunctionDescriptor, GeneratedFragment, Invocation, Parameter};
use crate::naming::Conventions;

use super::{Rule, RuleRole};

const WRAPPED: &str = "useCase";

#[derive(Wired, Clone, Debug)]
pub struct UseCaseRule {
    conventions: Arc<Conventions>,
}

/// `func execute<T>(email: String) async throws -> User where T: Codable`
fn requirement(function: &FunctionDescriptor) -> String {
    let mut tail = codegen::effects_tail(
        function.is_async,
        function.is_throwing,
        function.return_type.as_deref(),
    );
    if let Some(clause) = &function.where_clause {
        tail.push(' ');
        tail.push_str(clause);
    }
    Signature::new(format!(
        "func {}{}",
        function.name,
        function.generic_params.as_deref().unwrap_or_default()
    ))
    .params(function.params.iter().map(Parameter::declaration))
    .tail(tail)
    .render()
}

/// `try await useCase.execute(email: email)`
fn forwarding_call(function: &FunctionDescriptor) -> String {
    let mut call = String::new();
    if function.is_throwing {
        call.push_str("try ");
    }
    if function.is_async {
        call.push_str("await ");
    }
    let args: Vec<String> = function
        .params
        .iter()
        .map(Parameter::forwarding_argument)
        .collect();
    call.push_str(&codegen::call(&format!("{WRAPPED}.{}", function.name), &args));
    call
}

impl Rule for UseCaseRule {
    fn name(&self) -> &'static str {
        "UseCase"
    }

    fn role(&self) -> RuleRole {
        RuleRole::Attached
    }

    fn description(&self) -> &'static str {
        "Generates the use case protocol, its default implementation and a factory"
    }

    fn expand(&self, invocation: &Invocation) -> Result<Vec<GeneratedFragment>, Diagnostic> {
        let decl = super::struct_declaration(self.name(), invocation)?;
        let functions = extract::public_functions(decl);
        if functions.is_empty() {
            return Err(Diagnostic::error(
                DiagnosticKind::NoExecuteMethod,
                format!("'@{}' must contain at least one function.", self.name()),
            ));
        }

        let protocol = self.conventions.use_case_protocol(&decl.name);
        let implementation = self.conventions.use_case_implementation(&decl.name);
        let factory = self.conventions.use_case_factory_name(&decl.name);

        let dependencies = extract::initializable_properties(decl);
        let params: Vec<String> = dependencies
            .iter()
            .map(|p| format!("{}: {}", p.name, p.ty))
            .collect();
        let args: Vec<String> = dependencies
            .iter()
            .map(|p| format!("{0}: {0}", p.name))
            .collect();

        let protocol_node = Node::block(
            format!("public protocol {protocol}"),
            functions.iter().map(|f| Node::line(requirement(f))).collect(),
        );

        let mut body: Vec<Node> = dependencies
            .iter()
            .map(|p| Node::line(format!("let {}: {}", p.name, p.ty)))
            .collect();
        body.push(Node::line(format!("let {WRAPPED}: {}", decl.name)));
        body.push(Node::Blank);

        let mut assignments = codegen::assignments(dependencies.iter().map(|p| p.name.as_str()));
        assignments.push(Node::line(format!(
            "self.{WRAPPED} = {}",
            codegen::call(&decl.name, &args)
        )));
        body.push(Node::block(
            Signature::new("init").params(params.iter().cloned()).render(),
            assignments,
        ));

        for function in &functions {
            body.push(Node::Blank);
            body.push(Node::block(
                requirement(function),
                vec![Node::line(forwarding_call(function))],
            ));
        }
        let implementation_node =
            Node::block(format!("class {implementation}: {protocol}"), body);

        let factory_node = Node::block(
            format!("public struct {factory}"),
            vec![Node::block(
                Signature::new("public static func makeUseCase")
                    .params(params.iter().cloned())
                    .tail(format!(" -> {protocol}"))
                    .render(),
                vec![Node::line(codegen::call(&implementation, &args))],
            )],
        );

        tracing::trace!(use_case = %decl.name, functions = functions.len(), "Use case triad generated");
        Ok(vec![
            GeneratedFragment::peer(codegen::render(&[protocol_node])),
            GeneratedFragment::peer(codegen::render(&[implementation_node])),
            GeneratedFragment::peer(codegen::render(&[factory_node])),
        ])
    }
}

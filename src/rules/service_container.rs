//! `@ServiceContainer`: builds every service field from one shared use case
//! factory and emits a peer view modifier that injects the services into the
//! environment.

use std::sync::Arc;

use crate::codegen::{self, Node, Signature};
use crate::di::Wired;
use crate::diagnostics::{self, Diagnostic};
use crate::extract;
use crate::models::{GeneratedFragment, Invocation, PropertyDescriptor};
use crate::naming::{self, Conventions};

use super::{Rule, RuleRole};

const ENVIRONMENT_PARAMETER: &str = "environment";

#[derive(Wired, Clone, Debug)]
pub struct ServiceContainerRule {
    conventions: Arc<Conventions>,
}

impl ServiceContainerRule {
    fn modifier(&self, container: &str, services: &[&PropertyDescriptor]) -> Node {
        let instance = naming::as_variable_name(container);
        let mut chain = vec![Node::line("content")];
        chain.push(Node::Indent(
            services
                .iter()
                .map(|s| Node::line(format!(".environment(\\.{0}, {instance}.{0})", s.name)))
                .collect(),
        ));

        Node::block(
            format!("struct {}: ViewModifier", self.conventions.modifier_name(container)),
            vec![
                Node::line(format!(
                    "let {instance} = {container}({ENVIRONMENT_PARAMETER}: .current)"
                )),
                Node::Blank,
                Node::block("func body(content: Content) -> some View", chain),
            ],
        )
    }
}

impl Rule for ServiceContainerRule {
    fn name(&self) -> &'static str {
        "ServiceContainer"
    }

    fn role(&self) -> RuleRole {
        RuleRole::Attached
    }

    fn description(&self) -> &'static str {
        "Builds every service from a shared use case factory and injects them into the environment"
    }

    fn expand(&self, invocation: &Invocation) -> Result<Vec<GeneratedFragment>, Diagnostic> {
        let decl = super::class_declaration(self.name(), invocation)?;
        if let Some(existing) = decl
            .initializers()
            .find(|init| init.param_names() == [ENVIRONMENT_PARAMETER])
        {
            return Err(diagnostics::existing_member("init", existing.span.as_ref()));
        }

        let factory = &self.conventions.use_case_factory;
        let services: Vec<_> = extract::initializable_properties(decl)
            .into_iter()
            .filter(|p| p.name != *factory && self.conventions.is_service_field(&p.name))
            .collect();

        let mut fragments = Vec::new();
        // A hand-written factory property is reused as is
        if !extract::has_property(decl, factory) {
            fragments.push(GeneratedFragment::member(format!(
                "let {factory} = {}()",
                self.conventions.use_case_factory_type
            )));
        }

        let assignments = services
            .iter()
            .map(|s| {
                let implementation = self
                    .conventions
                    .default_implementation(s.ty.trim().trim_end_matches('?'));
                Node::line(format!(
                    "self.{} = {}",
                    s.name,
                    codegen::call(&implementation, &[format!("{factory}: {factory}")])
                ))
            })
            .collect();
        let init = Node::block(
            Signature::new("init")
                .param(format!(
                    "{ENVIRONMENT_PARAMETER}: {}",
                    self.conventions.environment_type
                ))
                .render(),
            assignments,
        );
        fragments.push(GeneratedFragment::member(codegen::render(&[init])));
        fragments.push(GeneratedFragment::peer(codegen::render(&[
            self.modifier(&decl.name, &services)
        ])));

        tracing::trace!(container = %decl.name, services = services.len(), "Service container generated");
        Ok(fragments)
    }
}

//! Source file walker producing declaration descriptors.

use pest::iterators::Pair;
use pest::Parser;
use serde::Serialize;

use super::{Rule, SwiftParser, SyntaxError};
use crate::error::AppError;
use crate::models::{
    Attribute, BindingSpecifier, DeclarationDescriptor, DeclarationKind, DeclarationSpans,
    ExpansionSite, FunctionDescriptor, InitializerDescriptor, Invocation, Member, Modifier,
    Parameter, PropertyDescriptor, Span,
};

/// Declarations and top-level expansions of one source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SourceFile {
    pub declarations: Vec<DeclarationDescriptor>,
    /// Freestanding expansions written outside any declaration.
    pub expansions: Vec<ExpansionSite>,
    /// Top-level text the grammar could not read, skipped whole.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<Span>,
}

impl SourceFile {
    /// Collects the invocations whose name passes `is_rule`, in source order.
    ///
    /// Attached attributes produce one invocation carrying the annotated
    /// declaration; freestanding expansions carry their container.
    pub fn invocations(&self, is_rule: impl Fn(&str) -> bool) -> Vec<Invocation> {
        let mut invocations = Vec::new();
        for decl in &self.declarations {
            collect(decl, &is_rule, &mut invocations);
        }
        for site in self.expansions.iter().filter(|e| is_rule(&e.name)) {
            invocations.push(freestanding(site, None));
        }
        invocations.sort_by_key(|i| i.span.as_ref().map_or(usize::MAX, |s| s.start));
        invocations
    }
}

fn collect(
    decl: &DeclarationDescriptor,
    is_rule: &impl Fn(&str) -> bool,
    out: &mut Vec<Invocation>,
) {
    for attribute in decl.attributes.iter().filter(|a| is_rule(&a.name)) {
        let mut invocation = Invocation::attached(&attribute.name, &attribute.clause, decl.clone());
        invocation.span = attribute.span.clone();
        out.push(invocation);
    }
    for member in &decl.members {
        match member {
            Member::Expansion(site) if is_rule(&site.name) => {
                out.push(freestanding(site, Some(decl)));
            }
            Member::Type(nested) => collect(nested, is_rule, out),
            _ => {}
        }
    }
}

fn freestanding(site: &ExpansionSite, container: Option<&DeclarationDescriptor>) -> Invocation {
    let mut invocation = Invocation::freestanding(&site.name, &site.clause, container.cloned());
    invocation.span = site.span.clone();
    invocation
}

/// Parses annotated declaration source.
pub fn parse_source(source: &str) -> Result<SourceFile, AppError> {
    let pairs = SwiftParser::parse(Rule::source_file, source).map_err(SyntaxError::from)?;

    let mut file = SourceFile::default();
    for pair in pairs.flat_map(Pair::into_inner) {
        match pair.as_rule() {
            Rule::type_decl => file.declarations.push(declaration(pair)?),
            Rule::freestanding => file.expansions.push(expansion(pair)),
            Rule::unparsed_item => {
                let span = span_of(&pair);
                tracing::warn!(start = span.start, end = span.end, "Skipping unreadable source");
                file.skipped.push(span);
            }
            _ => {}
        }
    }

    tracing::trace!(
        declarations = file.declarations.len(),
        expansions = file.expansions.len(),
        "Parsed source"
    );
    Ok(file)
}

fn span_of(pair: &Pair<Rule>) -> Span {
    let span = pair.as_span();
    span.start()..span.end()
}

/// Text of the first child, e.g. the type under a `: Type` annotation.
fn inner_text(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .next()
        .map(|p| p.as_str().trim().to_string())
        .unwrap_or_default()
}

fn declaration(pair: Pair<Rule>) -> Result<DeclarationDescriptor, SyntaxError> {
    let whole = span_of(&pair);
    let mut kind = None;
    let mut name = None;
    let mut attributes = Vec::new();
    let mut modifiers = Vec::new();
    let mut inherited = Vec::new();
    let mut members = Vec::new();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::attribute => attributes.push(attribute(inner)),
            Rule::modifier => modifiers.push(Modifier::parse(inner.as_str())),
            Rule::decl_keyword => {
                kind = DeclarationKind::from_keyword(inner.as_str().trim()).map(|k| (k, span_of(&inner)));
            }
            Rule::decl_name => name = Some((inner.as_str().trim().to_string(), span_of(&inner))),
            Rule::inheritance => {
                for entry in inner.into_inner() {
                    if let Some(type_ref) = entry.into_inner().find(|p| p.as_rule() == Rule::type_ref) {
                        inherited.push(type_ref.as_str().trim().to_string());
                    }
                }
            }
            Rule::member_block => members = member_block(inner)?,
            _ => {}
        }
    }

    let (kind, keyword) = kind.ok_or(SyntaxError::Malformed {
        what: "declaration keyword",
        offset: whole.start,
    })?;
    let (name, name_span) = name.ok_or(SyntaxError::Malformed {
        what: "declaration name",
        offset: whole.start,
    })?;

    let mut decl = DeclarationDescriptor::new(kind, name).with_spans(DeclarationSpans {
        whole,
        keyword,
        name: name_span,
    });
    decl.modifiers.extend(modifiers);
    decl.inherited_names.extend(inherited);
    decl.attributes = attributes;
    decl.members = members;
    Ok(decl)
}

fn member_block(block: Pair<Rule>) -> Result<Vec<Member>, SyntaxError> {
    let mut members = Vec::new();
    for inner in block.into_inner() {
        match inner.as_rule() {
            Rule::type_decl => members.push(declaration(inner)?.into()),
            Rule::freestanding => members.push(expansion(inner).into()),
            Rule::initializer => members.push(initializer(inner).into()),
            Rule::function => members.push(function(inner).into()),
            Rule::variable => members.extend(variables(inner).into_iter().map(Member::from)),
            _ => {}
        }
    }
    Ok(members)
}

fn attribute(pair: Pair<Rule>) -> Attribute {
    let span = span_of(&pair);
    let mut attribute = Attribute::new("").at(span);
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::dotted_name => attribute.name = inner.as_str().to_string(),
            Rule::attribute_clause => attribute.clause = inner.as_str().to_string(),
            _ => {}
        }
    }
    attribute
}

fn expansion(pair: Pair<Rule>) -> ExpansionSite {
    let span = span_of(&pair);
    let mut site = ExpansionSite::new("", "").at(span);
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::dotted_name => site.name = inner.as_str().to_string(),
            Rule::freestanding_clause => site.clause = inner.as_str().to_string(),
            _ => {}
        }
    }
    site
}

/// One `let`/`var` declaration can bind several names.
fn variables(pair: Pair<Rule>) -> Vec<PropertyDescriptor> {
    let span = span_of(&pair);
    let mut attributes = Vec::new();
    let mut modifiers = Vec::new();
    let mut binding = BindingSpecifier::Var;
    let mut properties = Vec::new();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::attribute => attributes.push(attribute(inner)),
            Rule::modifier => modifiers.push(Modifier::parse(inner.as_str())),
            Rule::binding_kw => {
                if inner.as_str().trim() == "let" {
                    binding = BindingSpecifier::Let;
                }
            }
            Rule::var_binding => {
                let mut property = var_binding(inner, binding).at(span.clone());
                for modifier in &modifiers {
                    property = property.with_modifier(modifier.clone());
                }
                for attribute in &attributes {
                    property = property.with_attribute(attribute.clone());
                }
                properties.push(property);
            }
            _ => {}
        }
    }
    properties
}

fn var_binding(pair: Pair<Rule>, binding: BindingSpecifier) -> PropertyDescriptor {
    let mut name = String::new();
    let mut ty = None;
    let mut initial_value = None;
    let mut has_accessor = false;
    let mut is_observer = false;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::identifier => name = inner.as_str().trim_matches('`').to_string(),
            Rule::type_annotation => ty = Some(inner_text(inner)),
            Rule::initial_value => initial_value = Some(inner_text(inner)),
            Rule::accessor_block => {
                let block = inner.as_str().trim();
                match initial_value.as_mut() {
                    // A getter cannot follow an initial value: this is a trailing closure
                    Some(value) if !is_observer_block(block) => {
                        value.push(' ');
                        value.push_str(block);
                    }
                    _ => {
                        has_accessor = true;
                        is_observer = is_observer_block(block);
                    }
                }
            }
            _ => {}
        }
    }

    let ty = ty
        .or_else(|| initial_value.as_deref().and_then(infer_literal_type))
        .unwrap_or_default();
    let mut property = PropertyDescriptor::new(binding, name, ty);
    property.initial_value = initial_value;
    property.has_accessor = has_accessor;
    property.is_observer = is_observer;
    property
}

/// `{ willSet { ... } didSet { ... } }` rather than a getter or `get`/`set`.
fn is_observer_block(block: &str) -> bool {
    let body = block.trim().trim_start_matches('{').trim_start();
    ["willSet", "didSet"].iter().any(|observer| {
        body.strip_prefix(observer)
            .is_some_and(|rest| !rest.starts_with(|c: char| c.is_alphanumeric() || c == '_'))
    })
}

/// Best-effort type of an unannotated initial value.
fn infer_literal_type(value: &str) -> Option<String> {
    let value = value.trim();
    if value == "true" || value == "false" {
        return Some("Bool".to_string());
    }
    if value.starts_with('"') {
        return Some("String".to_string());
    }
    let numeric = value.strip_prefix('-').unwrap_or(value);
    if !numeric.is_empty() && numeric.chars().all(|c| c.is_ascii_digit() || c == '_') {
        return Some("Int".to_string());
    }
    if !numeric.is_empty()
        && numeric.contains('.')
        && numeric.chars().all(|c| c.is_ascii_digit() || c == '_' || c == '.')
    {
        return Some("Double".to_string());
    }
    // `Type()` / `Type(args)` constructor calls
    let callee = value.strip_suffix(')')?.split_once('(')?.0;
    let is_type = callee.starts_with(|c: char| c.is_ascii_uppercase())
        && callee.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '.');
    is_type.then(|| callee.to_string())
}

fn function(pair: Pair<Rule>) -> FunctionDescriptor {
    let mut function = FunctionDescriptor::new("").at(span_of(&pair));
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::modifier => function = function.with_modifier(Modifier::parse(inner.as_str())),
            Rule::func_name => function.name = inner.as_str().trim().to_string(),
            Rule::generic_params => function.generic_params = Some(inner.as_str().trim().to_string()),
            Rule::param_clause => function.params = parameters(inner),
            Rule::effects => (function.is_async, function.is_throwing) = effects(inner),
            Rule::return_clause => function.return_type = Some(inner_text(inner)),
            Rule::where_clause => function.where_clause = Some(inner.as_str().trim().to_string()),
            _ => {}
        }
    }
    function
}

fn initializer(pair: Pair<Rule>) -> InitializerDescriptor {
    let mut init = InitializerDescriptor::new().at(span_of(&pair));
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::modifier => init = init.with_modifier(Modifier::parse(inner.as_str())),
            Rule::failable_mark => init.is_failable = true,
            Rule::param_clause => init.params = parameters(inner),
            _ => {}
        }
    }
    init
}

fn effects(pair: Pair<Rule>) -> (bool, bool) {
    let mut is_async = false;
    let mut is_throwing = false;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::kw_async => is_async = true,
            Rule::throws_spec => is_throwing = true,
            _ => {}
        }
    }
    (is_async, is_throwing)
}

fn parameters(clause: Pair<Rule>) -> Vec<Parameter> {
    clause
        .into_inner()
        .filter(|p| p.as_rule() == Rule::param)
        .map(parameter)
        .collect()
}

fn parameter(pair: Pair<Rule>) -> Parameter {
    let mut param = Parameter::new("", "");
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::param_label => param.label = Some(inner.as_str().trim().to_string()),
            Rule::identifier => param.name = inner.as_str().trim_matches('`').to_string(),
            Rule::param_type => {
                for part in inner.into_inner() {
                    match part.as_rule() {
                        Rule::kw_inout => param.is_inout = true,
                        Rule::type_ref => param.ty = part.as_str().trim().to_string(),
                        _ => {}
                    }
                }
            }
            Rule::default_arg => param.default_value = Some(inner_text(inner)),
            _ => {}
        }
    }
    // `func f(user user: User)` carries a redundant label
    if param.label.as_deref() == Some(param.name.as_str()) {
        param.label = None;
    }
    param
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SOURCE: &str = r#"
import Foundation

/// Credentials sent to the auth endpoint.
@Entity
public struct LoginCredentials: Equatable, Sendable {
    @EquatableKey let email: String
    let password: String // never logged
    var nickname: String? = nil
    static let empty = LoginCredentials()
    var isValid: Bool { !email.isEmpty }
}

struct RepositoryFactory {
    let dataSourceFactory = DataSourceFactory()
    #MakeRepository<AuthRepository>()
}

@UseCase
struct Login {
    private let repository: AuthRepository

    func execute(for user: User, _ password: inout String) async throws -> Session {
        try await repository.login(user, password)
    }

    private func helper() {}
}
"#;

    #[test]
    fn test_parses_declarations() {
        let file = parse_source(SOURCE).unwrap();
        let names: Vec<_> = file.declarations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["LoginCredentials", "RepositoryFactory", "Login"]);

        let credentials = &file.declarations[0];
        assert_eq!(credentials.kind, DeclarationKind::Struct);
        assert!(credentials.modifiers.contains(&Modifier::Public));
        assert!(credentials.inherits("Equatable"));
        assert!(credentials.inherits("Sendable"));
        assert_eq!(credentials.attributes[0].name, "Entity");
    }

    #[test]
    fn test_parses_properties() {
        let file = parse_source(SOURCE).unwrap();
        let props: Vec<_> = file.declarations[0].properties().collect();
        assert_eq!(props.len(), 5);

        assert_eq!(props[0].name, "email");
        assert_eq!(props[0].ty, "String");
        assert!(props[0].identity_key);
        assert_eq!(props[0].binding, BindingSpecifier::Let);

        assert!(props[2].is_optional);
        assert_eq!(props[2].initial_value.as_deref(), Some("nil"));

        assert!(props[3].is_static);
        assert_eq!(props[3].ty, "LoginCredentials");

        assert!(props[4].has_accessor);
        assert_eq!(props[4].ty, "Bool");
    }

    #[test]
    fn test_parses_functions() {
        let file = parse_source(SOURCE).unwrap();
        let functions: Vec<_> = file.declarations[2].functions().collect();
        assert_eq!(functions.len(), 2);

        let execute = functions[0];
        assert_eq!(execute.name, "execute");
        assert!(execute.is_async);
        assert!(execute.is_throwing);
        assert_eq!(execute.return_type.as_deref(), Some("Session"));
        assert_eq!(execute.params[0].label.as_deref(), Some("for"));
        assert_eq!(execute.params[0].name, "user");
        assert_eq!(execute.params[1].label.as_deref(), Some("_"));
        assert!(execute.params[1].is_inout);
        assert_eq!(execute.params[1].ty, "String");

        assert!(functions[1].is_private());
    }

    #[test]
    fn test_collects_invocations_in_source_order() {
        let file = parse_source(SOURCE).unwrap();
        let invocations = file.invocations(|name| {
            matches!(name, "Entity" | "UseCase" | "MakeRepository")
        });
        let names: Vec<_> = invocations.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Entity", "MakeRepository", "UseCase"]);

        let make = &invocations[1];
        assert!(make.is_freestanding());
        assert_eq!(make.clause, "<AuthRepository>()");
        assert_eq!(make.declaration().unwrap().name, "RepositoryFactory");
    }

    #[test]
    fn test_spans_point_into_source() {
        let source = "@Entity\nclass User {\n    let id: UUID\n}\n";
        let file = parse_source(source).unwrap();
        let spans = file.declarations[0].spans.clone().unwrap();
        assert_eq!(&source[spans.keyword], "class");
        assert_eq!(&source[spans.name], "User");
        assert_eq!(&source[file.declarations[0].attributes[0].span.clone().unwrap()], "@Entity");
    }

    #[test]
    fn test_initializers_and_nested_types() {
        let source = r#"
class Container {
    convenience init?(raw: String) { nil }
    init(entity: User) {}
    enum Kind { case a, b }
}
"#;
        let file = parse_source(source).unwrap();
        let decl = &file.declarations[0];
        let inits: Vec<_> = decl.initializers().collect();
        assert!(inits[0].is_failable);
        assert!(inits[0].is_convenience);
        assert_eq!(inits[1].param_names(), vec!["entity"]);
        assert_eq!(decl.nested_types().next().unwrap().kind, DeclarationKind::Enum);
    }

    #[test]
    fn test_skips_unreadable_items() {
        let file = parse_source("struct {").unwrap();
        assert!(file.declarations.is_empty());
        assert_eq!(file.skipped, vec![0..8]);
    }

    #[test]
    fn test_unreadable_declaration_does_not_hide_siblings() {
        let source = r#"struct Broken {
    let = 5
}

@Entity
struct User {
    let id: UUID
}
"#;
        let file = parse_source(source).unwrap();
        let names: Vec<_> = file.declarations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["User"]);
        assert_eq!(file.skipped.len(), 1);
        assert!(source[file.skipped[0].clone()].starts_with("struct Broken {"));
    }

    #[test]
    fn test_freestanding_with_trailing_closure() {
        let source = r#"@Entity
struct User {
    let id: UUID
}

#Preview {
    Text("hi")
}
"#;
        let file = parse_source(source).unwrap();
        assert!(file.skipped.is_empty());
        assert_eq!(file.declarations[0].name, "User");
        assert_eq!(file.expansions[0].name, "Preview");
        assert_eq!(file.expansions[0].clause, "");
    }

    #[test]
    fn test_property_observers_are_stored() {
        let source = r#"struct S {
    var x: Int = 0 {
        didSet { print(x) }
    }
    var y: Int {
        willSet { print(newValue) }
    }
    var z: Int { x + y }
    lazy var w: Formatter = { Formatter() }()
}"#;
        let file = parse_source(source).unwrap();
        let props: Vec<_> = file.declarations[0].properties().collect();

        assert_eq!(props[0].initial_value.as_deref(), Some("0"));
        assert!(props[0].is_observer);
        assert!(props[0].is_stored_instance());
        assert!(props[1].is_observer);
        assert!(props[1].is_stored_instance());
        assert!(!props[2].is_observer);
        assert!(!props[2].is_stored_instance());
        assert_eq!(props[3].initial_value.as_deref(), Some("{ Formatter() }()"));
        assert!(!props[3].has_accessor);
    }

    #[test]
    fn test_trailing_closure_stays_in_initial_value() {
        let file = parse_source("struct S {\n    var names = ids.map { $0.name }\n}").unwrap();
        let names = file.declarations[0].properties().next().unwrap();
        assert_eq!(names.initial_value.as_deref(), Some("ids.map { $0.name }"));
        assert!(names.is_stored_instance());
    }

    #[test]
    fn test_literal_inference() {
        assert_eq!(infer_literal_type("42").as_deref(), Some("Int"));
        assert_eq!(infer_literal_type("4.2").as_deref(), Some("Double"));
        assert_eq!(infer_literal_type("\"x\"").as_deref(), Some("String"));
        assert_eq!(infer_literal_type("Config(env: .prod)").as_deref(), Some("Config"));
        assert_eq!(infer_literal_type("makeThing()"), None);
    }
}

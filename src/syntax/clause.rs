//! Invocation argument clauses: `<A & B, any C>(Target.self)`.

use pest::iterators::Pair;
use pest::Parser;
use serde::Serialize;

use super::{Rule, SwiftParser, SyntaxError};

/// Existential qualifier in front of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Qualifier {
    Any,
    Some,
}

impl Qualifier {
    pub fn keyword(self) -> &'static str {
        match self {
            Qualifier::Any => "any",
            Qualifier::Some => "some",
        }
    }
}

/// One element of a type argument. A composition has several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeElement {
    /// Type text including the qualifier: `any AuthDataSource`.
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<Qualifier>,
    /// Type text without the qualifier.
    pub constraint: String,
    /// Last identifier of a nominal type (`Repository` for `Core.Repository<User>`).
    /// `None` for arrays, tuples and function types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_name: Option<String>,
}

/// A parenthesized argument: `key: "id"`, `LoginUseCase.self`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueArgument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub expression: String,
}

impl ValueArgument {
    /// Type named by the argument: `Foo.self` and bare `Foo` both name `Foo`.
    pub fn type_name(&self) -> Option<&str> {
        let expr = self.expression.trim();
        let expr = expr.strip_suffix(".self").unwrap_or(expr);
        let is_type_path = !expr.is_empty()
            && expr.split('.').all(|segment| {
                segment.starts_with(|c: char| c.is_alphabetic() || c == '_')
                    && segment.chars().all(|c| c.is_alphanumeric() || c == '_')
            });
        is_type_path.then_some(expr)
    }

    /// Contents of a plain string literal argument.
    pub fn string_literal(&self) -> Option<&str> {
        self.expression
            .trim()
            .strip_prefix('"')?
            .strip_suffix('"')
    }
}

/// Parsed argument clause.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedClause {
    /// Generic arguments in order; each is one or more composed elements.
    pub type_arguments: Vec<Vec<TypeElement>>,
    pub value_arguments: Vec<ValueArgument>,
}

impl ParsedClause {
    /// Labeled value argument lookup.
    pub fn value(&self, label: &str) -> Option<&ValueArgument> {
        self.value_arguments
            .iter()
            .find(|arg| arg.label.as_deref() == Some(label))
    }
}

/// Parses an argument clause. Empty text is an empty clause.
pub fn parse_clause(text: &str) -> Result<ParsedClause, SyntaxError> {
    let mut clause = ParsedClause::default();
    let text = text.trim();
    if text.is_empty() {
        return Ok(clause);
    }

    let pairs = SwiftParser::parse(Rule::argument_clause, text)?;
    for pair in pairs.flat_map(Pair::into_inner) {
        match pair.as_rule() {
            Rule::generic_arguments => {
                for type_ref in pair.into_inner() {
                    clause.type_arguments.push(type_elements(type_ref)?);
                }
            }
            Rule::value_arguments => {
                for argument in pair.into_inner() {
                    clause.value_arguments.push(value_argument(argument));
                }
            }
            _ => {}
        }
    }
    Ok(clause)
}

fn type_elements(type_ref: Pair<Rule>) -> Result<Vec<TypeElement>, SyntaxError> {
    let offset = type_ref.as_span().start();
    let elements: Vec<_> = type_ref
        .into_inner()
        .filter(|p| p.as_rule() == Rule::single_type)
        .flat_map(Pair::into_inner)
        .map(type_element)
        .collect();

    if elements.is_empty() {
        return Err(SyntaxError::Malformed {
            what: "type",
            offset,
        });
    }
    Ok(elements)
}

fn type_element(single: Pair<Rule>) -> TypeElement {
    match single.as_rule() {
        Rule::existential_type => {
            let mut qualifier = None;
            let mut constraint = String::new();
            let mut base_name = None;
            for inner in single.into_inner() {
                match inner.as_rule() {
                    Rule::qualifier => {
                        qualifier = match inner.as_str().trim() {
                            "some" => Some(Qualifier::Some),
                            _ => Some(Qualifier::Any),
                        }
                    }
                    Rule::plain_type => {
                        constraint = inner.as_str().trim().to_string();
                        base_name = nominal_base(inner);
                    }
                    _ => {}
                }
            }
            let text = match qualifier {
                Some(q) => format!("{} {constraint}", q.keyword()),
                None => constraint.clone(),
            };
            TypeElement {
                text,
                qualifier,
                constraint,
                base_name,
            }
        }
        _ => {
            let text = single.as_str().trim().to_string();
            TypeElement {
                constraint: text.clone(),
                text,
                qualifier: None,
                base_name: nominal_base(single),
            }
        }
    }
}

/// Last identifier of a nominal type, ignoring generic arguments.
fn nominal_base(plain: Pair<Rule>) -> Option<String> {
    let named = plain
        .into_inner()
        .find(|p| p.as_rule() == Rule::named_type)?;
    let segment = named.into_inner().last()?;
    let ident = segment
        .into_inner()
        .find(|p| p.as_rule() == Rule::identifier)?;
    Some(ident.as_str().trim_matches('`').to_string())
}

fn value_argument(argument: Pair<Rule>) -> ValueArgument {
    let mut label = None;
    let mut expression = String::new();
    for inner in argument.into_inner() {
        match inner.as_rule() {
            Rule::identifier => label = Some(inner.as_str().to_string()),
            Rule::default_expr => expression = inner.as_str().trim().to_string(),
            _ => {}
        }
    }
    ValueArgument { label, expression }
}

//! Typed fragment builder.
//!
//! Generated declarations are assembled as a small tree of [`Node`]s and
//! rendered with four-space indentation, so nesting and separators are
//! decided in one place instead of inside string templates.
//!
//! # Example
//!
//! ```
//! use layergen::codegen::{render, Node, Signature};
//!
//! let init = Node::block(
//!     Signature::new("init").param("id: UUID").render(),
//!     vec![Node::line("self.id = id")],
//! );
//! assert_eq!(render(&[init]), "init(id: UUID) {\n    self.id = id\n}");
//! ```

const INDENT: &str = "    ";

/// One element of a generated fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Line(String),
    Blank,
    /// `head {` + indented body + `}`. The head may span several lines.
    Block { head: String, body: Vec<Node> },
    /// Indented children without braces.
    Indent(Vec<Node>),
}

impl Node {
    pub fn line(text: impl Into<String>) -> Self {
        Node::Line(text.into())
    }

    pub fn block(head: impl Into<String>, body: Vec<Node>) -> Self {
        Node::Block {
            head: head.into(),
            body,
        }
    }

    fn render_into(&self, depth: usize, out: &mut Vec<String>) {
        let indent = INDENT.repeat(depth);
        match self {
            Node::Line(text) => {
                for line in text.lines() {
                    out.push(format!("{indent}{line}"));
                }
            }
            Node::Blank => out.push(String::new()),
            Node::Block { head, body } => {
                let mut lines = head.lines().peekable();
                while let Some(line) = lines.next() {
                    if lines.peek().is_some() {
                        out.push(format!("{indent}{line}"));
                    } else {
                        out.push(format!("{indent}{line} {{"));
                    }
                }
                for node in body {
                    node.render_into(depth + 1, out);
                }
                out.push(format!("{indent}}}"));
            }
            Node::Indent(children) => {
                for node in children {
                    node.render_into(depth + 1, out);
                }
            }
        }
    }
}

/// Renders nodes at depth zero, joined by newlines.
pub fn render(nodes: &[Node]) -> String {
    let mut out = Vec::new();
    for node in nodes {
        node.render_into(0, &mut out);
    }
    out.join("\n")
}

/// Function or initializer head: `public init(a: A, b: B)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    head: String,
    params: Vec<String>,
    vertical: bool,
    tail: String,
}

impl Signature {
    pub fn new(head: impl Into<String>) -> Self {
        Self {
            head: head.into(),
            ..Self::default()
        }
    }

    pub fn param(mut self, param: impl Into<String>) -> Self {
        self.params.push(param.into());
        self
    }

    pub fn params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params.extend(params.into_iter().map(Into::into));
        self
    }

    /// One parameter per line.
    pub fn vertical(mut self) -> Self {
        self.vertical = true;
        self
    }

    /// Text after the parameter list: ` async throws -> User`.
    pub fn tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = tail.into();
        self
    }

    pub fn render(&self) -> String {
        if self.vertical && !self.params.is_empty() {
            let params = self
                .params
                .iter()
                .map(|p| format!("{INDENT}{p}"))
                .collect::<Vec<_>>()
                .join(",\n");
            format!("{}(\n{params}\n){}", self.head, self.tail)
        } else {
            format!("{}({}){}", self.head, self.params.join(", "), self.tail)
        }
    }
}

/// Effects and return clause: ` async throws -> T`.
pub fn effects_tail(is_async: bool, is_throwing: bool, return_type: Option<&str>) -> String {
    let mut tail = String::new();
    if is_async {
        tail.push_str(" async");
    }
    if is_throwing {
        tail.push_str(" throws");
    }
    if let Some(ty) = return_type {
        tail.push_str(" -> ");
        tail.push_str(ty);
    }
    tail
}

/// Call with arguments on one line: `Foo(a: a, b: b)`.
pub fn call(callee: &str, args: &[String]) -> String {
    format!("{callee}({})", args.join(", "))
}

/// Call with one argument per line, as nodes.
pub fn call_vertical(callee: &str, args: &[String]) -> Vec<Node> {
    if args.is_empty() {
        return vec![Node::line(format!("{callee}()"))];
    }
    let last = args.len() - 1;
    let lines = args
        .iter()
        .enumerate()
        .map(|(i, arg)| {
            if i == last {
                Node::line(arg.clone())
            } else {
                Node::line(format!("{arg},"))
            }
        })
        .collect();
    vec![
        Node::line(format!("{callee}(")),
        Node::Indent(lines),
        Node::line(")"),
    ]
}

/// `self.name = name` for each name.
pub fn assignments<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<Node> {
    names
        .into_iter()
        .map(|name| Node::line(format!("self.{name} = {name}")))
        .collect()
}

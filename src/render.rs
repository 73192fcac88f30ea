//! Rendering of parsed messages into text or renderable nodes.
//!
//! The interpolator walks the AST produced by [`Parser`] and resolves each
//! placeholder against a [`SubstitutionTable`]. It knows nothing about the
//! node type it produces: composition is delegated to a [`NodeRuntime`]
//! supplied by the host, so the same logic drives any rendering backend.
//!
//! # Example
//!
//! ```
//! use trellis_i18n::html::{Element, HtmlNode, HtmlRuntime};
//! use trellis_i18n::render::{SubstitutionTable, interpolate};
//!
//! let mut table: SubstitutionTable<HtmlNode> = SubstitutionTable::new();
//! table
//!     .with_node("icon", Element::new("img").with_attribute("src", "/star.svg").into())
//!     .with_factory("b", |children| Element::new("strong").with_child(children.into()).into());
//!
//! let rendered = interpolate(&HtmlRuntime, "{{icon}} <b>Starred</b>", &table);
//! assert_eq!(
//!     HtmlNode::from(rendered).to_string(),
//!     r#"<img src="/star.svg"> <strong>Starred</strong>"#
//! );
//! ```

use std::collections::HashMap;

use crate::ast::{AstNode, AstNodeList};
use crate::parser::Parser;

/// Elements that cannot hold children.
///
/// See <https://html.spec.whatwg.org/multipage/syntax.html#void-elements>.
pub const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub fn is_void_element(element_type: &str) -> bool {
    VOID_ELEMENTS.contains(&element_type)
}

/// The result of rendering a message: plain text when no node was produced,
/// otherwise a node built by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered<N> {
    Text(String),
    Node(N),
}

impl<N> Rendered<N> {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Rendered::Text(text) => Some(text),
            Rendered::Node(_) => None,
        }
    }

    pub fn into_node(self) -> Option<N> {
        match self {
            Rendered::Text(_) => None,
            Rendered::Node(node) => Some(node),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Rendered::Text(_))
    }
}

/// Node operations the interpolator needs from the host rendering runtime.
pub trait NodeRuntime {
    type Node: Clone;

    /// The element name of `node` (`"img"`, `"strong"`), or `None` when the
    /// node is not a plain element.
    fn element_type<'n>(&self, node: &'n Self::Node) -> Option<&'n str>;

    /// A copy of `node` whose children are replaced by `children`. `None`
    /// leaves the copy without children.
    fn clone_with_children(
        &self,
        node: &Self::Node,
        children: Option<Rendered<Self::Node>>,
    ) -> Self::Node;

    /// A fragment holding `children` in order.
    fn fragment(&self, children: Vec<Rendered<Self::Node>>) -> Self::Node;
}

/// A value a placeholder can be resolved against.
pub enum Substitution<'a, N> {
    /// A printable scalar. Substituted into `{{name}}` by the translation
    /// layer before interpolation runs.
    Value(String),
    /// A node used as-is for `{{name}}`, or cloned around the content of
    /// `<name>...</name>`.
    Node(N),
    /// Builds a node from the rendered content of `<name>...</name>`.
    Factory(Box<dyn Fn(Rendered<N>) -> N + 'a>),
}

impl<'a, N> Substitution<'a, N> {
    pub fn value(value: impl ToString) -> Self {
        Substitution::Value(value.to_string())
    }

    pub fn factory(render: impl Fn(Rendered<N>) -> N + 'a) -> Self {
        Substitution::Factory(Box::new(render))
    }
}

impl<N: std::fmt::Debug> std::fmt::Debug for Substitution<'_, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Substitution::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Substitution::Node(node) => f.debug_tuple("Node").field(node).finish(),
            Substitution::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

/// Placeholder name to substitution, built fresh for every message.
pub struct SubstitutionTable<'a, N> {
    entries: HashMap<String, Substitution<'a, N>>,
}

impl<'a, N> SubstitutionTable<'a, N> {
    pub fn new() -> Self {
        SubstitutionTable {
            entries: HashMap::new(),
        }
    }

    pub fn insert(&mut self, name: &str, substitution: Substitution<'a, N>) -> &mut Self {
        self.entries.insert(name.to_string(), substitution);
        self
    }

    pub fn with_value(&mut self, name: &str, value: impl ToString) -> &mut Self {
        self.insert(name, Substitution::value(value))
    }

    pub fn with_node(&mut self, name: &str, node: N) -> &mut Self {
        self.insert(name, Substitution::Node(node))
    }

    pub fn with_factory(
        &mut self,
        name: &str,
        render: impl Fn(Rendered<N>) -> N + 'a,
    ) -> &mut Self {
        self.insert(name, Substitution::factory(render))
    }

    pub fn get(&self, name: &str) -> Option<&Substitution<'a, N>> {
        self.entries.get(name)
    }

    /// The scalar entries, as `(name, value)` pairs.
    pub fn scalars(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|(name, substitution)| match substitution {
            Substitution::Value(value) => Some((name.as_str(), value.as_str())),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N> Default for SubstitutionTable<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, N> FromIterator<(String, Substitution<'a, N>)> for SubstitutionTable<'a, N> {
    fn from_iter<I: IntoIterator<Item = (String, Substitution<'a, N>)>>(iter: I) -> Self {
        SubstitutionTable {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Parses `template` and renders it against `table`.
///
/// Never fails: a `{{name}}` without a node entry is kept verbatim, and a
/// `<name>...</name>` without a node or factory entry is replaced by its
/// rendered content.
pub fn interpolate<R: NodeRuntime>(
    runtime: &R,
    template: &str,
    table: &SubstitutionTable<'_, R::Node>,
) -> Rendered<R::Node> {
    let ast = Parser::new(template).parse();
    render_ast(runtime, &ast, table)
}

/// Renders an already parsed message.
pub fn render_ast<R: NodeRuntime>(
    runtime: &R,
    ast: &AstNodeList,
    table: &SubstitutionTable<'_, R::Node>,
) -> Rendered<R::Node> {
    let mut segments = Vec::new();
    render_segments(runtime, ast, table, &mut segments);
    compose(runtime, segments)
}

fn render_segments<R: NodeRuntime>(
    runtime: &R,
    ast: &AstNodeList,
    table: &SubstitutionTable<'_, R::Node>,
    segments: &mut Vec<Rendered<R::Node>>,
) {
    for node in ast {
        match node {
            AstNode::Text(text) => push_text(segments, text),
            AstNode::Variable(variable) => match table.get(&variable.name) {
                Some(Substitution::Node(node)) => segments.push(Rendered::Node(node.clone())),
                _ => push_text(segments, &variable.to_string()),
            },
            AstNode::Tag(tag) => match table.get(&tag.name) {
                Some(Substitution::Factory(render)) => {
                    let children = render_ast(runtime, &tag.children, table);
                    segments.push(Rendered::Node(render(children)));
                }
                Some(Substitution::Node(element)) => {
                    // Content is rendered even for void elements so nested
                    // factories run; the result is then dropped.
                    let rendered = render_ast(runtime, &tag.children, table);
                    let is_void = runtime
                        .element_type(element)
                        .is_some_and(is_void_element);
                    let children = if is_void { None } else { Some(rendered) };
                    segments.push(Rendered::Node(
                        runtime.clone_with_children(element, children),
                    ));
                }
                // Unresolved: keep the content, drop the wrapper.
                _ => render_segments(runtime, &tag.children, table, segments),
            },
        }
    }
}

fn push_text<N>(segments: &mut Vec<Rendered<N>>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Rendered::Text(last)) = segments.last_mut() {
        last.push_str(text);
    } else {
        segments.push(Rendered::Text(text.to_string()));
    }
}

fn compose<R: NodeRuntime>(runtime: &R, mut segments: Vec<Rendered<R::Node>>) -> Rendered<R::Node> {
    if segments.iter().all(Rendered::is_text) {
        // Adjacent text is merged on push, so there is at most one segment.
        return match segments.pop() {
            Some(Rendered::Text(text)) => Rendered::Text(text),
            _ => Rendered::Text(String::new()),
        };
    }
    Rendered::Node(runtime.fragment(segments))
}

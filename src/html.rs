//! A small HTML node tree implementing [`NodeRuntime`].

use crate::render::{NodeRuntime, Rendered, is_void_element};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlNode {
    Text(String),
    Element(Element),
    Fragment(Vec<HtmlNode>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<HtmlNode>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Element {
            tag: tag.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_child(mut self, child: HtmlNode) -> Self {
        self.children.push(child);
        self
    }
}

impl HtmlNode {
    pub fn text(text: &str) -> Self {
        HtmlNode::Text(text.to_string())
    }

    pub fn element(tag: &str) -> Self {
        HtmlNode::Element(Element::new(tag))
    }
}

impl From<Element> for HtmlNode {
    fn from(element: Element) -> Self {
        HtmlNode::Element(element)
    }
}

impl From<Rendered<HtmlNode>> for HtmlNode {
    fn from(rendered: Rendered<HtmlNode>) -> Self {
        match rendered {
            Rendered::Text(text) => HtmlNode::Text(text),
            Rendered::Node(node) => node,
        }
    }
}

impl std::fmt::Display for HtmlNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HtmlNode::Text(text) => write!(f, "{}", escape(text, false)),
            HtmlNode::Element(element) => write!(f, "{}", element),
            HtmlNode::Fragment(children) => {
                for child in children {
                    write!(f, "{}", child)?;
                }
                Ok(())
            }
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (name, value) in &self.attributes {
            write!(f, " {}=\"{}\"", name, escape(value, true))?;
        }
        write!(f, ">")?;
        if is_void_element(&self.tag) {
            return Ok(());
        }
        for child in &self.children {
            write!(f, "{}", child)?;
        }
        write!(f, "</{}>", self.tag)
    }
}

fn escape(text: &str, attribute: bool) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' if attribute => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders messages into [`HtmlNode`] trees.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlRuntime;

impl NodeRuntime for HtmlRuntime {
    type Node = HtmlNode;

    fn element_type<'n>(&self, node: &'n HtmlNode) -> Option<&'n str> {
        match node {
            HtmlNode::Element(element) => Some(&element.tag),
            _ => None,
        }
    }

    fn clone_with_children(&self, node: &HtmlNode, children: Option<Rendered<HtmlNode>>) -> HtmlNode {
        let children: Vec<HtmlNode> = children.map(HtmlNode::from).into_iter().collect();
        match node {
            HtmlNode::Element(element) => HtmlNode::Element(Element {
                tag: element.tag.clone(),
                attributes: element.attributes.clone(),
                children,
            }),
            HtmlNode::Fragment(_) => HtmlNode::Fragment(children),
            HtmlNode::Text(_) => node.clone(),
        }
    }

    fn fragment(&self, children: Vec<Rendered<HtmlNode>>) -> HtmlNode {
        HtmlNode::Fragment(children.into_iter().map(HtmlNode::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{SubstitutionTable, interpolate};

    fn render(template: &str, table: &SubstitutionTable<'_, HtmlNode>) -> String {
        HtmlNode::from(interpolate(&HtmlRuntime, template, table)).to_string()
    }

    #[test]
    fn test_display_escapes_text_and_attributes() {
        let node: HtmlNode = Element::new("a")
            .with_attribute("title", "\"quoted\" & <odd>")
            .with_child(HtmlNode::text("1 < 2 & 3 > 2"))
            .into();
        assert_eq!(
            node.to_string(),
            "<a title=\"&quot;quoted&quot; &amp; &lt;odd&gt;\">1 &lt; 2 &amp; 3 &gt; 2</a>"
        );
    }

    #[test]
    fn test_display_void_element() {
        let node: HtmlNode = Element::new("br").with_child(HtmlNode::text("lost")).into();
        assert_eq!(node.to_string(), "<br>");
    }

    #[test]
    fn test_render_keeps_element_attributes() {
        let mut table: SubstitutionTable<HtmlNode> = SubstitutionTable::new();
        table.with_node(
            "link",
            Element::new("a")
                .with_attribute("href", "/docs")
                .with_child(HtmlNode::text("placeholder"))
                .into(),
        );

        assert_eq!(
            render("See <link>the docs</link>.", &table),
            "See <a href=\"/docs\">the docs</a>."
        );
    }

    #[test]
    fn test_render_void_element_drops_content() {
        let mut table: SubstitutionTable<HtmlNode> = SubstitutionTable::new();
        table.with_node("img", Element::new("img").with_attribute("alt", "logo").into());

        let rendered = interpolate(&HtmlRuntime, "<img>ignored</img>", &table);
        assert_eq!(
            rendered.into_node(),
            Some(HtmlNode::Fragment(vec![HtmlNode::Element(
                Element::new("img").with_attribute("alt", "logo")
            )]))
        );
    }

    #[test]
    fn test_render_factory() {
        let mut table: SubstitutionTable<HtmlNode> = SubstitutionTable::new();
        table.with_factory("b", |children| {
            Element::new("strong").with_child(children.into()).into()
        });

        assert_eq!(render("<b>hi</b>", &table), "<strong>hi</strong>");
    }

    #[test]
    fn test_render_text_is_escaped_once() {
        let table = SubstitutionTable::new();
        assert_eq!(render("Tom & Jerry", &table), "Tom &amp; Jerry");
    }
}

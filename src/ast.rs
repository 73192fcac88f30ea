#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstNode {
    Text(String),
    Variable(Variable),
    Tag(Tag),
}

/// A `{{name}}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
}

impl Variable {
    pub fn new(name: &str) -> Self {
        Variable {
            name: name.to_string(),
        }
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{{{}}}}}", self.name)
    }
}

/// A `<name>content</name>` placeholder.
///
/// `content` keeps the raw text between the opening and closing tag so the
/// placeholder can be written back verbatim; `children` is that same text
/// parsed again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub content: String,
    pub children: AstNodeList,
}

impl Tag {
    pub fn new(name: &str, content: &str, children: AstNodeList) -> Self {
        Tag {
            name: name.to_string(),
            content: content.to_string(),
            children,
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}>{}</{}>", self.name, self.content, self.name)
    }
}

impl std::fmt::Display for AstNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AstNode::Text(text) => write!(f, "{}", text),
            AstNode::Variable(variable) => write!(f, "{}", variable),
            AstNode::Tag(tag) => write!(f, "{}", tag),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AstNodeList(pub Vec<AstNode>);

impl AstNodeList {
    pub fn new() -> Self {
        AstNodeList(Vec::new())
    }

    pub fn push(&mut self, node: AstNode) {
        self.0.push(node);
    }

    /// Appends literal text, merging it into a preceding text node.
    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(AstNode::Text(last)) = self.0.last_mut() {
            last.push_str(text);
        } else {
            self.0.push(AstNode::Text(text.to_string()));
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn get(&self, index: usize) -> Option<&AstNode> {
        self.0.get(index)
    }
}

impl std::fmt::Display for AstNodeList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for node in &self.0 {
            write!(f, "{}", node)?;
        }
        Ok(())
    }
}

impl IntoIterator for AstNodeList {
    type Item = AstNode;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a AstNodeList {
    type Item = &'a AstNode;
    type IntoIter = std::slice::Iter<'a, AstNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

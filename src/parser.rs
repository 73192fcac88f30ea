use crate::ast::{AstNode, AstNodeList, Tag, Variable};

/// A scanner for the two placeholder forms of a translated message:
/// `{{name}}` and `<name>content</name>`.
///
/// The input is walked left to right. At every position a tag is tried, then
/// a variable; when neither matches, the character is literal text. Names are
/// one or more ASCII word characters (`[A-Za-z0-9_]`).
///
/// Tag content is the shortest span up to the first closing tag with the same
/// name, and may not cross a line break. Tags of different names nest; a tag
/// nested inside one of the *same* name is not supported: the inner closer
/// ends the outer tag, so `<b>a <b>c</b></b>` yields a `b` tag with content
/// `a <b>c` followed by the literal text `</b>`.
pub struct Parser<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser { input, position: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consumes the current character and advances the position.
    /// Returns the character that was consumed, or None if at the end of input.
    fn consume(&mut self) -> Option<char> {
        let c = self.peek();
        if let Some(c) = c {
            self.position += c.len_utf8();
        }
        c
    }

    /// Consumes at least one character, then everything up to the next
    /// character that could open a placeholder.
    fn parse_text(&mut self) -> &'a str {
        let start = self.position;
        self.consume();
        while let Some(c) = self.peek() {
            if c == '<' || c == '{' {
                break;
            }
            self.consume();
        }
        &self.input[start..self.position]
    }

    fn parse_variable(&mut self) -> Option<AstNode> {
        let inner = self.rest().strip_prefix("{{")?;
        let name_len = word_len(inner);
        if name_len == 0 || !inner[name_len..].starts_with("}}") {
            return None;
        }

        let name = &inner[..name_len];
        self.position += name_len + 4;
        Some(AstNode::Variable(Variable::new(name)))
    }

    fn parse_tag(&mut self) -> Option<AstNode> {
        let rest = self.rest();
        let after_open = rest.strip_prefix('<')?;
        let name_len = word_len(after_open);
        if name_len == 0 || !after_open[name_len..].starts_with('>') {
            return None;
        }

        let name = &after_open[..name_len];
        let content_start = name_len + 2;
        let closer = format!("</{}>", name);
        let body = &rest[content_start..];
        let content_len = body.find(&closer)?;
        let content = &body[..content_len];
        if content.contains(is_line_terminator) {
            return None;
        }

        self.position += content_start + content_len + closer.len();
        let children = Parser::new(content).parse();
        Some(AstNode::Tag(Tag::new(name, content, children)))
    }

    pub fn parse(&mut self) -> AstNodeList {
        let mut ast = AstNodeList::new();
        while self.position < self.input.len() {
            let node = match self.peek() {
                Some('<') => self.parse_tag(),
                Some('{') => self.parse_variable(),
                _ => None,
            };
            match node {
                Some(node) => ast.push(node),
                None => {
                    let text = self.parse_text();
                    ast.push_text(text);
                }
            }
        }
        ast
    }
}

fn word_len(input: &str) -> usize {
    input
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
        .count()
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

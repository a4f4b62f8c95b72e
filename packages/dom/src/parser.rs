//! Tolerant tree builder
//!
//! Builds detached nodes from markup. Never fails: unmatched closing tags are
//! dropped, unclosed elements are closed at end of input, and anything the
//! tokenizer cannot classify becomes text.

use crate::lexer::{close_tag_name, split_open_tag, AttrToken, Token};
use crate::node::{Attribute, ElementData, NodeId, NodeKind};
use crate::{is_raw_text_element, is_void_element, Document};
use logos::Logos;

pub(crate) struct TreeBuilder<'src, 'doc> {
    lexer: logos::Lexer<'src, Token<'src>>,
    doc: &'doc mut Document,
    /// Open elements, innermost last
    stack: Vec<NodeId>,
    /// Top-level nodes produced so far
    roots: Vec<NodeId>,
    /// Container the top-level nodes are appended to, if any
    container: Option<NodeId>,
}

impl<'src, 'doc> TreeBuilder<'src, 'doc> {
    pub(crate) fn new(source: &'src str, doc: &'doc mut Document) -> Self {
        Self {
            lexer: Token::lexer(source),
            doc,
            stack: Vec::new(),
            roots: Vec::new(),
            container: None,
        }
    }

    /// Append top-level nodes to `container` instead of leaving them detached
    pub(crate) fn into_container(mut self, container: NodeId) -> Self {
        self.container = Some(container);
        self
    }

    pub(crate) fn build(mut self) -> Vec<NodeId> {
        while let Some(token) = self.lexer.next() {
            match token {
                Ok(Token::Text(text)) => self.push_text(text),
                Ok(Token::Lt) => self.push_text("<"),
                Ok(Token::Comment(slice)) => {
                    let body = &slice["<!--".len()..];
                    let content = body.strip_suffix("-->").unwrap_or(body);
                    self.push_node(NodeKind::Comment {
                        content: content.to_string(),
                    });
                }
                Ok(Token::Declaration(slice)) => {
                    self.push_node(NodeKind::Doctype {
                        content: slice[2..slice.len() - 1].to_string(),
                    });
                }
                Ok(Token::OpenTag(slice)) => self.open_tag(slice),
                Ok(Token::CloseTag(slice)) => self.close_tag(close_tag_name(slice)),
                Err(()) => {
                    let text = self.lexer.slice();
                    tracing::trace!(text, "unclassified markup kept as text");
                    self.push_text(text);
                }
            }
        }
        self.roots
    }

    fn current(&self) -> Option<NodeId> {
        self.stack.last().copied().or(self.container)
    }

    fn push_node(&mut self, kind: NodeKind) -> NodeId {
        let id = self.doc.alloc(kind);
        self.attach(id);
        id
    }

    fn attach(&mut self, id: NodeId) {
        if let Some(parent) = self.current() {
            self.doc.link_child(parent, id);
        }
        if self.stack.is_empty() {
            self.roots.push(id);
        }
    }

    /// Append text, merging with a directly preceding text node
    fn push_text(&mut self, text: &str) {
        let previous = match self.current() {
            Some(parent) => self.doc.nodes[parent.0].children.last().copied(),
            None => self.roots.last().copied(),
        };
        if let Some(prev) = previous {
            if let NodeKind::Text { content } = &mut self.doc.nodes[prev.0].kind {
                content.push_str(text);
                return;
            }
        }
        self.push_node(NodeKind::Text {
            content: text.to_string(),
        });
    }

    fn open_tag(&mut self, slice: &str) {
        let (name, attr_source, self_closing) = split_open_tag(slice);
        let mut data = ElementData::new(name);
        data.attributes = parse_attributes(attr_source);
        let tag = data.tag.clone();
        let id = self.push_node(NodeKind::Element(data));

        if is_void_element(&tag) || self_closing {
            return;
        }

        if is_raw_text_element(&tag) {
            self.read_raw_text(id, &tag);
            return;
        }

        self.stack.push(id);
    }

    /// Consume everything up to `</tag>` as a single text child
    fn read_raw_text(&mut self, element: NodeId, tag: &str) {
        let rest = self.lexer.remainder();
        let closing = format!("</{}", tag);
        let (content_len, consumed) = match find_ascii_case_insensitive(rest, &closing) {
            Some(start) => {
                let after = &rest[start..];
                let close_len = after.find('>').map(|i| i + 1).unwrap_or(after.len());
                (start, start + close_len)
            }
            None => (rest.len(), rest.len()),
        };
        if content_len > 0 {
            let text = self.doc.alloc(NodeKind::Text {
                content: rest[..content_len].to_string(),
            });
            self.doc.link_child(element, text);
        }
        self.lexer.bump(consumed);
    }

    fn close_tag(&mut self, name: &str) {
        let name = name.to_ascii_lowercase();
        let position = self
            .stack
            .iter()
            .rposition(|id| self.doc.nodes[id.0].tag_name() == Some(name.as_str()));
        match position {
            Some(index) => self.stack.truncate(index),
            None => tracing::trace!(tag = %name, "dropping unmatched closing tag"),
        }
    }
}

pub(crate) fn parse_attributes(source: &str) -> Vec<Attribute> {
    let mut attributes: Vec<Attribute> = Vec::new();
    let mut lexer = AttrToken::lexer(source);
    let mut pending: Option<String> = None;
    let mut expecting_value = false;

    while let Some(token) = lexer.next() {
        match token {
            Ok(AttrToken::Equals) if pending.is_some() => expecting_value = true,
            Ok(AttrToken::Bare(value))
            | Ok(AttrToken::DoubleQuoted(value))
            | Ok(AttrToken::SingleQuoted(value))
                if expecting_value =>
            {
                if let Some(name) = pending.take() {
                    push_attribute(&mut attributes, Attribute::new(name, value));
                }
                expecting_value = false;
            }
            Ok(AttrToken::Bare(name)) => {
                if let Some(previous) = pending.take() {
                    push_attribute(&mut attributes, Attribute::boolean(previous));
                }
                pending = Some(name.to_ascii_lowercase());
            }
            _ => {}
        }
    }

    if let Some(name) = pending {
        push_attribute(&mut attributes, Attribute::boolean(name));
    }
    attributes
}

/// First occurrence wins, as in HTML
fn push_attribute(attributes: &mut Vec<Attribute>, attribute: Attribute) {
    if !attributes.iter().any(|a| a.name == attribute.name) {
        attributes.push(attribute);
    }
}

fn find_ascii_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    let hay = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.len() > hay.len() {
        return None;
    }
    (0..=hay.len() - needle.len()).find(|&i| hay[i..i + needle.len()].eq_ignore_ascii_case(needle))
}

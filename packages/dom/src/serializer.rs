//! Outer-HTML serialization
//!
//! Text is written back exactly as it was read, so parsing and serializing
//! untouched markup reproduces it (modulo attribute quoting and case).

use crate::node::{NodeId, NodeKind};
use crate::{is_void_element, Document, DomError, DomResult};

/// Serializes nodes of a [`Document`], optionally skipping some tags
pub struct Serializer<'doc> {
    doc: &'doc Document,
    skip_tags: Vec<String>,
}

impl<'doc> Serializer<'doc> {
    pub fn new(doc: &'doc Document) -> Self {
        Self {
            doc,
            skip_tags: Vec::new(),
        }
    }

    /// Leave out every element with this tag (and its content)
    pub fn skip_tag(mut self, tag: impl Into<String>) -> Self {
        self.skip_tags.push(tag.into().to_ascii_lowercase());
        self
    }

    pub fn outer_html(&self, id: NodeId) -> DomResult<String> {
        let mut buffer = String::new();
        self.write_node(id, &mut buffer)?;
        Ok(buffer)
    }

    pub fn inner_html(&self, id: NodeId) -> DomResult<String> {
        let node = self.doc.node(id).ok_or(DomError::NodeNotFound(id))?;
        let mut buffer = String::new();
        for child in node.children() {
            self.write_node(*child, &mut buffer)?;
        }
        Ok(buffer)
    }

    fn write_node(&self, id: NodeId, buffer: &mut String) -> DomResult<()> {
        let node = self.doc.node(id).ok_or(DomError::NodeNotFound(id))?;
        match &node.kind {
            NodeKind::Document => {
                for child in node.children() {
                    self.write_node(*child, buffer)?;
                }
            }
            NodeKind::Doctype { content } => {
                buffer.push_str("<!");
                buffer.push_str(content);
                buffer.push('>');
            }
            NodeKind::Text { content } => buffer.push_str(content),
            NodeKind::Comment { content } => {
                buffer.push_str("<!--");
                buffer.push_str(content);
                buffer.push_str("-->");
            }
            NodeKind::Element(data) => {
                if self.skip_tags.iter().any(|tag| *tag == data.tag) {
                    return Ok(());
                }
                buffer.push('<');
                buffer.push_str(&data.tag);
                for attr in &data.attributes {
                    buffer.push(' ');
                    buffer.push_str(&attr.name);
                    if let Some(value) = &attr.value {
                        buffer.push_str("=\"");
                        buffer.push_str(&escape_attribute(value));
                        buffer.push('"');
                    }
                }
                buffer.push('>');
                if is_void_element(&data.tag) {
                    return Ok(());
                }
                for child in node.children() {
                    self.write_node(*child, buffer)?;
                }
                buffer.push_str("</");
                buffer.push_str(&data.tag);
                buffer.push('>');
            }
        }
        Ok(())
    }
}

fn escape_attribute(value: &str) -> String {
    value.replace('"', "&quot;")
}

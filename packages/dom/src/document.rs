//! # Document Arena
//!
//! Owns every node ever created for a page: the attached tree under the root
//! plus any detached nodes (parsed fragments, replaced elements). Detached
//! nodes keep their subtree, so re-inserting one restores it as it was.

use crate::node::{ElementData, Node, NodeId, NodeKind, NodeSnapshot};
use crate::parser::TreeBuilder;
use crate::{DomError, DomResult, Selector, Serializer};

#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) nodes: Vec<Node>,
    root: NodeId,
    base_uri: String,
}

impl Document {
    /// Create an empty document (just the root container)
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Document)],
            root: NodeId(0),
            base_uri: String::from("about:blank"),
        }
    }

    /// Parse a whole page. Never fails; see [`crate::parser`] for recovery rules.
    pub fn parse(source: &str) -> Self {
        let mut doc = Self::new();
        let root = doc.root;
        let built = TreeBuilder::new(source, &mut doc).into_container(root).build();
        tracing::debug!(top_level = built.len(), nodes = doc.nodes.len(), "parsed document");
        doc
    }

    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = base_uri.into();
        self
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    pub fn set_base_uri(&mut self, base_uri: impl Into<String>) {
        self.base_uri = base_uri.into();
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(kind));
        id
    }

    /// Append without any checks; only for freshly allocated children
    pub(crate) fn link_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Parse markup into new detached nodes, in source order
    pub fn parse_fragment(&mut self, markup: &str) -> Vec<NodeId> {
        TreeBuilder::new(markup, self).build()
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeKind::Element(ElementData::new(tag)))
    }

    pub fn create_text(&mut self, content: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Text {
            content: content.into(),
        })
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn node_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.nodes.get_mut(id.0).ok_or(DomError::NodeNotFound(id))
    }

    fn element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        self.node_mut(id)?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(id))
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.node(id).and_then(Node::as_element)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(Node::parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(Node::children).unwrap_or(&[])
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.node(id).and_then(Node::tag_name)
    }

    /// DOM-style `nodeName`, lowercased: the tag for elements, `#text` etc. otherwise
    pub fn node_name(&self, id: NodeId) -> String {
        match self.node(id).map(|n| &n.kind) {
            Some(NodeKind::Element(data)) => data.tag.clone(),
            Some(NodeKind::Text { .. }) => "#text".to_string(),
            Some(NodeKind::Comment { .. }) => "#comment".to_string(),
            Some(NodeKind::Doctype { .. }) => "#doctype".to_string(),
            Some(NodeKind::Document) | None => "#document".to_string(),
        }
    }

    /// Whether the node is connected to the document root
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(node) = cursor {
            if node == self.root {
                return true;
            }
            cursor = self.parent(node);
        }
        false
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(node) = cursor {
            if node == ancestor {
                return true;
            }
            cursor = self.parent(node);
        }
        false
    }

    /// The `<html>` element, if the page has one
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(self.root)
            .iter()
            .copied()
            .find(|id| self.tag_name(*id) == Some("html"))
    }

    pub fn body(&self) -> Option<NodeId> {
        self.descendants(self.root)
            .find(|id| self.tag_name(*id) == Some("body"))
    }

    /// Remove a node from its parent; a no-op for already detached nodes
    pub fn detach(&mut self, id: NodeId) -> DomResult<()> {
        let parent = self.node(id).ok_or(DomError::NodeNotFound(id))?.parent;
        if let Some(parent) = parent {
            self.nodes[parent.0].children.retain(|child| *child != id);
            self.nodes[id.0].parent = None;
        }
        Ok(())
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.node(parent).ok_or(DomError::NodeNotFound(parent))?;
        if self.is_ancestor_or_self(child, parent) {
            return Err(DomError::CycleDetected);
        }
        self.detach(child)?;
        self.link_child(parent, child);
        Ok(())
    }

    /// Insert `nodes` in order immediately before `reference`
    pub fn insert_before(&mut self, reference: NodeId, nodes: &[NodeId]) -> DomResult<()> {
        let parent = self
            .node(reference)
            .ok_or(DomError::NodeNotFound(reference))?
            .parent
            .ok_or(DomError::Detached(reference))?;
        let nodes: Vec<NodeId> = nodes.iter().copied().filter(|node| *node != reference).collect();
        for node in &nodes {
            self.node(*node).ok_or(DomError::NodeNotFound(*node))?;
            if self.is_ancestor_or_self(*node, parent) {
                return Err(DomError::CycleDetected);
            }
        }
        for node in &nodes {
            self.detach(*node)?;
            let index = self.index_in_parent(reference).unwrap_or(0);
            self.nodes[parent.0].children.insert(index, *node);
            self.nodes[node.0].parent = Some(parent);
        }
        Ok(())
    }

    fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|child| *child == id)
    }

    /// Replace `target` with `replacement`, like jQuery's `replaceWith`
    ///
    /// Replacement nodes are moved out of wherever they currently are. The
    /// target ends up detached (its handle stays valid). Replacing a node with
    /// itself is a no-op.
    pub fn replace_with(&mut self, target: NodeId, replacement: &[NodeId]) -> DomResult<()> {
        if replacement == [target] {
            self.node(target).ok_or(DomError::NodeNotFound(target))?;
            return Ok(());
        }
        self.insert_before(target, replacement)?;
        self.detach(target)
    }

    /// Replace a run of sibling nodes (`targets[0]` marks the position)
    pub fn replace_nodes(&mut self, targets: &[NodeId], replacement: &[NodeId]) -> DomResult<()> {
        let Some((first, rest)) = targets.split_first() else {
            return Ok(());
        };
        for node in rest {
            if !replacement.contains(node) {
                self.detach(*node)?;
            }
        }
        self.replace_with(*first, replacement)
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) -> DomResult<()> {
        let element = self.element_mut(id)?;
        if element.has_class(class) {
            return Ok(());
        }
        let classes = match element.attribute("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
            _ => class.to_string(),
        };
        element.set_attribute("class", classes);
        Ok(())
    }

    /// Remove a class; drops the `class` attribute entirely once it is empty
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> DomResult<()> {
        let element = self.element_mut(id)?;
        if !element.has_class(class) {
            return Ok(());
        }
        let remaining: Vec<String> = element
            .classes()
            .filter(|c| *c != class)
            .map(str::to_string)
            .collect();
        if remaining.is_empty() {
            element.remove_attribute("class");
        } else {
            let joined = remaining.join(" ");
            element.set_attribute("class", joined);
        }
        Ok(())
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|el| el.has_class(class))
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.attribute(name))
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> DomResult<()> {
        self.element_mut(id)?.set_attribute(name, value);
        Ok(())
    }

    /// Detach every descendant element with the given tag; returns how many
    pub fn remove_descendants_by_tag(&mut self, id: NodeId, tag: &str) -> DomResult<usize> {
        self.node(id).ok_or(DomError::NodeNotFound(id))?;
        let tag = tag.to_ascii_lowercase();
        let doomed: Vec<NodeId> = self
            .descendants(id)
            .filter(|node| *node != id && self.tag_name(*node) == Some(tag.as_str()))
            .collect();
        for node in &doomed {
            self.detach(*node)?;
        }
        Ok(doomed.len())
    }

    /// Depth-first, document-order walk starting at (and including) `id`
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let stack = if self.node(id).is_some() { vec![id] } else { Vec::new() };
        Descendants { doc: self, stack }
    }

    pub fn select_first(&self, selector: &str) -> DomResult<Option<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .descendants(self.root)
            .find(|id| selector.matches(self, *id)))
    }

    pub fn select_all(&self, selector: &str) -> DomResult<Vec<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .descendants(self.root)
            .filter(|id| selector.matches(self, *id))
            .collect())
    }

    /// jQuery-style `is(selector)`
    pub fn is(&self, id: NodeId, selector: &str) -> DomResult<bool> {
        Ok(Selector::parse(selector)?.matches(self, id))
    }

    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .filter_map(|node| match &self.nodes[node.0].kind {
                NodeKind::Text { content } => Some(content.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn outer_html(&self, id: NodeId) -> DomResult<String> {
        Serializer::new(self).outer_html(id)
    }

    /// Serialize a run of nodes back to back
    pub fn fragment_html(&self, nodes: &[NodeId]) -> DomResult<String> {
        let serializer = Serializer::new(self);
        nodes
            .iter()
            .map(|node| serializer.outer_html(*node))
            .collect()
    }

    /// Serialize the whole page
    pub fn to_html(&self) -> String {
        self.children(self.root)
            .iter()
            .filter_map(|child| self.outer_html(*child).ok())
            .collect()
    }

    pub fn snapshot(&self, id: NodeId) -> NodeSnapshot {
        let mut path = Vec::new();
        let mut cursor = id;
        let mut attached = cursor == self.root;
        while let Some(parent) = self.parent(cursor) {
            path.push(self.index_in_parent(cursor).unwrap_or(0));
            cursor = parent;
            attached = cursor == self.root;
        }
        if !attached {
            path.clear();
        }
        path.reverse();
        NodeSnapshot {
            node: id,
            tag: self.tag_name(id).map(str::to_string),
            path,
            attached,
        }
    }

    /// Number of nodes ever allocated (attached or not)
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator returned by [`Document::descendants`]
pub struct Descendants<'doc> {
    doc: &'doc Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Document {
        Document::parse("<html><body><div id=\"a\"><p>one</p><p>two</p></div></body></html>")
    }

    #[test]
    fn test_replace_with_keeps_handle_valid() {
        let mut doc = page();
        let div = doc.select_first("#a").unwrap().unwrap();
        let fresh = doc.parse_fragment("<h1>new</h1>");
        doc.replace_with(div, &fresh).unwrap();

        assert!(!doc.is_attached(div));
        assert_eq!(doc.to_html(), "<html><body><h1>new</h1></body></html>");

        doc.replace_with(fresh[0], &[div]).unwrap();
        assert_eq!(
            doc.to_html(),
            "<html><body><div id=\"a\"><p>one</p><p>two</p></div></body></html>"
        );
    }

    #[test]
    fn test_replace_with_self_is_noop() {
        let mut doc = page();
        let div = doc.select_first("#a").unwrap().unwrap();
        let before = doc.to_html();
        doc.replace_with(div, &[div]).unwrap();
        assert_eq!(doc.to_html(), before);
    }

    #[test]
    fn test_replace_detached_target_fails() {
        let mut doc = page();
        let loose = doc.create_element("span");
        let fresh = doc.parse_fragment("<b>x</b>");
        assert_eq!(doc.replace_with(loose, &fresh), Err(DomError::Detached(loose)));
    }

    #[test]
    fn test_replace_with_ancestor_is_cycle() {
        let mut doc = page();
        let div = doc.select_first("#a").unwrap().unwrap();
        let p = doc.select_first("p").unwrap().unwrap();
        assert_eq!(doc.replace_with(p, &[div]), Err(DomError::CycleDetected));
    }

    #[test]
    fn test_replace_nodes_multi_target() {
        let mut doc = page();
        let div = doc.select_first("#a").unwrap().unwrap();
        let pair = doc.parse_fragment("<i>1</i><i>2</i>");
        doc.replace_with(div, &pair).unwrap();
        doc.replace_nodes(&pair, &[div]).unwrap();
        assert_eq!(
            doc.to_html(),
            "<html><body><div id=\"a\"><p>one</p><p>two</p></div></body></html>"
        );
    }

    #[test]
    fn test_class_roundtrip() {
        let mut doc = page();
        let div = doc.select_first("#a").unwrap().unwrap();
        doc.add_class(div, "marker").unwrap();
        doc.add_class(div, "marker").unwrap();
        assert_eq!(doc.attribute(div, "class"), Some("marker"));
        doc.remove_class(div, "marker").unwrap();
        assert_eq!(doc.attribute(div, "class"), None);
    }

    #[test]
    fn test_add_class_to_text_fails() {
        let mut doc = Document::new();
        let text = doc.create_text("hi");
        assert_eq!(doc.add_class(text, "x"), Err(DomError::NotAnElement(text)));
    }

    #[test]
    fn test_remove_descendants_by_tag() {
        let mut doc = Document::parse("<div><script>x()</script><p><script>y()</script></p></div>");
        let div = doc.select_first("div").unwrap().unwrap();
        assert_eq!(doc.remove_descendants_by_tag(div, "SCRIPT").unwrap(), 2);
        assert_eq!(doc.outer_html(div).unwrap(), "<div><p></p></div>");
    }

    #[test]
    fn test_snapshot_path() {
        let doc = page();
        let second = doc.select_all("p").unwrap()[1];
        let snapshot = doc.snapshot(second);
        assert!(snapshot.attached);
        assert_eq!(snapshot.path, vec![0, 0, 0, 1]);
        assert_eq!(snapshot.tag.as_deref(), Some("p"));
    }

    #[test]
    fn test_snapshot_detached() {
        let mut doc = page();
        let loose = doc.parse_fragment("<p><b>x</b></p>");
        let bold = doc.children(loose[0])[0];
        let snapshot = doc.snapshot(bold);
        assert!(!snapshot.attached);
        assert!(snapshot.path.is_empty());
    }

    #[test]
    fn test_body_and_document_element() {
        let doc = page();
        assert_eq!(doc.tag_name(doc.body().unwrap()), Some("body"));
        assert_eq!(doc.tag_name(doc.document_element().unwrap()), Some("html"));
        assert!(doc.is(doc.body().unwrap(), "html, body").unwrap());
    }
}

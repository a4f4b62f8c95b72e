//! Markup to content conversion for element replacement.

use remix_dom::{Document, NodeId};

/// Tag used to wrap bare text and to stand in for empty content
pub const INLINE_CONTAINER: &str = "span";

/// Class of the invisible placeholder left behind by a deletion
pub const DELETED_CLASS: &str = "webxray-deleted";

/// Parse `markup` into detached nodes ready to be swapped into the page
///
/// - `""` becomes one empty `<span>`
/// - markup not starting with `<` is wrapped in a `<span>`
/// - anything else is parsed as-is
///
/// The result is never empty: markup that parses to nothing (a stray
/// closing tag, say) also becomes an empty `<span>`.
pub fn html_to_fragment(doc: &mut Document, markup: &str) -> Vec<NodeId> {
    if markup.is_empty() {
        return vec![doc.create_element(INLINE_CONTAINER)];
    }

    let nodes = if markup.starts_with('<') {
        doc.parse_fragment(markup)
    } else {
        doc.parse_fragment(&format!("<{0}>{1}</{0}>", INLINE_CONTAINER, markup))
    };

    if nodes.is_empty() {
        tracing::debug!(markup, "markup produced no nodes, using an empty container");
        return vec![doc.create_element(INLINE_CONTAINER)];
    }
    nodes
}

/// Placeholder markup that keeps a deleted element's position in the page
pub(crate) fn deletion_placeholder() -> String {
    format!("<{0} class=\"{1}\"></{0}>", INLINE_CONTAINER, DELETED_CLASS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(doc: &Document, nodes: &[NodeId]) -> String {
        doc.fragment_html(nodes).unwrap()
    }

    #[test]
    fn test_empty_markup_is_empty_container() {
        let mut doc = Document::new();
        let nodes = html_to_fragment(&mut doc, "");
        assert_eq!(nodes.len(), 1);
        assert_eq!(render(&doc, &nodes), "<span></span>");
    }

    #[test]
    fn test_bare_text_is_wrapped() {
        let mut doc = Document::new();
        let nodes = html_to_fragment(&mut doc, "hello <b>there</b>");
        assert_eq!(nodes.len(), 1);
        assert_eq!(doc.tag_name(nodes[0]), Some("span"));
        assert_eq!(render(&doc, &nodes), "<span>hello <b>there</b></span>");
    }

    #[test]
    fn test_leading_whitespace_counts_as_text() {
        let mut doc = Document::new();
        let nodes = html_to_fragment(&mut doc, " <p>x</p>");
        assert_eq!(render(&doc, &nodes), "<span> <p>x</p></span>");
    }

    #[test]
    fn test_markup_is_parsed_as_is() {
        let mut doc = Document::new();
        let nodes = html_to_fragment(&mut doc, "<p>one</p><p>two</p>");
        assert_eq!(nodes.len(), 2);
        assert_eq!(render(&doc, &nodes), "<p>one</p><p>two</p>");
    }

    #[test]
    fn test_markup_without_nodes_falls_back_to_container() {
        let mut doc = Document::new();
        let nodes = html_to_fragment(&mut doc, "</div>");
        assert_eq!(render(&doc, &nodes), "<span></span>");
    }

    #[test]
    fn test_deletion_placeholder() {
        assert_eq!(deletion_placeholder(), "<span class=\"webxray-deleted\"></span>");
    }
}

//! Minimal selector engine
//!
//! Supports type, `.class`, `#id` and `*` simple selectors, compound
//! selectors (`div.card#main`), the descendant combinator (whitespace) and
//! selector lists (`html, body`). Enough to focus an element from the command
//! line and to express "is this the root or the body".

use crate::node::{ElementData, NodeId};
use crate::{Document, DomError, DomResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// Alternatives of a selector list; each is a descendant chain
    groups: Vec<Vec<Compound>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn matches(&self, element: &ElementData) -> bool {
        if let Some(tag) = &self.tag {
            if *tag != element.tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.attribute("id") != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|class| element.has_class(class))
    }
}

impl Selector {
    pub fn parse(source: &str) -> DomResult<Self> {
        let mut groups = Vec::new();
        for group in source.split(',') {
            let chain = group
                .split_ascii_whitespace()
                .map(|part| parse_compound(part).ok_or_else(|| DomError::invalid_selector(source)))
                .collect::<DomResult<Vec<_>>>()?;
            if chain.is_empty() {
                return Err(DomError::invalid_selector(source));
            }
            groups.push(chain);
        }
        Ok(Self { groups })
    }

    pub fn matches(&self, doc: &Document, id: NodeId) -> bool {
        self.groups.iter().any(|chain| chain_matches(chain, doc, id))
    }
}

fn chain_matches(chain: &[Compound], doc: &Document, id: NodeId) -> bool {
    let Some((last, ancestors)) = chain.split_last() else {
        return false;
    };
    let matches_element = |node: NodeId, compound: &Compound| {
        doc.node(node)
            .and_then(|n| n.as_element())
            .is_some_and(|el| compound.matches(el))
    };
    if !matches_element(id, last) {
        return false;
    }

    // Descendant combinators only, so matching ancestors greedily is exact
    let mut remaining = ancestors.iter().rev().peekable();
    let mut cursor = doc.parent(id);
    while let (Some(compound), Some(node)) = (remaining.peek(), cursor) {
        if matches_element(node, compound) {
            remaining.next();
        }
        cursor = doc.parent(node);
    }
    remaining.peek().is_none()
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn parse_compound(source: &str) -> Option<Compound> {
    let mut compound = Compound::default();
    let mut chars = source.char_indices().peekable();

    let read_ident = |start: usize, chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>| {
        let mut end = start;
        while let Some(&(i, c)) = chars.peek() {
            if !is_ident_char(c) {
                break;
            }
            end = i + c.len_utf8();
            chars.next();
        }
        (end > start).then(|| source[start..end].to_string())
    };

    match chars.peek() {
        Some(&(_, '*')) => {
            chars.next();
        }
        Some(&(i, c)) if is_ident_char(c) => {
            compound.tag = Some(read_ident(i, &mut chars)?.to_ascii_lowercase());
        }
        _ => {}
    }

    while let Some((i, c)) = chars.next() {
        let value = read_ident(i + c.len_utf8(), &mut chars)?;
        match c {
            '.' => compound.classes.push(value),
            '#' => compound.id = Some(value),
            _ => return None,
        }
    }

    Some(compound)
}

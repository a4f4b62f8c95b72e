//! # Remix DOM
//!
//! A small document model for single-element editing.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ lexer: markup text → tokens (logos)         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ parser: tokens → detached nodes             │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ document: arena of nodes + tree mutations   │
//! │  - replace / detach / insert                │
//! │  - classes, attributes, selectors           │
//! │  - positional snapshots                     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ serializer: nodes → outer HTML              │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Node handles
//!
//! Every node lives in the arena owned by its [`Document`]. A [`NodeId`] stays
//! valid for the lifetime of the document, even after the node has been
//! detached from the tree. That is what lets an undo step put a replaced
//! element back exactly as it was.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use remix_dom::Document;
//!
//! let mut doc = Document::parse("<html><body><p>Hi</p></body></html>");
//! let p = doc.select_first("p")?.unwrap();
//! let fragment = doc.parse_fragment("<h1>Hello</h1>");
//! doc.replace_with(p, &fragment)?;
//! assert_eq!(doc.to_html(), "<html><body><h1>Hello</h1></body></html>");
//! ```

mod document;
mod error;
mod lexer;
mod node;
mod parser;
mod selector;
mod serializer;


pub use document::{Descendants, Document};
pub use error::{DomError, DomResult};
pub use node::{Attribute, ElementData, Node, NodeId, NodeKind, NodeSnapshot};
pub use selector::Selector;
pub use serializer::Serializer;

/// Elements that never have children or a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose content is raw text up to the matching closing tag.
pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

pub fn is_raw_text_element(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag)
}

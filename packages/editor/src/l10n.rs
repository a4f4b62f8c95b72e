//! # Localization
//!
//! Lookup of user-facing strings by key. The editor only ever asks for the
//! keys in [`keys`]; a [`BundledStrings`] table ships the English defaults and
//! accepts per-key overrides (e.g. from configuration).

use std::collections::HashMap;

/// Every key the editor looks up
pub mod keys {
    pub const EXECUTED: &str = "command-manager:executed";
    pub const UNDID: &str = "command-manager:undid";
    pub const REDID: &str = "command-manager:redid";
    pub const CANNOT_UNDO_HTML: &str = "cannot-undo-html";
    pub const CANNOT_REDO_HTML: &str = "cannot-redo-html";
    pub const TOO_BIG_TO_CHANGE: &str = "too-big-to-change";
    pub const TOO_BIG_TO_REMIX_HTML: &str = "too-big-to-remix-html";
    pub const DELETION: &str = "deletion";
    pub const REPLACEMENT: &str = "replacement";

    pub const ALL: [&str; 9] = [
        EXECUTED,
        UNDID,
        REDID,
        CANNOT_UNDO_HTML,
        CANNOT_REDO_HTML,
        TOO_BIG_TO_CHANGE,
        TOO_BIG_TO_REMIX_HTML,
        DELETION,
        REPLACEMENT,
    ];
}

pub trait Localizer {
    fn get(&self, key: &str) -> String;
}

/// String table with English defaults
#[derive(Debug, Clone)]
pub struct BundledStrings {
    strings: HashMap<String, String>,
}

impl BundledStrings {
    pub fn english() -> Self {
        let strings = [
            (keys::EXECUTED, "Executed"),
            (keys::UNDID, "Undid"),
            (keys::REDID, "Redid"),
            (keys::CANNOT_UNDO_HTML, "<span>Nothing left to undo!</span>"),
            (keys::CANNOT_REDO_HTML, "<span>Nothing left to redo!</span>"),
            (keys::TOO_BIG_TO_CHANGE, "This element is too big to change."),
            (
                keys::TOO_BIG_TO_REMIX_HTML,
                "<div>The &lt;${tagName}&gt; element you've selected is too big to remix. \
                 Try selecting a smaller element.</div>",
            ),
            (keys::DELETION, "deletion"),
            (keys::REPLACEMENT, "replacement"),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
        Self { strings }
    }

    /// Replace individual strings; unknown keys are kept too
    pub fn with_overrides(mut self, overrides: HashMap<String, String>) -> Self {
        self.strings.extend(overrides);
        self
    }
}

impl Default for BundledStrings {
    fn default() -> Self {
        Self::english()
    }
}

impl Localizer for BundledStrings {
    /// Missing keys come back as the key itself
    fn get(&self, key: &str) -> String {
        match self.strings.get(key) {
            Some(value) => value.clone(),
            None => {
                tracing::warn!(key, "missing localized string");
                key.to_string()
            }
        }
    }
}

/// Substitute the first `${name}` placeholder in `template`
pub fn render_template(template: &str, name: &str, value: &str) -> String {
    template.replacen(&format!("${{{}}}", name), value, 1)
}

//! # Editor Wire Messages
//!
//! JSON exchanged with the embedded editor.
//!
//! Outbound, once when the editor has loaded:
//!
//! ```json
//! {"startHTML": "<p>…</p>" | {"html": "…", "selector": ".…"}, "mods": …, "baseURI": "…"}
//! ```
//!
//! Inbound, two accepted encodings:
//!
//! ```json
//! {"type": "preview" | "commit" | "cancel", "endHTML": "…", "canceled": false}
//! {"msg": "ok" | <other>, "endHTML": "…", "finished": true, "canceled": false}
//! ```
//!
//! A message carrying a `msg` field is always read as the legacy form, where
//! `msg == "ok"` means preview or commit (by a truthy `finished`) and any
//! other `msg` means cancel. Otherwise a `type` field selects the tagged
//! form, and a message with neither is a cancel.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

const NO_BREAK_SPACE: char = '\u{a0}';

#[derive(Error, Debug)]
pub enum MessageError {
    #[error("Message is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("\"ok\" message without endHTML")]
    MissingEndHtml,
}

/// A decoded inbound editor message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EditorMessage {
    /// Show `end_html` live without recording it
    Preview {
        #[serde(rename = "endHTML")]
        end_html: String,
    },

    /// Record `end_html` as the session's one command
    Commit {
        #[serde(rename = "endHTML")]
        end_html: String,
    },

    /// Abandon the session
    Cancel {
        #[serde(default)]
        canceled: bool,
    },
}

#[derive(Deserialize)]
struct LegacyMessage {
    #[serde(default)]
    msg: Value,
    #[serde(rename = "endHTML", default)]
    end_html: Value,
    #[serde(default)]
    finished: Value,
    #[serde(default)]
    canceled: Value,
}

impl LegacyMessage {
    fn into_message(self) -> Result<EditorMessage, MessageError> {
        if self.msg.as_str() != Some("ok") {
            return Ok(EditorMessage::Cancel {
                canceled: is_truthy(&self.canceled),
            });
        }
        let end_html = match self.end_html {
            Value::String(end_html) => end_html,
            _ => return Err(MessageError::MissingEndHtml),
        };
        if is_truthy(&self.finished) {
            Ok(EditorMessage::Commit { end_html })
        } else {
            Ok(EditorMessage::Preview { end_html })
        }
    }
}

/// Loose truth test for flags set by editors that do not send booleans
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl EditorMessage {
    pub fn decode(raw: &str) -> Result<Self, MessageError> {
        let value: Value = serde_json::from_str(raw)?;

        let message = if value.get("type").is_some() && value.get("msg").is_none() {
            serde_json::from_value(value)?
        } else {
            serde_json::from_value::<LegacyMessage>(value)?.into_message()?
        };

        Ok(message.normalized())
    }

    /// Encode in the tagged form
    pub fn to_json(&self) -> Result<String, MessageError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn end_html(&self) -> Option<&str> {
        match self {
            EditorMessage::Preview { end_html } | EditorMessage::Commit { end_html } => Some(end_html),
            EditorMessage::Cancel { .. } => None,
        }
    }

    // Editors may turn ordinary spaces into non-breaking ones
    fn normalized(self) -> Self {
        match self {
            EditorMessage::Preview { end_html } => EditorMessage::Preview {
                end_html: end_html.replace(NO_BREAK_SPACE, " "),
            },
            EditorMessage::Commit { end_html } => EditorMessage::Commit {
                end_html: end_html.replace(NO_BREAK_SPACE, " "),
            },
            cancel => cancel,
        }
    }
}

/// Markup the editor starts from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StartHtml {
    /// Outer HTML of the element alone
    Fragment(String),

    /// The whole page, plus a selector locating the element in it
    Document { html: String, selector: String },
}

/// Initialization message posted to the editor once it has loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitMessage {
    #[serde(rename = "startHTML")]
    pub start_html: StartHtml,
    pub mods: Value,
    #[serde(rename = "baseURI")]
    pub base_uri: String,
}

impl InitMessage {
    pub fn to_json(&self) -> Result<String, MessageError> {
        Ok(serde_json::to_string(self)?)
    }
}

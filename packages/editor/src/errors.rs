//! Error types for the editor

use remix_dom::DomError;
use thiserror::Error;

use crate::message::MessageError;

#[derive(Error, Debug)]
pub enum RemixError {
    #[error("Document error: {0}")]
    Dom(#[from] DomError),

    #[error("History error: {0}")]
    History(#[from] HistoryError),

    #[error("Message error: {0}")]
    Message(#[from] MessageError),

    #[error("Host error: {0}")]
    Host(#[from] HostError),
}

/// Failures reported by a command history
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HistoryError {
    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    #[error("Command has no content to swap out")]
    EmptyReplacement,

    #[error("Command could not be applied: {0}")]
    Dom(#[from] DomError),
}

/// Failures reported by the editor embedding host
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    #[error("Editor could not be embedded: {0}")]
    EmbedFailed(String),
}

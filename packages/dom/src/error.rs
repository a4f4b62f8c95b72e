//! Error types for document operations

use crate::NodeId;
use thiserror::Error;

pub type DomResult<T> = Result<T, DomError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Node is not attached to a parent: {0}")]
    Detached(NodeId),

    #[error("Node is not an element: {0}")]
    NotAnElement(NodeId),

    #[error("Would create cycle")]
    CycleDetected,

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}

impl DomError {
    pub fn invalid_selector(selector: impl Into<String>) -> Self {
        Self::InvalidSelector(selector.into())
    }
}

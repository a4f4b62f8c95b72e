//! # Commands
//!
//! Undoable units of replacement recorded by a [`crate::CommandHistory`].
//!
//! ## Replacement semantics
//!
//! - Execute swaps `element_to_replace` out for `new_content`
//! - Undo swaps `new_content` back out for `element_to_replace`
//! - Both directions fire `before-replace` with the outgoing nodes and
//!   `after-replace` with the incoming nodes, so observers can animate
//!   either direction the same way
//! - Outgoing nodes must be attached; a command never emits events for a
//!   swap it cannot perform

use remix_dom::{Document, DomError, NodeId, NodeSnapshot};

use crate::events::Emitter;
use crate::HistoryError;

/// Payload of `before-replace` / `after-replace`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceEvent {
    /// Snapshots of the nodes leaving (before) or entering (after) the tree
    pub nodes: Vec<NodeSnapshot>,
}

impl ReplaceEvent {
    pub fn capture(doc: &Document, nodes: &[NodeId]) -> Self {
        Self {
            nodes: nodes.iter().map(|node| doc.snapshot(*node)).collect(),
        }
    }

    /// The node an overlay should be anchored to
    pub fn primary(&self) -> Option<&NodeSnapshot> {
        self.nodes.first()
    }
}

/// Lifecycle events one command emits while it executes
#[derive(Debug, Clone, Default)]
pub struct CommandEvents {
    pub before_replace: Emitter<ReplaceEvent>,
    pub after_replace: Emitter<ReplaceEvent>,
}

/// Payload of a history's `command-created` event
#[derive(Debug, Clone)]
pub struct CreatedCommand {
    pub name: String,
    pub events: CommandEvents,
}

/// What a command operated on, as reported back to callers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRecord {
    pub name: String,
    pub element_to_replace: NodeId,
    pub new_content: Vec<NodeId>,
}

/// Requests understood by [`crate::CommandHistory::run`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandRequest {
    /// Replace one node with a run of new nodes
    ReplaceWith {
        name: String,
        element_to_replace: NodeId,
        new_content: Vec<NodeId>,
    },
}

impl CommandRequest {
    pub fn name(&self) -> &str {
        match self {
            CommandRequest::ReplaceWith { name, .. } => name,
        }
    }

    /// Registry name of the command type
    pub fn kind(&self) -> &'static str {
        match self {
            CommandRequest::ReplaceWith { .. } => "ReplaceWithCmd",
        }
    }

    pub fn into_command(self) -> Box<dyn Command> {
        match self {
            CommandRequest::ReplaceWith {
                name,
                element_to_replace,
                new_content,
            } => Box::new(ReplaceWithCommand::new(name, element_to_replace, new_content)),
        }
    }
}

/// Trait for undoable commands
///
/// Each command type implements this trait to provide:
/// - Execute logic (also used for redo)
/// - Undo logic
/// - The events it fires while doing either
pub trait Command {
    /// Human-readable name shown in status text
    fn name(&self) -> &str;

    fn execute(&self, doc: &mut Document) -> Result<(), HistoryError>;

    fn undo(&self, doc: &mut Document) -> Result<(), HistoryError>;

    fn events(&self) -> &CommandEvents;

    fn record(&self) -> CommandRecord;
}

/// Swap one node for new content
#[derive(Debug)]
pub struct ReplaceWithCommand {
    name: String,
    element_to_replace: NodeId,
    new_content: Vec<NodeId>,
    events: CommandEvents,
}

impl ReplaceWithCommand {
    pub fn new(name: impl Into<String>, element_to_replace: NodeId, new_content: Vec<NodeId>) -> Self {
        Self {
            name: name.into(),
            element_to_replace,
            new_content,
            events: CommandEvents::default(),
        }
    }

    fn swap(&self, doc: &mut Document, outgoing: &[NodeId], incoming: &[NodeId]) -> Result<(), HistoryError> {
        let anchor = *outgoing.first().ok_or(HistoryError::EmptyReplacement)?;
        if doc.parent(anchor).is_none() {
            return Err(DomError::Detached(anchor).into());
        }

        self.events
            .before_replace
            .emit(&ReplaceEvent::capture(doc, outgoing));
        doc.replace_nodes(outgoing, incoming)?;
        self.events
            .after_replace
            .emit(&ReplaceEvent::capture(doc, incoming));
        Ok(())
    }
}

impl Command for ReplaceWithCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, doc: &mut Document) -> Result<(), HistoryError> {
        self.swap(doc, &[self.element_to_replace], &self.new_content)
    }

    fn undo(&self, doc: &mut Document) -> Result<(), HistoryError> {
        self.swap(doc, &self.new_content, &[self.element_to_replace])
    }

    fn events(&self) -> &CommandEvents {
        &self.events
    }

    fn record(&self) -> CommandRecord {
        CommandRecord {
            name: self.name.clone(),
            element_to_replace: self.element_to_replace,
            new_content: self.new_content.clone(),
        }
    }
}

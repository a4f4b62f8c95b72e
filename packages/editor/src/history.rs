//! # Command History
//!
//! Undo/redo stacks of executed [`Command`]s.
//!
//! ## Design
//!
//! - `run` builds a command from a [`CommandRequest`], announces it on
//!   `command-created`, then executes it
//! - Undo reverts the most recent command and moves it to the redo stack
//! - Redo re-executes it and moves it back
//! - New commands clear the redo stack
//! - A command that fails to undo or redo stays where it was
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = CommandManager::new();
//!
//! history.run(&mut doc, CommandRequest::ReplaceWith { .. })?;
//! history.undo(&mut doc)?;
//! history.redo(&mut doc)?;
//! ```

use remix_dom::Document;

use crate::command::{Command, CommandRecord, CommandRequest, CreatedCommand};
use crate::events::Emitter;
use crate::HistoryError;

/// The undo/redo history the orchestrator drives
pub trait CommandHistory {
    fn can_undo(&self) -> bool;

    fn can_redo(&self) -> bool;

    /// Revert the most recent command and return what it was
    fn undo(&mut self, doc: &mut Document) -> Result<CommandRecord, HistoryError>;

    /// Re-apply the most recently undone command
    fn redo(&mut self, doc: &mut Document) -> Result<CommandRecord, HistoryError>;

    /// Create, announce and execute a new command
    fn run(&mut self, doc: &mut Document, request: CommandRequest) -> Result<CommandRecord, HistoryError>;

    /// Fired once per command, before it first executes
    fn command_created(&self) -> &Emitter<CreatedCommand>;

    fn undo_levels(&self) -> usize;

    fn redo_levels(&self) -> usize;
}

/// In-memory command history
pub struct CommandManager {
    /// Executed commands (most recent last)
    undo_stack: Vec<Box<dyn Command>>,

    /// Undone commands (most recent last)
    redo_stack: Vec<Box<dyn Command>>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    command_created: Emitter<CreatedCommand>,
}

impl std::fmt::Debug for CommandManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandManager")
            .field("undo_levels", &self.undo_stack.len())
            .field("redo_levels", &self.redo_stack.len())
            .field("max_levels", &self.max_levels)
            .finish()
    }
}

impl CommandManager {
    /// Create a history with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            command_created: Emitter::new(),
        }
    }

    fn push(&mut self, command: Box<dyn Command>) {
        self.undo_stack.push(command);

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        self.redo_stack.clear();
    }

    /// Name of the command the next undo would revert
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|command| command.name())
    }

    /// Name of the command the next redo would re-apply
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|command| command.name())
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for CommandManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHistory for CommandManager {
    fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn undo(&mut self, doc: &mut Document) -> Result<CommandRecord, HistoryError> {
        let command = self.undo_stack.pop().ok_or(HistoryError::NothingToUndo)?;
        if let Err(err) = command.undo(doc) {
            self.undo_stack.push(command);
            return Err(err);
        }
        let record = command.record();
        self.redo_stack.push(command);
        tracing::debug!(command = %record.name, "undid command");
        Ok(record)
    }

    fn redo(&mut self, doc: &mut Document) -> Result<CommandRecord, HistoryError> {
        let command = self.redo_stack.pop().ok_or(HistoryError::NothingToRedo)?;
        if let Err(err) = command.execute(doc) {
            self.redo_stack.push(command);
            return Err(err);
        }
        let record = command.record();
        self.undo_stack.push(command);
        tracing::debug!(command = %record.name, "redid command");
        Ok(record)
    }

    fn run(&mut self, doc: &mut Document, request: CommandRequest) -> Result<CommandRecord, HistoryError> {
        tracing::debug!(kind = request.kind(), name = request.name(), "running command");
        let command = request.into_command();
        self.command_created.emit(&CreatedCommand {
            name: command.name().to_string(),
            events: command.events().clone(),
        });

        command.execute(doc)?;
        let record = command.record();
        self.push(command);
        Ok(record)
    }

    fn command_created(&self) -> &Emitter<CreatedCommand> {
        &self.command_created
    }

    fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }
}

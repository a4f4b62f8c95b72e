//! # Remix Editor
//!
//! Replace, delete or "remix" one element of a page at a time, with every
//! committed change recorded as a single undoable command.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ session: remix workflow with an external    │
//! │ editor (validate → open → preview* → commit)│
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ orchestrator: undo / redo / run / delete    │
//! │  - status line reporting                    │
//! │  - effect-wrapped execution                 │
//! │  - element replacement (live or recorded)   │
//! └─────────────────────────────────────────────┘
//!          ↓                        ↑ events
//! ┌──────────────────────┐  ┌───────────────────┐
//! │ history: commands    │→ │ effects: overlay  │
//! │ (undo/redo stacks)   │  │ transitions       │
//! └──────────────────────┘  └───────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ remix-dom: document arena                   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Previews are ephemeral**: live edits never touch the undo stack
//! 2. **One session, one command**: a commit always diffs against the pristine original
//! 3. **Effects observe, never mutate**: transitions hang off command lifecycle events
//! 4. **User problems are not errors**: rejections are reported on the HUD and returned as values
//!
//! ## Usage
//!
//! ```rust,ignore
//! use remix_editor::{CommandOrchestrator, Collaborators, MixMasterOptions, RemixRequest};
//!
//! let mut orchestrator = CommandOrchestrator::new(collaborators, &MixMasterOptions::default());
//!
//! // Open the external editor on the focused element
//! if let SessionStart::Opened(session, events) =
//!     orchestrator.remix_focused_element(&mut doc, &mut host, &RemixRequest::default())?
//! {
//!     let outcome = session.run(&mut orchestrator, &mut doc, events).await?;
//! }
//!
//! // One undo reverts the whole session
//! orchestrator.undo(&mut doc)?;
//! ```

mod command;
mod effects;
mod errors;
mod events;
mod focus;
mod history;
mod host;
mod hud;
mod l10n;
mod message;
mod options;
mod orchestrator;
mod overlay;
mod replacer;
mod session;

pub use command::{
    Command, CommandEvents, CommandRecord, CommandRequest, CreatedCommand, ReplaceEvent,
    ReplaceWithCommand,
};
pub use effects::{
    EffectWindow, NullTransitionEffects, TransitionEffectCoordinator, TransitionEffects,
    TransitionEffectsExt, TAG_COLOR_INTENSITY,
};
pub use errors::{HistoryError, HostError, RemixError};
pub use events::{Emitter, Subscription, WeakEmitter};
pub use focus::{FocusTracker, FocusedSelection};
pub use history::{CommandHistory, CommandManager};
pub use host::{
    DialogEvent, DialogLog, EditorDialog, EditorHost, EmbedRequest, EmbeddedDialog, ScriptedHost,
};
pub use hud::{Hud, StatusBar, StatusLine};
pub use l10n::{keys, render_template, BundledStrings, Localizer};
pub use message::{EditorMessage, InitMessage, MessageError, StartHtml};
pub use options::MixMasterOptions;
pub use orchestrator::{Collaborators, CommandOrchestrator, StatusOutcome};
pub use overlay::{
    Overlay, OverlayRenderer, RecordedTransition, RecordingOverlayRenderer, TracingOverlayRenderer,
};
pub use replacer::{html_to_fragment, DELETED_CLASS, INLINE_CONTAINER};
pub use session::{
    EditingSession, Rejection, RemixRequest, SessionNotice, SessionOutcome, SessionPhase,
    SessionStart, MAX_HTML_LENGTH, UPROOTABLE_CLASS,
};

// Re-export document types for convenience
pub use remix_dom::{Document, NodeId, NodeSnapshot};

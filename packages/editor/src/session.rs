//! # Editing Sessions
//!
//! The remix workflow: open an external editor on the focused element,
//! stream its previews into the page, and commit the final markup as one
//! undoable command.
//!
//! ```text
//! begin ─┬─ rejected (no focus / busy / root / too big)
//!        └─ DialogOpen ──Loaded──▶ Previewing ◀─┐ preview
//!                                     │ ─────────┘
//!                                     ├─ commit ──▶ Retracting ──Retracted──▶ Committed
//!                                     └─ cancel / Closed ──────────────────▶ Canceled
//! ```
//!
//! Previews replace the live content directly and never reach the history.
//! A commit first puts the pristine original back, then records a single
//! `replacement` command from the original to the final content. At most
//! one session is active per orchestrator; the slot is held by the session
//! value and released when it is dropped.

use std::cell::Cell;
use std::rc::Rc;

use remix_dom::{Document, NodeId, Serializer};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::host::{DialogEvent, EditorDialog, EditorHost, EmbedRequest};
use crate::hud::StatusLine;
use crate::l10n::{keys, render_template};
use crate::message::{EditorMessage, InitMessage, StartHtml};
use crate::orchestrator::CommandOrchestrator;
use crate::RemixError;

/// Longest outer HTML (in UTF-16 code units) the editor accepts
pub const MAX_HTML_LENGTH: usize = 5000;

/// Marks the element being remixed while the editor needs to find it
pub const UPROOTABLE_CLASS: &str = "webxray-uprootable-element";

const SCRIPT_TAG: &str = "script";

/// How to open the editor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemixRequest {
    pub input: Option<String>,
    pub body: Option<NodeId>,
    pub dialog_url: String,
    /// Send the whole page plus a selector instead of the element alone
    pub send_full_document: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for the editor to load
    DialogOpen,
    /// Editor is up; previews may arrive
    Previewing,
    /// Committed; waiting for the dialog to morph back into the page
    Retracting,
    Committed,
    Canceled,
}

impl SessionPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionPhase::Committed | SessionPhase::Canceled)
    }
}

/// Why a remix request did not open the editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    NoFocusedElement,
    SessionInProgress,
    RootElement { tag: String },
    TooBig { tag: String, length: usize },
}

#[derive(Debug)]
pub enum SessionStart {
    Opened(EditingSession, UnboundedReceiver<DialogEvent>),
    Rejected(Rejection),
}

/// Page-level notifications emitted by sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionNotice {
    /// A preview was applied
    EditStarted,
    /// A commit finished retracting into the page
    EditFinished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    pub phase: SessionPhase,
    /// Content in the page where the element was
    pub final_content: Vec<NodeId>,
    pub previews: usize,
}

/// Single-session slot owned by an orchestrator
#[derive(Debug, Default, Clone)]
pub(crate) struct SessionSlot(Rc<Cell<bool>>);

impl SessionSlot {
    pub(crate) fn is_taken(&self) -> bool {
        self.0.get()
    }

    fn acquire(&self) -> Option<SessionLease> {
        if self.0.replace(true) {
            return None;
        }
        Some(SessionLease(Rc::clone(&self.0)))
    }
}

#[derive(Debug)]
struct SessionLease(Rc<Cell<bool>>);

impl Drop for SessionLease {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

pub struct EditingSession {
    original_element: NodeId,
    live_content: Vec<NodeId>,
    dialog: Box<dyn EditorDialog>,
    start_html: StartHtml,
    phase: SessionPhase,
    previews: usize,
    _lease: SessionLease,
}

impl EditingSession {
    /// Validate the focused element and open the editor on it
    ///
    /// Rejections leave the document untouched.
    pub fn begin(
        orchestrator: &mut CommandOrchestrator,
        doc: &mut Document,
        host: &mut dyn EditorHost,
        request: &RemixRequest,
    ) -> Result<SessionStart, RemixError> {
        let Some(element) = orchestrator.focused_element() else {
            tracing::debug!("remix requested without a focused element");
            return Ok(SessionStart::Rejected(Rejection::NoFocusedElement));
        };
        let Some(lease) = orchestrator.session_slot().acquire() else {
            tracing::warn!(%element, "remix requested while another session is open");
            return Ok(SessionStart::Rejected(Rejection::SessionInProgress));
        };

        let tag = doc.node_name(element).to_lowercase();
        if orchestrator.is_too_big_to_change(doc, element)? {
            orchestrator.report_too_big_to_change();
            return Ok(SessionStart::Rejected(Rejection::RootElement { tag }));
        }

        let markup = Serializer::new(doc).skip_tag(SCRIPT_TAG).outer_html(element)?;
        let length = markup.encode_utf16().count();
        if length == 0 || length > MAX_HTML_LENGTH {
            let template = orchestrator.localized(keys::TOO_BIG_TO_REMIX_HTML);
            let message = render_template(&template, "tagName", &tag);
            tracing::warn!(%tag, length, "element too big to remix");
            orchestrator
                .hud_mut()
                .transparent_message(StatusLine::Html(message));
            return Ok(SessionStart::Rejected(Rejection::TooBig { tag, length }));
        }

        // Scripts must not run again once the element is re-inserted
        let removed = doc.remove_descendants_by_tag(element, SCRIPT_TAG)?;
        if removed > 0 {
            tracing::debug!(%element, removed, "removed scripts from remixed element");
        }

        let start_html = if request.send_full_document {
            doc.add_class(element, UPROOTABLE_CLASS)?;
            StartHtml::Document {
                html: doc.to_html(),
                selector: format!(".{}", UPROOTABLE_CLASS),
            }
        } else {
            StartHtml::Fragment(markup)
        };

        orchestrator.focus_mut().unfocus();

        let embedded = match host.embed(EmbedRequest {
            input: request.input.clone(),
            body: request.body,
            url: request.dialog_url.clone(),
            element,
        }) {
            Ok(embedded) => embedded,
            Err(err) => {
                doc.remove_class(element, UPROOTABLE_CLASS)?;
                return Err(err.into());
            }
        };

        tracing::info!(%element, %tag, length, full_document = request.send_full_document, "editor opened");
        let session = EditingSession {
            original_element: element,
            live_content: vec![element],
            dialog: embedded.handle,
            start_html,
            phase: SessionPhase::DialogOpen,
            previews: 0,
            _lease: lease,
        };
        Ok(SessionStart::Opened(session, embedded.events))
    }

    /// Process one dialog event and return the resulting phase
    pub fn handle_event(
        &mut self,
        orchestrator: &mut CommandOrchestrator,
        doc: &mut Document,
        event: DialogEvent,
    ) -> Result<SessionPhase, RemixError> {
        if self.phase.is_terminal() {
            tracing::debug!(?event, phase = ?self.phase, "event after session end ignored");
            return Ok(self.phase);
        }

        match event {
            DialogEvent::Loaded => self.on_loaded(orchestrator, doc)?,
            DialogEvent::Message(raw) => self.on_message(orchestrator, doc, &raw)?,
            DialogEvent::Retracted => {
                if self.phase == SessionPhase::Retracting {
                    self.finish(orchestrator, doc)?;
                } else {
                    tracing::debug!(phase = ?self.phase, "unexpected retract ignored");
                }
            }
            DialogEvent::Closed => {
                if self.phase == SessionPhase::Retracting {
                    self.finish(orchestrator, doc)?;
                } else {
                    tracing::debug!("editor closed by host");
                    self.cancel(doc, false)?;
                }
            }
        }

        Ok(self.phase)
    }

    /// Drive the session from `events` until it commits or is canceled
    ///
    /// A closed event channel counts as the editor being closed.
    pub async fn run(
        mut self,
        orchestrator: &mut CommandOrchestrator,
        doc: &mut Document,
        mut events: UnboundedReceiver<DialogEvent>,
    ) -> Result<SessionOutcome, RemixError> {
        while !self.phase.is_terminal() {
            let event = match events.recv().await {
                Some(event) => event,
                None => {
                    tracing::debug!("editor event channel closed");
                    DialogEvent::Closed
                }
            };
            if let Err(err) = self.handle_event(orchestrator, doc, event) {
                tracing::error!(%err, "editor session failed");
                self.abandon(doc);
                return Err(err);
            }
        }
        Ok(self.outcome())
    }

    /// Give up on an unfinished session: strip the marker and close the editor
    ///
    /// Ended sessions are left as they are. Dropping a session without
    /// calling this still closes the editor but cannot touch the document.
    pub fn abandon(mut self, doc: &mut Document) {
        if self.phase.is_terminal() {
            return;
        }
        if let Err(err) = self.cancel(doc, true) {
            tracing::warn!(%err, "could not clean up abandoned session");
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn original_element(&self) -> NodeId {
        self.original_element
    }

    pub fn live_content(&self) -> &[NodeId] {
        &self.live_content
    }

    pub fn outcome(&self) -> SessionOutcome {
        SessionOutcome {
            phase: self.phase,
            final_content: self.live_content.clone(),
            previews: self.previews,
        }
    }

    fn on_loaded(&mut self, orchestrator: &CommandOrchestrator, doc: &Document) -> Result<(), RemixError> {
        if self.phase != SessionPhase::DialogOpen {
            tracing::debug!("repeated editor load ignored");
            return Ok(());
        }
        let init = InitMessage {
            start_html: self.start_html.clone(),
            mods: orchestrator.dialog_page_mods().clone(),
            base_uri: doc.base_uri().to_string(),
        };
        self.dialog.post_message(&init.to_json()?);
        self.dialog.show();
        self.phase = SessionPhase::Previewing;
        Ok(())
    }

    fn on_message(
        &mut self,
        orchestrator: &mut CommandOrchestrator,
        doc: &mut Document,
        raw: &str,
    ) -> Result<(), RemixError> {
        match self.phase {
            SessionPhase::Previewing => {}
            SessionPhase::DialogOpen => {
                tracing::warn!("editor message before load ignored");
                return Ok(());
            }
            _ => {
                tracing::debug!(phase = ?self.phase, "editor message after commit ignored");
                return Ok(());
            }
        }

        let message = match EditorMessage::decode(raw) {
            Ok(message) => message,
            Err(err) => {
                tracing::error!(%err, "editor message was not valid");
                return Ok(());
            }
        };

        match message {
            EditorMessage::Preview { end_html } => self.preview(orchestrator, doc, &end_html),
            EditorMessage::Commit { end_html } => self.commit(orchestrator, doc, &end_html),
            EditorMessage::Cancel { canceled } => {
                tracing::debug!(canceled, "editor canceled");
                self.cancel(doc, true)
            }
        }
    }

    fn preview(
        &mut self,
        orchestrator: &mut CommandOrchestrator,
        doc: &mut Document,
        end_html: &str,
    ) -> Result<(), RemixError> {
        let live = orchestrator.replace_element(doc, self.original_element, &self.live_content, end_html, false)?;
        self.live_content = live;
        self.previews += 1;
        tracing::debug!(previews = self.previews, "preview applied");
        orchestrator.notices().emit(&SessionNotice::EditStarted);
        Ok(())
    }

    fn commit(
        &mut self,
        orchestrator: &mut CommandOrchestrator,
        doc: &mut Document,
        end_html: &str,
    ) -> Result<(), RemixError> {
        // The original goes back into the page on undo; it must not keep the marker
        doc.remove_class(self.original_element, UPROOTABLE_CLASS)?;
        let committed = orchestrator.replace_element(doc, self.original_element, &self.live_content, end_html, true)?;
        self.live_content = committed;
        mark_elements(doc, &self.live_content, true)?;

        self.phase = SessionPhase::Retracting;
        tracing::info!(previews = self.previews, nodes = self.live_content.len(), "remix committed");
        if let Some(anchor) = self.live_content.first() {
            self.dialog.retract_into(*anchor);
        }
        Ok(())
    }

    fn finish(&mut self, orchestrator: &mut CommandOrchestrator, doc: &mut Document) -> Result<(), RemixError> {
        mark_elements(doc, &self.live_content, false)?;
        self.phase = SessionPhase::Committed;
        orchestrator.notices().emit(&SessionNotice::EditFinished);
        Ok(())
    }

    fn cancel(&mut self, doc: &mut Document, close_dialog: bool) -> Result<(), RemixError> {
        mark_elements(doc, &self.live_content, false)?;
        doc.remove_class(self.original_element, UPROOTABLE_CLASS)?;
        if close_dialog {
            self.dialog.close();
        }
        self.phase = SessionPhase::Canceled;
        tracing::info!(previews = self.previews, "remix canceled");
        Ok(())
    }
}

impl Drop for EditingSession {
    fn drop(&mut self) {
        if !self.phase.is_terminal() {
            tracing::warn!(phase = ?self.phase, "unfinished session dropped");
            self.dialog.close();
        }
    }
}

impl std::fmt::Debug for EditingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditingSession")
            .field("original_element", &self.original_element)
            .field("live_content", &self.live_content)
            .field("phase", &self.phase)
            .field("previews", &self.previews)
            .finish()
    }
}

/// Add or strip the marker class on every element in `nodes`
fn mark_elements(doc: &mut Document, nodes: &[NodeId], marked: bool) -> Result<(), RemixError> {
    for node in nodes {
        if doc.element(*node).is_none() {
            continue;
        }
        if marked {
            doc.add_class(*node, UPROOTABLE_CLASS)?;
        } else {
            doc.remove_class(*node, UPROOTABLE_CLASS)?;
        }
    }
    Ok(())
}

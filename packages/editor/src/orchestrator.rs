//! # Command Orchestrator
//!
//! Facade over a [`CommandHistory`] for user-level actions: undo, redo,
//! delete, replace and remix of the focused element.
//!
//! Every action reports on the status display by replacing its content.
//! User-initiated undo, redo and delete run inside a transition-effect
//! window; internal replacements (previews, commits) never do.

use std::rc::Rc;

use remix_dom::{Document, NodeId};
use serde_json::Value;

use crate::command::{CommandRecord, CommandRequest};
use crate::effects::{
    NullTransitionEffects, TransitionEffectCoordinator, TransitionEffects, TransitionEffectsExt,
};
use crate::events::Emitter;
use crate::focus::FocusedSelection;
use crate::history::CommandHistory;
use crate::host::EditorHost;
use crate::hud::{Hud, StatusLine};
use crate::l10n::{keys, Localizer};
use crate::options::MixMasterOptions;
use crate::overlay::OverlayRenderer;
use crate::replacer::{deletion_placeholder, html_to_fragment};
use crate::session::{EditingSession, RemixRequest, SessionNotice, SessionSlot, SessionStart};
use crate::RemixError;

const TOO_BIG_SELECTOR: &str = "html, body";
const ELEMENT_REFERENCE_URL: &str = "https://developer.mozilla.org/en/HTML/Element/";

/// External collaborators an orchestrator drives
pub struct Collaborators {
    pub history: Box<dyn CommandHistory>,
    pub focus: Box<dyn FocusedSelection>,
    pub hud: Box<dyn Hud>,
    pub l10n: Box<dyn Localizer>,
    pub overlay: Rc<dyn OverlayRenderer>,
}

/// Result of an undo or redo request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusOutcome {
    /// The history moved; the status names the command
    Applied(CommandRecord),

    /// Nothing to undo/redo; the status shows the fixed message
    Unavailable,
}

pub struct CommandOrchestrator {
    history: Box<dyn CommandHistory>,
    effects: Box<dyn TransitionEffects>,
    focus: Box<dyn FocusedSelection>,
    hud: Box<dyn Hud>,
    l10n: Box<dyn Localizer>,
    dialog_page_mods: Value,
    notices: Emitter<SessionNotice>,
    session_slot: SessionSlot,
}

impl CommandOrchestrator {
    pub fn new(collaborators: Collaborators, options: &MixMasterOptions) -> Self {
        let Collaborators {
            history,
            focus,
            hud,
            l10n,
            overlay,
        } = collaborators;

        let effects: Box<dyn TransitionEffects> = if options.disable_transition_effects {
            Box::new(NullTransitionEffects)
        } else {
            Box::new(TransitionEffectCoordinator::new(history.as_ref(), overlay))
        };

        Self {
            history,
            effects,
            focus,
            hud,
            l10n,
            dialog_page_mods: options.page_mods.clone(),
            notices: Emitter::new(),
            session_slot: SessionSlot::default(),
        }
    }

    pub fn undo(&mut self, doc: &mut Document) -> Result<StatusOutcome, RemixError> {
        if !self.history.can_undo() {
            self.set_html_status(keys::CANNOT_UNDO_HTML);
            return Ok(StatusOutcome::Unavailable);
        }

        self.focus.unfocus();
        let history = &mut self.history;
        let record = self.effects.enable_during(|| history.undo(doc))?;
        self.update_status(keys::UNDID, &record);
        Ok(StatusOutcome::Applied(record))
    }

    pub fn redo(&mut self, doc: &mut Document) -> Result<StatusOutcome, RemixError> {
        if !self.history.can_redo() {
            self.set_html_status(keys::CANNOT_REDO_HTML);
            return Ok(StatusOutcome::Unavailable);
        }

        self.focus.unfocus();
        let history = &mut self.history;
        let record = self.effects.enable_during(|| history.redo(doc))?;
        self.update_status(keys::REDID, &record);
        Ok(StatusOutcome::Applied(record))
    }

    /// Unfocus, execute a new command and report it
    pub fn run(&mut self, doc: &mut Document, request: CommandRequest) -> Result<CommandRecord, RemixError> {
        self.focus.unfocus();
        let record = self.history.run(doc, request)?;
        self.update_status(keys::EXECUTED, &record);
        Ok(record)
    }

    /// Replace the focused element with an invisible placeholder
    ///
    /// Returns `None` when nothing is focused or the element is the page
    /// itself (reported as "too big to change").
    pub fn delete_focused_element(&mut self, doc: &mut Document) -> Result<Option<CommandRecord>, RemixError> {
        let Some(element) = self.focus.primary_element() else {
            return Ok(None);
        };
        if self.is_too_big_to_change(doc, element)? {
            self.report_too_big_to_change();
            return Ok(None);
        }

        let placeholder = doc.parse_fragment(&deletion_placeholder());
        let _window = self.effects.open_window();
        let record = self.run(
            doc,
            CommandRequest::ReplaceWith {
                name: self.l10n.get(keys::DELETION),
                element_to_replace: element,
                new_content: placeholder,
            },
        )?;
        Ok(Some(record))
    }

    /// Reference page describing the focused element's tag
    pub fn info_url_for_focused_element(&self, doc: &Document) -> Option<String> {
        let element = self.focus.primary_element()?;
        Some(format!(
            "{}{}",
            ELEMENT_REFERENCE_URL,
            doc.node_name(element).to_lowercase()
        ))
    }

    /// Open the focused element's reference page in the `info` window
    pub fn info_for_focused_element(&self, doc: &Document, open: impl FnOnce(&str, &str)) -> bool {
        match self.info_url_for_focused_element(doc) {
            Some(url) => {
                open(&url, "info");
                true
            }
            None => false,
        }
    }

    /// Swap new markup in place of `element_to_replace`
    ///
    /// With `save_state`, `original` is first put back where
    /// `element_to_replace` is, and the recorded command replaces `original`.
    /// The history therefore never sees intermediate previews. Without it,
    /// the swap is direct and unrecorded.
    pub fn replace_element(
        &mut self,
        doc: &mut Document,
        original: NodeId,
        element_to_replace: &[NodeId],
        markup: &str,
        save_state: bool,
    ) -> Result<Vec<NodeId>, RemixError> {
        let new_content = html_to_fragment(doc, markup);

        if save_state {
            doc.replace_nodes(element_to_replace, &[original])?;
            self.run(
                doc,
                CommandRequest::ReplaceWith {
                    name: self.l10n.get(keys::REPLACEMENT),
                    element_to_replace: original,
                    new_content: new_content.clone(),
                },
            )?;
        } else {
            doc.replace_nodes(element_to_replace, &new_content)?;
        }

        Ok(new_content)
    }

    /// Mods sent along with every later editor init message
    pub fn set_dialog_page_mods(&mut self, mods: Value) {
        self.dialog_page_mods = mods;
    }

    pub fn dialog_page_mods(&self) -> &Value {
        &self.dialog_page_mods
    }

    /// Open the external editor on the focused element
    pub fn remix_focused_element(
        &mut self,
        doc: &mut Document,
        host: &mut dyn EditorHost,
        request: &RemixRequest,
    ) -> Result<SessionStart, RemixError> {
        EditingSession::begin(self, doc, host, request)
    }

    pub fn history(&self) -> &dyn CommandHistory {
        self.history.as_ref()
    }

    /// Session start/finish notifications
    pub fn notices(&self) -> &Emitter<SessionNotice> {
        &self.notices
    }

    pub fn effects_enabled(&self) -> bool {
        self.effects.is_enabled()
    }

    pub fn session_active(&self) -> bool {
        self.session_slot.is_taken()
    }

    pub(crate) fn focus_mut(&mut self) -> &mut dyn FocusedSelection {
        self.focus.as_mut()
    }

    pub(crate) fn focused_element(&self) -> Option<NodeId> {
        self.focus.primary_element()
    }

    pub(crate) fn hud_mut(&mut self) -> &mut dyn Hud {
        self.hud.as_mut()
    }

    pub(crate) fn localized(&self, key: &str) -> String {
        self.l10n.get(key)
    }

    pub(crate) fn session_slot(&self) -> &SessionSlot {
        &self.session_slot
    }

    pub(crate) fn is_too_big_to_change(&self, doc: &Document, element: NodeId) -> Result<bool, RemixError> {
        Ok(doc.is(element, TOO_BIG_SELECTOR)?)
    }

    pub(crate) fn report_too_big_to_change(&mut self) {
        let message = self.l10n.get(keys::TOO_BIG_TO_CHANGE);
        tracing::warn!(%message, "element rejected");
        self.hud.transparent_message(StatusLine::Text(message));
    }

    fn update_status(&mut self, verb_key: &str, record: &CommandRecord) {
        let verb = self.l10n.get(verb_key);
        self.hud
            .set_status(StatusLine::Text(format!("{} {}.", verb, record.name)));
    }

    fn set_html_status(&mut self, key: &str) {
        let message = self.l10n.get(key);
        self.hud.set_status(StatusLine::Html(message));
    }
}

impl std::fmt::Debug for CommandOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandOrchestrator")
            .field("undo_levels", &self.history.undo_levels())
            .field("redo_levels", &self.history.redo_levels())
            .field("effects_enabled", &self.effects.is_enabled())
            .field("session_active", &self.session_slot.is_taken())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::FocusTracker;
    use crate::history::CommandManager;
    use crate::hud::StatusBar;
    use crate::l10n::BundledStrings;
    use crate::overlay::RecordingOverlayRenderer;
    use std::cell::RefCell;

    struct Fixture {
        doc: Document,
        focus: Rc<RefCell<FocusTracker>>,
        hud: Rc<RefCell<StatusBar>>,
        overlay: RecordingOverlayRenderer,
        orchestrator: CommandOrchestrator,
    }

    fn fixture(markup: &str) -> Fixture {
        let doc = Document::parse(markup);
        let focus = Rc::new(RefCell::new(FocusTracker::new()));
        let hud = Rc::new(RefCell::new(StatusBar::new()));
        let overlay = RecordingOverlayRenderer::new();
        let orchestrator = CommandOrchestrator::new(
            Collaborators {
                history: Box::new(CommandManager::new()),
                focus: Box::new(Rc::clone(&focus)),
                hud: Box::new(Rc::clone(&hud)),
                l10n: Box::new(BundledStrings::english()),
                overlay: Rc::new(overlay.clone()),
            },
            &MixMasterOptions::default(),
        );
        Fixture {
            doc,
            focus,
            hud,
            overlay,
            orchestrator,
        }
    }

    fn status(hud: &Rc<RefCell<StatusBar>>) -> Option<StatusLine> {
        hud.borrow().status.clone()
    }

    #[test]
    fn test_undo_with_empty_history() {
        let mut f = fixture("<body><p>a</p></body>");
        let before = f.doc.to_html();

        let outcome = f.orchestrator.undo(&mut f.doc).unwrap();
        assert_eq!(outcome, StatusOutcome::Unavailable);
        assert_eq!(f.doc.to_html(), before);
        assert_eq!(
            status(&f.hud),
            Some(StatusLine::Html("<span>Nothing left to undo!</span>".into()))
        );

        f.orchestrator.redo(&mut f.doc).unwrap();
        assert_eq!(
            status(&f.hud),
            Some(StatusLine::Html("<span>Nothing left to redo!</span>".into()))
        );
    }

    #[test]
    fn test_delete_undo_redo_status_and_effects() {
        let mut f = fixture("<body><p id=\"x\">a</p></body>");
        let p = f.doc.select_first("#x").unwrap().unwrap();
        f.focus.borrow_mut().focus(p);

        let record = f.orchestrator.delete_focused_element(&mut f.doc).unwrap().unwrap();
        assert_eq!(record.name, "deletion");
        assert_eq!(
            f.doc.to_html(),
            "<body><span class=\"webxray-deleted\"></span></body>"
        );
        assert_eq!(status(&f.hud), Some(StatusLine::Text("Executed deletion.".into())));
        assert_eq!(f.focus.borrow().primary_element(), None);

        f.orchestrator.undo(&mut f.doc).unwrap();
        assert_eq!(f.doc.to_html(), "<body><p id=\"x\">a</p></body>");
        assert_eq!(status(&f.hud), Some(StatusLine::Text("Undid deletion.".into())));

        f.orchestrator.redo(&mut f.doc).unwrap();
        assert_eq!(status(&f.hud), Some(StatusLine::Text("Redid deletion.".into())));

        assert_eq!(f.overlay.completed(), 3);
        assert!(!f.orchestrator.effects_enabled());
    }

    #[test]
    fn test_delete_body_is_too_big() {
        let mut f = fixture("<html><body><p>a</p></body></html>");
        let body = f.doc.body().unwrap();
        f.focus.borrow_mut().focus(body);
        let before = f.doc.to_html();

        assert_eq!(f.orchestrator.delete_focused_element(&mut f.doc).unwrap(), None);
        assert_eq!(f.doc.to_html(), before);
        assert!(!f.orchestrator.history().can_undo());
        assert_eq!(
            f.hud.borrow().last_message,
            Some(StatusLine::Text("This element is too big to change.".into()))
        );
    }

    #[test]
    fn test_delete_without_focus_is_noop() {
        let mut f = fixture("<body><p>a</p></body>");
        assert_eq!(f.orchestrator.delete_focused_element(&mut f.doc).unwrap(), None);
        assert_eq!(f.hud.borrow().updates, 0);
    }

    #[test]
    fn test_replace_element_records_original() {
        let mut f = fixture("<body><p id=\"x\">a</p></body>");
        let original = f.doc.select_first("#x").unwrap().unwrap();

        let preview = f
            .orchestrator
            .replace_element(&mut f.doc, original, &[original], "<b>1</b>", false)
            .unwrap();
        assert_eq!(f.orchestrator.history().undo_levels(), 0);

        let committed = f
            .orchestrator
            .replace_element(&mut f.doc, original, &preview, "<i>2</i>", true)
            .unwrap();
        assert_eq!(f.orchestrator.history().undo_levels(), 1);
        assert_eq!(f.doc.to_html(), "<body><i>2</i></body>");

        let undone = f.orchestrator.undo(&mut f.doc).unwrap();
        match undone {
            StatusOutcome::Applied(record) => {
                assert_eq!(record.element_to_replace, original);
                assert_eq!(record.new_content, committed);
            }
            StatusOutcome::Unavailable => panic!("expected an undo"),
        }
        assert_eq!(f.doc.to_html(), "<body><p id=\"x\">a</p></body>");
        assert!(!f.doc.is_attached(preview[0]));
        assert_eq!(f.overlay.completed(), 1);
    }

    #[test]
    fn test_info_url() {
        let f = fixture("<body><TABLE></TABLE></body>");
        assert_eq!(f.orchestrator.info_url_for_focused_element(&f.doc), None);

        let table = f.doc.select_first("table").unwrap().unwrap();
        f.focus.borrow_mut().focus(table);

        let mut opened = None;
        assert!(f
            .orchestrator
            .info_for_focused_element(&f.doc, |url, name| opened = Some((url.to_string(), name.to_string()))));
        assert_eq!(
            opened,
            Some((
                "https://developer.mozilla.org/en/HTML/Element/table".to_string(),
                "info".to_string()
            ))
        );
    }

    #[test]
    fn test_disabled_effects_never_overlay() {
        let mut doc = Document::parse("<body><p>a</p></body>");
        let p = doc.select_first("p").unwrap().unwrap();
        let overlay = RecordingOverlayRenderer::new();
        let mut focus = FocusTracker::new();
        focus.focus(p);
        let mut orchestrator = CommandOrchestrator::new(
            Collaborators {
                history: Box::new(CommandManager::new()),
                focus: Box::new(focus),
                hud: Box::new(StatusBar::new()),
                l10n: Box::new(BundledStrings::english()),
                overlay: Rc::new(overlay.clone()),
            },
            &MixMasterOptions {
                disable_transition_effects: true,
                ..MixMasterOptions::default()
            },
        );

        orchestrator.delete_focused_element(&mut doc).unwrap();
        orchestrator.undo(&mut doc).unwrap();
        assert!(overlay.transitions().is_empty());
    }
}

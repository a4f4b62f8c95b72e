//! Shared fixtures for editor integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use remix_editor::{
    BundledStrings, Collaborators, CommandManager, CommandOrchestrator, Document, FocusTracker,
    MixMasterOptions, NodeId, RecordingOverlayRenderer, Rejection, RemixRequest, ScriptedHost,
    SessionNotice, SessionOutcome, SessionStart, StatusBar, StatusLine,
};
use serde_json::json;

pub struct Harness {
    pub doc: Document,
    pub focus: Rc<RefCell<FocusTracker>>,
    pub hud: Rc<RefCell<StatusBar>>,
    pub overlay: RecordingOverlayRenderer,
    pub notices: Rc<RefCell<Vec<SessionNotice>>>,
    pub orchestrator: CommandOrchestrator,
}

impl Harness {
    pub fn new(markup: &str) -> Self {
        Self::with_options(markup, MixMasterOptions::default())
    }

    pub fn with_options(markup: &str, options: MixMasterOptions) -> Self {
        let doc = Document::parse(markup).with_base_uri("http://example.org/page.html");
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
            &options,
        );

        let notices = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&notices);
        orchestrator
            .notices()
            .subscribe(move |notice: &SessionNotice| sink.borrow_mut().push(*notice));

        Self {
            doc,
            focus,
            hud,
            overlay,
            notices,
            orchestrator,
        }
    }

    /// Focus the first element matching `selector`
    pub fn focus(&self, selector: &str) -> NodeId {
        let element = self
            .doc
            .select_first(selector)
            .unwrap()
            .unwrap_or_else(|| panic!("nothing matches {}", selector));
        self.focus.borrow_mut().focus(element);
        element
    }

    pub fn status(&self) -> Option<StatusLine> {
        self.hud.borrow().status.clone()
    }

    pub fn last_message(&self) -> Option<StatusLine> {
        self.hud.borrow().last_message.clone()
    }

    pub fn html(&self) -> String {
        self.doc.to_html()
    }

    /// Open the editor on the focused element and drive the session to its end
    pub async fn remix(
        &mut self,
        host: &mut ScriptedHost,
        request: &RemixRequest,
    ) -> anyhow::Result<Result<SessionOutcome, Rejection>> {
        match self
            .orchestrator
            .remix_focused_element(&mut self.doc, host, request)?
        {
            SessionStart::Opened(session, events) => {
                let outcome = session
                    .run(&mut self.orchestrator, &mut self.doc, events)
                    .await?;
                Ok(Ok(outcome))
            }
            SessionStart::Rejected(rejection) => Ok(Err(rejection)),
        }
    }
}

pub fn request() -> RemixRequest {
    RemixRequest {
        dialog_url: "http://editor.example.org/".to_string(),
        ..RemixRequest::default()
    }
}

pub fn preview(html: &str) -> String {
    json!({"msg": "ok", "endHTML": html, "finished": false}).to_string()
}

pub fn commit(html: &str) -> String {
    json!({"msg": "ok", "endHTML": html, "finished": true}).to_string()
}

pub fn cancel() -> String {
    json!({"msg": "cancel", "canceled": true}).to_string()
}

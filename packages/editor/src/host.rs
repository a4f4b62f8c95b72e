//! # Editor Embedding
//!
//! The external editor lives in an isolated context and is only reachable
//! through messages. A host embeds it over an element and hands back a
//! dialog handle plus an ordered stream of [`DialogEvent`]s.
//!
//! [`ScriptedHost`] plays a fixed list of editor messages, for tests and
//! for the command-line driver.

use std::cell::RefCell;
use std::rc::Rc;

use remix_dom::NodeId;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::HostError;

/// Inbound events from an embedded editor, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEvent {
    /// The editor finished loading and can receive its init message
    Loaded,

    /// Raw JSON posted by the editor
    Message(String),

    /// The dialog finished morphing back into the page
    Retracted,

    /// The dialog went away on its own
    Closed,
}

/// Where and what to embed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedRequest {
    pub input: Option<String>,
    pub body: Option<NodeId>,
    pub url: String,
    pub element: NodeId,
}

/// Outbound side of an embedded editor
pub trait EditorDialog {
    fn post_message(&mut self, message: &str);

    fn show(&mut self);

    /// Morph the dialog back into `element`; completion arrives as
    /// [`DialogEvent::Retracted`]
    fn retract_into(&mut self, element: NodeId);

    fn close(&mut self);
}

pub struct EmbeddedDialog {
    pub handle: Box<dyn EditorDialog>,
    pub events: UnboundedReceiver<DialogEvent>,
}

pub trait EditorHost {
    fn embed(&mut self, request: EmbedRequest) -> Result<EmbeddedDialog, HostError>;
}

/// Everything a [`ScriptedHost`] was asked to do
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DialogLog {
    pub requests: Vec<EmbedRequest>,
    pub posted: Vec<String>,
    pub shown: usize,
    pub retracted_into: Vec<NodeId>,
    pub closed: usize,
}

/// Host whose editor replays a fixed script
///
/// On embed the event stream is pre-loaded with `Loaded`, then one
/// `Message` per scripted entry, then `Closed` (the user dismissing the
/// editor once the script runs out) unless [`ScriptedHost::keep_open`] was
/// used. Retracting sends `Retracted` behind whatever is already queued.
#[derive(Debug, Default)]
pub struct ScriptedHost {
    script: Vec<String>,
    keep_open: bool,
    failure: Option<String>,
    log: Rc<RefCell<DialogLog>>,
}

impl ScriptedHost {
    pub fn new<S: Into<String>>(script: impl IntoIterator<Item = S>) -> Self {
        Self {
            script: script.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Do not queue `Closed` after the script
    pub fn keep_open(mut self) -> Self {
        self.keep_open = true;
        self
    }

    /// Refuse every embed request
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Shared view of the dialog log
    pub fn log(&self) -> Rc<RefCell<DialogLog>> {
        Rc::clone(&self.log)
    }
}

impl EditorHost for ScriptedHost {
    fn embed(&mut self, request: EmbedRequest) -> Result<EmbeddedDialog, HostError> {
        if let Some(reason) = &self.failure {
            return Err(HostError::EmbedFailed(reason.clone()));
        }
        tracing::debug!(url = %request.url, element = %request.element, "embedding scripted editor");
        self.log.borrow_mut().requests.push(request);

        let (sender, events) = mpsc::unbounded_channel();
        let closing = (!self.keep_open).then_some(DialogEvent::Closed);
        for event in std::iter::once(DialogEvent::Loaded)
            .chain(self.script.iter().cloned().map(DialogEvent::Message))
            .chain(closing)
        {
            sender.send(event).ok();
        }

        Ok(EmbeddedDialog {
            handle: Box::new(ScriptedDialog {
                sender,
                log: Rc::clone(&self.log),
            }),
            events,
        })
    }
}

struct ScriptedDialog {
    sender: UnboundedSender<DialogEvent>,
    log: Rc<RefCell<DialogLog>>,
}

impl EditorDialog for ScriptedDialog {
    fn post_message(&mut self, message: &str) {
        self.log.borrow_mut().posted.push(message.to_string());
    }

    fn show(&mut self) {
        self.log.borrow_mut().shown += 1;
    }

    fn retract_into(&mut self, element: NodeId) {
        self.log.borrow_mut().retracted_into.push(element);
        if self.sender.send(DialogEvent::Retracted).is_err() {
            tracing::debug!("editor events no longer observed");
        }
    }

    fn close(&mut self) {
        self.log.borrow_mut().closed += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remix_dom::Document;

    fn request(doc: &Document) -> EmbedRequest {
        EmbedRequest {
            input: None,
            body: doc.body(),
            url: "about:editor".to_string(),
            element: doc.root(),
        }
    }

    #[test]
    fn test_script_is_queued_in_order() {
        let doc = Document::parse("<body></body>");
        let mut host = ScriptedHost::new(["one", "two"]);
        let mut dialog = host.embed(request(&doc)).unwrap();

        let mut events = Vec::new();
        while let Ok(event) = dialog.events.try_recv() {
            events.push(event);
        }
        assert_eq!(
            events,
            vec![
                DialogEvent::Loaded,
                DialogEvent::Message("one".to_string()),
                DialogEvent::Message("two".to_string()),
                DialogEvent::Closed,
            ]
        );
        assert_eq!(host.log().borrow().requests.len(), 1);
    }

    #[test]
    fn test_retract_sends_retracted() {
        let doc = Document::parse("<body></body>");
        let mut host = ScriptedHost::new(Vec::<String>::new()).keep_open();
        let mut dialog = host.embed(request(&doc)).unwrap();
        assert_eq!(dialog.events.try_recv().unwrap(), DialogEvent::Loaded);

        dialog.handle.retract_into(doc.root());
        assert_eq!(dialog.events.try_recv().unwrap(), DialogEvent::Retracted);
        assert_eq!(host.log().borrow().retracted_into, vec![doc.root()]);
    }

    #[test]
    fn test_failing_host() {
        let doc = Document::parse("<body></body>");
        let mut host = ScriptedHost::failing("no frames here");
        assert_eq!(
            host.embed(request(&doc)).err(),
            Some(HostError::EmbedFailed("no frames here".to_string()))
        );
    }
}

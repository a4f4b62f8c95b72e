//! Event-by-event tests for editing sessions

mod common;

use common::{commit, preview, request, Harness};
use remix_editor::{
    DialogEvent, EditingSession, Rejection, RemixRequest, ScriptedHost, SessionPhase,
    SessionStart, UPROOTABLE_CLASS,
};
use tokio::sync::mpsc::UnboundedReceiver;

const PAGE: &str = "<body><div id=\"card\">hi</div><p id=\"other\">x</p></body>";

fn open(h: &mut Harness, host: &mut ScriptedHost) -> (EditingSession, UnboundedReceiver<DialogEvent>) {
    match h
        .orchestrator
        .remix_focused_element(&mut h.doc, host, &request())
        .unwrap()
    {
        SessionStart::Opened(session, events) => (session, events),
        SessionStart::Rejected(rejection) => panic!("rejected: {:?}", rejection),
    }
}

fn feed(h: &mut Harness, session: &mut EditingSession, event: DialogEvent) -> SessionPhase {
    session
        .handle_event(&mut h.orchestrator, &mut h.doc, event)
        .unwrap()
}

#[test]
fn test_phases_through_a_commit() {
    let mut h = Harness::new(PAGE);
    h.focus("#card");
    let mut host = ScriptedHost::new(Vec::<String>::new()).keep_open();
    let (mut session, _events) = open(&mut h, &mut host);

    assert_eq!(session.phase(), SessionPhase::DialogOpen);
    assert_eq!(feed(&mut h, &mut session, DialogEvent::Loaded), SessionPhase::Previewing);
    assert_eq!(host.log().borrow().posted.len(), 1);

    // A second load does not re-send the init message
    feed(&mut h, &mut session, DialogEvent::Loaded);
    assert_eq!(host.log().borrow().posted.len(), 1);

    assert_eq!(
        feed(&mut h, &mut session, DialogEvent::Message(preview("<b>1</b>"))),
        SessionPhase::Previewing
    );
    assert_eq!(
        feed(&mut h, &mut session, DialogEvent::Message(commit("<b>2</b>"))),
        SessionPhase::Retracting
    );

    // While retracting, the committed content carries the marker
    let committed = session.live_content()[0];
    assert!(h.doc.has_class(committed, "webxray-uprootable-element"));

    assert_eq!(feed(&mut h, &mut session, DialogEvent::Retracted), SessionPhase::Committed);
    assert!(!h.doc.has_class(committed, "webxray-uprootable-element"));
}

#[test]
fn test_messages_after_commit_are_ignored() {
    let mut h = Harness::new(PAGE);
    h.focus("#card");
    let mut host = ScriptedHost::new(Vec::<String>::new()).keep_open();
    let (mut session, _events) = open(&mut h, &mut host);

    feed(&mut h, &mut session, DialogEvent::Loaded);
    feed(&mut h, &mut session, DialogEvent::Message(commit("<b>first</b>")));
    feed(&mut h, &mut session, DialogEvent::Message(commit("<b>second</b>")));
    feed(&mut h, &mut session, DialogEvent::Message(preview("<b>third</b>")));

    assert_eq!(session.phase(), SessionPhase::Retracting);
    assert_eq!(h.orchestrator.history().undo_levels(), 1);
    assert_eq!(h.html(), "<body><b class=\"webxray-uprootable-element\">first</b><p id=\"other\">x</p></body>");
}

#[test]
fn test_host_closing_during_retract_still_commits() {
    let mut h = Harness::new(PAGE);
    h.focus("#card");
    let mut host = ScriptedHost::new(Vec::<String>::new()).keep_open();
    let (mut session, _events) = open(&mut h, &mut host);

    feed(&mut h, &mut session, DialogEvent::Loaded);
    feed(&mut h, &mut session, DialogEvent::Message(commit("<b>done</b>")));

    assert_eq!(feed(&mut h, &mut session, DialogEvent::Closed), SessionPhase::Committed);
    assert_eq!(h.html(), "<body><b>done</b><p id=\"other\">x</p></body>");
}

#[test]
fn test_messages_before_load_are_ignored() {
    let mut h = Harness::new(PAGE);
    h.focus("#card");
    let mut host = ScriptedHost::new(Vec::<String>::new()).keep_open();
    let (mut session, _events) = open(&mut h, &mut host);

    assert_eq!(
        feed(&mut h, &mut session, DialogEvent::Message(commit("<b>early</b>"))),
        SessionPhase::DialogOpen
    );
    assert_eq!(h.html(), PAGE);
}

#[test]
fn test_terminal_sessions_ignore_events() {
    let mut h = Harness::new(PAGE);
    h.focus("#card");
    let mut host = ScriptedHost::new(Vec::<String>::new()).keep_open();
    let (mut session, _events) = open(&mut h, &mut host);

    feed(&mut h, &mut session, DialogEvent::Closed);
    assert_eq!(session.phase(), SessionPhase::Canceled);

    feed(&mut h, &mut session, DialogEvent::Loaded);
    assert_eq!(session.phase(), SessionPhase::Canceled);
    assert!(host.log().borrow().posted.is_empty());
}

#[test]
fn test_one_session_at_a_time() {
    let mut h = Harness::new(PAGE);
    h.focus("#card");
    let mut host = ScriptedHost::new(Vec::<String>::new()).keep_open();
    let (session, _events) = open(&mut h, &mut host);
    assert!(h.orchestrator.session_active());

    h.focus("#other");
    match h
        .orchestrator
        .remix_focused_element(&mut h.doc, &mut host, &request())
        .unwrap()
    {
        SessionStart::Rejected(rejection) => assert_eq!(rejection, Rejection::SessionInProgress),
        SessionStart::Opened(..) => panic!("second session opened"),
    }
    assert_eq!(host.log().borrow().requests.len(), 1);

    drop(session);
    assert!(!h.orchestrator.session_active());
    let (_second, _events) = open(&mut h, &mut host);
}

#[test]
fn test_rejection_releases_the_slot() {
    let mut h = Harness::new(PAGE);
    h.focus("body");
    let mut host = ScriptedHost::new(Vec::<String>::new());

    let start = h
        .orchestrator
        .remix_focused_element(&mut h.doc, &mut host, &request())
        .unwrap();
    assert!(matches!(
        start,
        SessionStart::Rejected(Rejection::RootElement { .. })
    ));
    assert!(!h.orchestrator.session_active());
}

#[tokio::test]
async fn test_closed_channel_counts_as_close() {
    let mut h = Harness::new(PAGE);
    h.focus("#card");
    let mut host = ScriptedHost::new(Vec::<String>::new()).keep_open();
    let (session, events) = open(&mut h, &mut host);
    drop(events);

    // A channel whose sender goes away after the load
    let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
    sender.send(DialogEvent::Loaded).unwrap();
    drop(sender);

    let outcome = session
        .run(&mut h.orchestrator, &mut h.doc, receiver)
        .await
        .unwrap();
    assert_eq!(outcome.phase, SessionPhase::Canceled);
    assert_eq!(host.log().borrow().closed, 0);
}

#[test]
fn test_loosely_typed_cancel_closes_the_editor() {
    let mut h = Harness::new(PAGE);
    h.focus("#card");
    let mut host = ScriptedHost::new(Vec::<String>::new()).keep_open();
    let (mut session, _events) = open(&mut h, &mut host);

    feed(&mut h, &mut session, DialogEvent::Loaded);
    let phase = feed(
        &mut h,
        &mut session,
        DialogEvent::Message(r#"{"msg":"cancel","finished":null}"#.to_string()),
    );

    assert_eq!(phase, SessionPhase::Canceled);
    assert_eq!(host.log().borrow().closed, 1);
    assert_eq!(h.html(), PAGE);
}

#[test]
fn test_dropping_an_open_session_closes_the_editor() {
    let mut h = Harness::new(PAGE);
    h.focus("#card");
    let mut host = ScriptedHost::new(Vec::<String>::new()).keep_open();
    let (mut session, _events) = open(&mut h, &mut host);
    feed(&mut h, &mut session, DialogEvent::Loaded);

    drop(session);

    assert_eq!(host.log().borrow().closed, 1);
    assert!(!h.orchestrator.session_active());
}

#[test]
fn test_dropping_a_finished_session_leaves_the_editor_alone() {
    let mut h = Harness::new(PAGE);
    h.focus("#card");
    let mut host = ScriptedHost::new(Vec::<String>::new()).keep_open();
    let (mut session, _events) = open(&mut h, &mut host);
    feed(&mut h, &mut session, DialogEvent::Closed);

    drop(session);

    assert_eq!(host.log().borrow().closed, 0);
}

#[test]
fn test_abandon_strips_the_full_document_marker() {
    let mut h = Harness::new(PAGE);
    let card = h.focus("#card");
    let mut host = ScriptedHost::new(Vec::<String>::new()).keep_open();
    let full_page = RemixRequest {
        send_full_document: true,
        ..request()
    };
    let session = match h
        .orchestrator
        .remix_focused_element(&mut h.doc, &mut host, &full_page)
        .unwrap()
    {
        SessionStart::Opened(session, _events) => session,
        SessionStart::Rejected(rejection) => panic!("rejected: {:?}", rejection),
    };
    assert!(h.doc.has_class(card, UPROOTABLE_CLASS));

    session.abandon(&mut h.doc);

    assert!(!h.doc.has_class(card, UPROOTABLE_CLASS));
    assert_eq!(h.html(), PAGE);
    assert_eq!(host.log().borrow().closed, 1);
    assert!(!h.orchestrator.session_active());
}

use anyhow::bail;
use anyhow::Result;
use tokio::sync::mpsc;

use super::SessionState;
use super::DEFAULT_GREETING;
use super::DISCLAIMER;
use crate::domain::models::Action;
use crate::domain::models::Author;
use crate::domain::models::ClinicalNote;
use crate::domain::models::StreamEvent;
use crate::domain::models::StreamState;

fn texts(state: &SessionState) -> Vec<String> {
    return state
        .transcript
        .entries()
        .iter()
        .map(|e| return e.text().to_string())
        .collect();
}

#[test]
fn it_bootstraps_with_fetched_greeting() {
    let mut state = SessionState::new();
    state.bootstrap(Some("X".to_string()));

    let entries = state.transcript.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].author, Author::System);
    assert_eq!(entries[0].text(), DISCLAIMER);
    assert_eq!(entries[1].author, Author::Assistant);
    assert_eq!(entries[1].text(), "X");
}

#[test]
fn it_bootstraps_with_default_greeting_on_fetch_failure() {
    let mut state = SessionState::new();
    state.bootstrap(None);

    let entries = state.transcript.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].text(), DISCLAIMER);
    assert_eq!(entries[1].text(), DEFAULT_GREETING);
}

#[test]
fn it_reseeds_on_reactivation() {
    let mut state = SessionState::new();
    state.bootstrap(Some("X".to_string()));
    state.bootstrap(Some("X".to_string()));

    assert_eq!(state.transcript.entries().len(), 4);
}

#[test]
fn it_rejects_whitespace_only_submissions() -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
    let mut state = SessionState::new();

    assert!(!state.submit("", &tx)?);
    assert!(!state.submit("   \n\t ", &tx)?);

    assert!(state.transcript.is_empty());
    assert!(!state.waiting_for_reply);
    assert!(rx.try_recv().is_err());
    return Ok(());
}

#[test]
fn it_appends_optimistically_and_dispatches_on_submit() -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
    let mut state = SessionState::new();

    assert!(state.submit("  昨夜から腹痛があります  ", &tx)?);

    let entries = state.transcript.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].author, Author::User);
    assert_eq!(entries[0].text(), "昨夜から腹痛があります");
    assert!(state.waiting_for_reply);

    match rx.try_recv()? {
        Action::SubmitMessage(content) => assert_eq!(content, "昨夜から腹痛があります"),
        _ => bail!("Wrong action type"),
    }
    return Ok(());
}

#[test]
fn it_accumulates_deltas_into_one_pending_entry() {
    let mut state = SessionState::new();
    state.open_stream(1);

    for delta in ["Hel", "lo, ", "world"] {
        state.handle_stream_event(1, StreamEvent::Token(delta.to_string()));
    }

    let entries = state.transcript.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].text(), "Hello, world");
    assert!(entries[0].is_pending());
    assert_eq!(state.active_stream().unwrap().state(), StreamState::Streaming);
}

#[test]
fn it_finalizes_entry_on_done() {
    let mut state = SessionState::new();
    state.waiting_for_reply = true;
    state.open_stream(1);
    state.handle_stream_event(1, StreamEvent::Token("お大事に".to_string()));
    state.handle_stream_event(1, StreamEvent::Done);

    let entries = state.transcript.entries();
    assert_eq!(entries[0].text(), "お大事に");
    assert!(!entries[0].is_pending());
    assert!(state.active_stream().is_none());
    assert!(!state.waiting_for_reply);
}

#[test]
fn it_keeps_partial_content_on_failure() {
    let mut state = SessionState::new();
    state.waiting_for_reply = true;
    state.open_stream(1);
    state.handle_stream_event(1, StreamEvent::Token("partial".to_string()));
    state.handle_stream_event(1, StreamEvent::Failed);

    let entries = state.transcript.entries();
    assert_eq!(entries[0].text(), "partial");
    assert!(!entries[0].is_pending());
    assert!(!state.waiting_for_reply);
}

#[test]
fn it_supersedes_the_active_stream() {
    let mut state = SessionState::new();
    state.open_stream(1);
    state.handle_stream_event(1, StreamEvent::Token("old".to_string()));

    state.open_stream(2);
    state.handle_stream_event(2, StreamEvent::Token("new".to_string()));

    let entries = state.transcript.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].text(), "old");
    assert!(!entries[0].is_pending());
    assert_eq!(entries[1].text(), "new");
    assert_eq!(state.active_stream().unwrap().id(), 2);
}

#[test]
fn it_drops_stale_events_after_supersession() {
    let mut state = SessionState::new();
    state.open_stream(1);
    state.handle_stream_event(1, StreamEvent::Token("old".to_string()));
    state.open_stream(2);

    // Deliveries on the closed session must not touch any entry.
    state.handle_stream_event(1, StreamEvent::Token(" straggler".to_string()));
    state.handle_stream_event(1, StreamEvent::Done);

    let entries = state.transcript.entries();
    assert_eq!(entries[0].text(), "old");
    assert_eq!(entries[1].text(), "");
    assert!(entries[1].is_pending());
    assert_eq!(state.active_stream().unwrap().id(), 2);
}

#[test]
fn it_drops_events_with_no_active_stream() {
    let mut state = SessionState::new();
    state.handle_stream_event(7, StreamEvent::Token("ghost".to_string()));
    assert!(state.transcript.is_empty());
}

#[test]
fn it_aborts_the_stream_and_keeps_content() -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
    let mut state = SessionState::new();
    state.waiting_for_reply = true;
    state.open_stream(1);
    state.handle_stream_event(1, StreamEvent::Token("so far".to_string()));

    state.abort_stream(&tx)?;

    assert!(matches!(rx.try_recv()?, Action::StreamAbort()));
    assert!(state.active_stream().is_none());
    assert!(!state.waiting_for_reply);
    assert_eq!(state.transcript.entries()[0].text(), "so far");
    return Ok(());
}

#[test]
fn it_requests_termination_once() -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
    let mut state = SessionState::new();

    state.begin_end(&tx)?;
    state.begin_end(&tx)?;

    assert!(matches!(rx.try_recv()?, Action::EndEncounter()));
    assert!(rx.try_recv().is_err());
    assert!(state.ending);
    return Ok(());
}

#[test]
fn it_presents_the_note_for_review() {
    let mut state = SessionState::new();
    state.ending = true;

    state.handle_note_ready(ClinicalNote::fallback(Some("頭痛")));

    assert!(!state.ending);
    let note = state.review.as_ref().unwrap();
    assert!(note.text.contains("**主訴**: 頭痛"));

    state.close_review();
    assert!(state.review.is_none());
}

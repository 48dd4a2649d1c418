use super::StreamSession;
use super::StreamState;

#[test]
fn it_accumulates_deltas_in_order() {
    let mut session = StreamSession::new(1, 10);
    assert_eq!(session.state(), StreamState::Connecting);

    for delta in ["Hel", "lo, ", "world"] {
        session.push_delta(delta);
    }

    assert_eq!(session.state(), StreamState::Streaming);
    assert_eq!(session.buffer(), "Hello, world");
}

#[test]
fn it_accumulates_independent_of_chunk_boundaries() {
    let mut coarse = StreamSession::new(1, 10);
    coarse.push_delta("Hello, world");

    let mut fine = StreamSession::new(2, 11);
    for c in "Hello, world".chars() {
        fine.push_delta(&c.to_string());
    }

    assert_eq!(coarse.buffer(), fine.buffer());
}

#[test]
fn it_keeps_content_on_completion() {
    let mut session = StreamSession::new(1, 10);
    session.push_delta("お大事に");
    session.complete();

    assert_eq!(session.state(), StreamState::Completed);
    assert!(session.is_closed());
    assert_eq!(session.buffer(), "お大事に");
}

#[test]
fn it_keeps_partial_content_on_failure() {
    let mut session = StreamSession::new(1, 10);
    session.push_delta("partial ans");
    session.fail();

    assert_eq!(session.state(), StreamState::Failed);
    assert_eq!(session.buffer(), "partial ans");
}

#[test]
fn it_ignores_events_after_close() {
    let mut session = StreamSession::new(1, 10);
    session.push_delta("final");
    session.complete();

    session.push_delta(" straggler");
    session.fail();

    assert_eq!(session.state(), StreamState::Completed);
    assert_eq!(session.buffer(), "final");
}

#[test]
fn it_can_fail_before_any_delta() {
    let mut session = StreamSession::new(1, 10);
    session.fail();

    assert_eq!(session.state(), StreamState::Failed);
    assert_eq!(session.buffer(), "");
}

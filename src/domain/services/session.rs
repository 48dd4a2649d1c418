#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use anyhow::Result;
use tokio::sync::mpsc;

use super::Transcript;
use crate::domain::models::Action;
use crate::domain::models::Author;
use crate::domain::models::ClinicalNote;
use crate::domain::models::Message;
use crate::domain::models::StreamEvent;
use crate::domain::models::StreamSession;

/// Seeded as the first transcript entry, regardless of whether the
/// greeting template could be fetched.
pub const DISCLAIMER: &str = "これはAIによる問診支援です。医師の診断に代わるものではありません。激しい胸痛・呼吸困難・意識障害など緊急の症状がある場合は、ただちに119番へ連絡してください。";

/// Used when the greeting template cannot be fetched.
pub const DEFAULT_GREETING: &str = "本日はどうなさいましたか？";

/// The encounter chat session controller. Owns the transcript, the single
/// live streaming session, and the note review surface. All mutation runs
/// on the UI task; the transport only talks to this through id-tagged
/// events.
pub struct SessionState {
    pub transcript: Transcript,
    pub waiting_for_reply: bool,
    pub ending: bool,
    pub review: Option<ClinicalNote>,
    pub status_line: Option<String>,
    active_stream: Option<StreamSession>,
}

impl SessionState {
    pub fn new() -> SessionState {
        return SessionState {
            transcript: Transcript::default(),
            waiting_for_reply: false,
            ending: false,
            review: None,
            status_line: None,
            active_stream: None,
        };
    }

    /// Seeds the transcript for a fresh activation: disclaimer first, then
    /// the assistant greeting (fetched template, or the fixed default when
    /// the fetch failed). Re-activation re-seeds unconditionally.
    pub fn bootstrap(&mut self, greeting: Option<String>) {
        let disclaimer_id = self.transcript.allocate_id();
        self.transcript
            .append(Message::new(disclaimer_id, Author::System, DISCLAIMER));

        let greeting_text = greeting.unwrap_or_else(|| return DEFAULT_GREETING.to_string());
        let greeting_id = self.transcript.allocate_id();
        self.transcript
            .append(Message::new(greeting_id, Author::Assistant, &greeting_text));
    }

    /// The submission pipeline: validates, appends the user entry
    /// optimistically, and hands the post to the worker. Returns false when
    /// the input was trimmed-empty and nothing happened.
    pub fn submit(&mut self, input: &str, tx: &mpsc::UnboundedSender<Action>) -> Result<bool> {
        let content = input.trim();
        if content.is_empty() {
            return Ok(false);
        }

        let id = self.transcript.allocate_id();
        self.transcript
            .append(Message::new(id, Author::User, content));
        self.waiting_for_reply = true;

        tx.send(Action::SubmitMessage(content.to_string()))?;
        return Ok(true);
    }

    /// User-initiated termination. The worker ends the encounter and comes
    /// back with a note, generated or fallback; a note always arrives.
    pub fn begin_end(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        if self.ending {
            return Ok(());
        }

        self.ending = true;
        if self.active_stream.is_some() {
            tx.send(Action::StreamAbort())?;
            self.close_active_stream();
        }

        tx.send(Action::EndEncounter())?;
        return Ok(());
    }

    /// Interrupts the in-flight reply, keeping whatever was accumulated.
    pub fn abort_stream(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        if self.active_stream.is_none() {
            return Ok(());
        }

        tx.send(Action::StreamAbort())?;
        self.close_active_stream();
        self.waiting_for_reply = false;
        return Ok(());
    }

    /// Opens a new streaming session: any prior session is closed first (no
    /// queueing, no buffer merge), then a single empty pending assistant
    /// entry is created for the new one.
    pub fn open_stream(&mut self, stream_id: u64) {
        if self.active_stream.is_some() {
            tracing::debug!(stream_id = stream_id, "superseding active stream");
            self.close_active_stream();
        }

        let entry_id = self.transcript.allocate_id();
        self.transcript
            .append(Message::new_pending(entry_id, Author::Assistant));
        self.active_stream = Some(StreamSession::new(stream_id, entry_id));
    }

    /// Applies one streaming payload. Events tagged with anything but the
    /// active session's id are stale deliveries and must never mutate a
    /// transcript entry.
    pub fn handle_stream_event(&mut self, stream_id: u64, event: StreamEvent) {
        let session = match self.active_stream.as_mut() {
            Some(session) if session.id() == stream_id => session,
            _ => {
                tracing::debug!(stream_id = stream_id, "dropping stale stream event");
                return;
            }
        };

        match event {
            StreamEvent::Token(delta) => {
                session.push_delta(&delta);
                let entry_id = session.entry_id();
                let buffer = session.buffer().to_string();
                self.transcript.update_content(entry_id, &buffer);
            }
            StreamEvent::Done => {
                session.complete();
                self.close_active_stream();
                self.waiting_for_reply = false;
            }
            StreamEvent::Failed => {
                // Silent degradation: the accumulated content stays, the
                // progress indicator stops, no retry is scheduled.
                session.fail();
                self.close_active_stream();
                self.waiting_for_reply = false;
            }
        }
    }

    pub fn handle_note_ready(&mut self, note: ClinicalNote) {
        self.ending = false;
        self.review = Some(note);
    }

    /// Clears the review surface. The encounter is over at this point.
    pub fn close_review(&mut self) {
        self.review = None;
        self.status_line = None;
    }

    pub fn active_stream(&self) -> Option<&StreamSession> {
        return self.active_stream.as_ref();
    }

    fn close_active_stream(&mut self) {
        if let Some(session) = self.active_stream.take() {
            self.transcript.finalize(session.entry_id());
        }
    }
}

#[cfg(test)]
#[path = "stream_test.rs"]
mod tests;

/// A single incremental payload delivered on the streaming connection,
/// already stripped of transport framing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamEvent {
    /// One fragment of assistant output.
    Token(String),
    /// The completion sentinel. The accumulated content is final.
    Done,
    /// Transport or server failure. Whatever was accumulated stays as the
    /// final content; no retry follows.
    Failed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StreamState {
    Connecting,
    Streaming,
    Completed,
    Failed,
}

/// The live streaming session for one assistant turn. Owns the delta
/// buffer outright; the transcript only ever sees the full accumulated
/// text through `buffer()`. At most one of these is live per chat view,
/// enforced by supersession in the session controller.
#[derive(Debug)]
pub struct StreamSession {
    id: u64,
    entry_id: u64,
    buffer: String,
    state: StreamState,
}

impl StreamSession {
    pub fn new(id: u64, entry_id: u64) -> StreamSession {
        return StreamSession {
            id,
            entry_id,
            buffer: String::new(),
            state: StreamState::Connecting,
        };
    }

    pub fn id(&self) -> u64 {
        return self.id;
    }

    /// Id of the pending transcript entry this session feeds.
    pub fn entry_id(&self) -> u64 {
        return self.entry_id;
    }

    pub fn state(&self) -> StreamState {
        return self.state;
    }

    pub fn buffer(&self) -> &str {
        return &self.buffer;
    }

    pub fn is_closed(&self) -> bool {
        return matches!(self.state, StreamState::Completed | StreamState::Failed);
    }

    /// Appends a delta in receipt order. Ignored once the session has
    /// closed; deltas never reorder or deduplicate.
    pub fn push_delta(&mut self, delta: &str) {
        if self.is_closed() {
            return;
        }

        self.buffer += delta;
        self.state = StreamState::Streaming;
    }

    pub fn complete(&mut self) {
        if self.is_closed() {
            return;
        }

        self.state = StreamState::Completed;
    }

    pub fn fail(&mut self) {
        if self.is_closed() {
            return;
        }

        self.state = StreamState::Failed;
    }
}

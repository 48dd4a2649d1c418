#[cfg(test)]
#[path = "transcript_test.rs"]
mod tests;

use crate::domain::models::Message;

/// Ordered, append-mostly log of chat entries. The sole holder of
/// display-ready conversation state: display order is always creation
/// order, and updates never reorder.
#[derive(Default)]
pub struct Transcript {
    entries: Vec<Message>,
    next_id: u64,
}

impl Transcript {
    /// Monotonic per-store id. Wall-clock derived ids collide under rapid
    /// successive actions; a counter cannot.
    pub fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        return self.next_id;
    }

    pub fn append(&mut self, entry: Message) {
        self.entries.push(entry);
    }

    /// Replaces (not appends to) the content of a pending entry. No-op when
    /// the id is absent or the entry has already been finalized.
    pub fn update_content(&mut self, id: u64, full_text: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|e| return e.id == id) {
            if entry.is_pending() {
                entry.replace_text(full_text);
            }
        }
    }

    /// Makes the entry's content immutable. No-op on unknown ids.
    pub fn finalize(&mut self, id: u64) {
        if let Some(entry) = self.entries.iter_mut().find(|e| return e.id == id) {
            entry.finalize();
        }
    }

    pub fn entries(&self) -> &[Message] {
        return &self.entries;
    }

    pub fn is_empty(&self) -> bool {
        return self.entries.is_empty();
    }
}

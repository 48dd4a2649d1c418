#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use chrono::DateTime;
use chrono::Local;

use super::Author;

/// One attributed, timestamped unit of transcript content. A message is
/// created either finalized (user and seeded entries) or pending (the
/// single entry an open stream writes into). Once finalized its text never
/// changes again.
#[derive(Clone, Debug)]
pub struct Message {
    pub id: u64,
    pub author: Author,
    pub created_at: DateTime<Local>,
    text: String,
    pending: bool,
}

impl Message {
    pub fn new(id: u64, author: Author, text: &str) -> Message {
        return Message {
            id,
            author,
            created_at: Local::now(),
            text: text.to_string().replace('\t', "  "),
            pending: false,
        };
    }

    pub fn new_pending(id: u64, author: Author) -> Message {
        return Message {
            id,
            author,
            created_at: Local::now(),
            text: String::new(),
            pending: true,
        };
    }

    pub fn text(&self) -> &str {
        return &self.text;
    }

    pub fn is_pending(&self) -> bool {
        return self.pending;
    }

    /// Replaces the full text. Only valid while pending; the transcript
    /// store gates calls accordingly.
    pub(crate) fn replace_text(&mut self, text: &str) {
        self.text = text.to_string().replace('\t', "  ");
    }

    pub(crate) fn finalize(&mut self) {
        self.pending = false;
    }

    /// Wraps the text to the given width for terminal rendering.
    pub fn as_string_lines(&self, line_max_width: usize) -> Vec<String> {
        return wrap_text(&self.text, line_max_width);
    }
}

/// Word-based wrapping with a char-level fallback for words longer than
/// the line (Japanese text carries no spaces).
pub fn wrap_text(text: &str, line_max_width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();

    for full_line in text.split('\n') {
        if full_line.trim().is_empty() {
            lines.push(" ".to_string());
            continue;
        }

        let mut char_count = 0;
        let mut current_lines: Vec<String> = vec![];

        for word in full_line.split(' ') {
            let word_len = word.chars().count();
            if word_len > line_max_width {
                if !current_lines.is_empty() {
                    lines.push(current_lines.join(" ").trim_end().to_string());
                    current_lines = vec![];
                    char_count = 0;
                }
                for chunk in chunk_chars(word, line_max_width) {
                    if chunk.chars().count() == line_max_width {
                        lines.push(chunk);
                    } else {
                        char_count = chunk.chars().count() + 1;
                        current_lines = vec![chunk];
                    }
                }
                continue;
            }

            if word_len + char_count + 1 > line_max_width {
                lines.push(current_lines.join(" ").trim_end().to_string());
                current_lines = vec![word.to_string()];
                char_count = word_len + 1;
            } else {
                current_lines.push(word.to_string());
                char_count += word_len + 1;
            }
        }
        if !current_lines.is_empty() {
            lines.push(current_lines.join(" ").trim_end().to_string());
        }
    }

    return lines;
}

fn chunk_chars(word: &str, width: usize) -> Vec<String> {
    let mut chunks: Vec<String> = vec![];
    let mut current = String::new();

    for c in word.chars() {
        current.push(c);
        if current.chars().count() == width {
            chunks.push(current.clone());
            current.clear();
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    return chunks;
}

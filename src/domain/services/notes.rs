#[cfg(test)]
#[path = "notes_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use chrono::Local;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;

/// Writes reviewed notes to local Markdown files. Nothing here is read
/// back by the app; the files exist for the user.
pub struct Notes {
    pub notes_dir: path::PathBuf,
}

impl Default for Notes {
    fn default() -> Notes {
        return Notes::new(path::PathBuf::from(Config::get(ConfigKey::NotesDir)));
    }
}

impl Notes {
    pub fn new(notes_dir: path::PathBuf) -> Notes {
        return Notes { notes_dir };
    }

    /// Saves the note text byte-for-byte and returns the file path.
    pub async fn save(&self, encounter_id: &str, text: &str) -> Result<path::PathBuf> {
        if !self.notes_dir.exists() {
            fs::create_dir_all(&self.notes_dir).await?;
        }

        let timestamp = Local::now().format("%Y%m%d-%H%M%S");
        let file_path = self
            .notes_dir
            .join(format!("karte-{encounter_id}-{timestamp}.md"));

        let mut file = fs::File::create(&file_path).await?;
        file.write_all(text.as_bytes()).await?;

        return Ok(file_path);
    }
}

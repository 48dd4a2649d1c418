use std::env;
use std::process;

use anyhow::Result;
use tokio::fs;

use super::Notes;

fn temp_notes_dir(tag: &str) -> std::path::PathBuf {
    return env::temp_dir().join(format!("monshin-notes-test-{}-{tag}", process::id()));
}

#[tokio::test]
async fn it_saves_notes_byte_for_byte() -> Result<()> {
    let dir = temp_notes_dir("roundtrip");
    let notes = Notes::new(dir.clone());

    let text = test_utils::note_fixture();
    let path = notes.save("enc-1", text).await?;

    let saved = fs::read(&path).await?;
    assert_eq!(saved, text.as_bytes());

    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("karte-enc-1-"));
    assert!(name.ends_with(".md"));

    fs::remove_dir_all(dir).await?;
    return Ok(());
}

#[tokio::test]
async fn it_creates_the_notes_dir_when_missing() -> Result<()> {
    let dir = temp_notes_dir("mkdir").join("nested");
    let notes = Notes::new(dir.clone());

    let path = notes.save("enc-2", "お大事に\n").await?;
    assert!(path.exists());

    fs::remove_dir_all(dir.parent().unwrap()).await?;
    return Ok(());
}

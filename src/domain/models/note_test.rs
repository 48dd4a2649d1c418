use chrono::Local;

use super::ClinicalNote;
use super::NoteSource;

#[test]
fn it_builds_backend_notes_verbatim() {
    let note = ClinicalNote::from_backend(
        test_utils::note_fixture().to_string(),
        Some("昨夜からの腹痛".to_string()),
    );

    assert_eq!(note.source, NoteSource::Backend);
    assert_eq!(note.text, test_utils::note_fixture());
    assert_eq!(note.chief_complaint.as_deref(), Some("昨夜からの腹痛"));
}

#[test]
fn it_builds_fallback_with_chief_complaint() {
    let note = ClinicalNote::fallback(Some("頭痛が続く"));

    assert_eq!(note.source, NoteSource::Fallback);
    assert!(note.text.starts_with("# 内科カルテ"));
    assert!(note.text.contains("**主訴**: 頭痛が続く"));
    assert!(note.text.contains(
        &format!("作成時刻: {}", note.generated_at.format("%Y-%m-%d %H:%M"))
    ));
}

#[test]
fn it_builds_fallback_with_placeholder() {
    let note = ClinicalNote::fallback(None);
    assert!(note.text.contains("**主訴**: （未入力）"));
    assert!(note.chief_complaint.is_none());

    let blank = ClinicalNote::fallback(Some("   "));
    assert!(blank.text.contains("**主訴**: （未入力）"));
}

#[test]
fn it_stamps_generation_time() {
    let before = Local::now();
    let note = ClinicalNote::fallback(None);
    let after = Local::now();

    assert!(note.generated_at >= before);
    assert!(note.generated_at <= after);
}

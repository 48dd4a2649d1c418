use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time;

use super::ActionsService;
use crate::domain::models::Action;
use crate::domain::models::ApiBox;
use crate::domain::models::Author;
use crate::domain::models::ClinicalNote;
use crate::domain::models::ConsultApi;
use crate::domain::models::EncounterSummary;
use crate::domain::models::Event;
use crate::domain::models::NoteSource;

/// Ending always fails; note generation is observable and optionally
/// fails too.
struct StubApi {
    note_generation_fails: bool,
    note_requested: Arc<AtomicBool>,
}

#[async_trait]
impl ConsultApi for StubApi {
    async fn health_check(&self) -> Result<()> {
        return Ok(());
    }

    async fn create_encounter(&self, _chief_complaint: Option<&str>) -> Result<String> {
        return Ok("enc-stub".to_string());
    }

    async fn fetch_greeting(&self) -> Result<String> {
        bail!("not exercised");
    }

    async fn post_message(
        &self,
        _encounter_id: &str,
        _author: Author,
        _content: &str,
    ) -> Result<()> {
        return Ok(());
    }

    async fn stream_reply<'a>(
        &self,
        _encounter_id: &str,
        _stream_id: u64,
        _tx: &'a mpsc::UnboundedSender<Event>,
    ) -> Result<()> {
        return Ok(());
    }

    async fn end_encounter(&self, _encounter_id: &str) -> Result<()> {
        bail!("ending failed");
    }

    async fn generate_note(&self, _encounter_id: &str) -> Result<ClinicalNote> {
        self.note_requested.store(true, Ordering::SeqCst);
        if self.note_generation_fails {
            bail!("note generation failed");
        }

        return Ok(ClinicalNote::from_backend("# カルテ本文".to_string(), None));
    }

    async fn list_encounters(&self, _status: Option<&str>) -> Result<Vec<EncounterSummary>> {
        return Ok(vec![]);
    }
}

fn start_worker(note_generation_fails: bool) -> (
    Arc<AtomicBool>,
    mpsc::UnboundedSender<Action>,
    mpsc::UnboundedReceiver<Event>,
) {
    let note_requested = Arc::new(AtomicBool::new(false));
    let api: ApiBox = Box::new(StubApi {
        note_generation_fails,
        note_requested: note_requested.clone(),
    });

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();
    tokio::spawn(async move {
        return ActionsService::start(api, event_tx, &mut action_rx).await;
    });

    return (note_requested, action_tx, event_rx);
}

async fn recv_note(rx: &mut mpsc::UnboundedReceiver<Event>) -> Result<ClinicalNote> {
    let event = time::timeout(Duration::from_secs(2), rx.recv()).await?;
    match event.unwrap() {
        Event::NoteReady(note) => return Ok(note),
        _ => bail!("Wrong event type"),
    }
}

#[tokio::test]
async fn it_generates_a_note_even_when_ending_fails() -> Result<()> {
    let (note_requested, action_tx, mut event_rx) = start_worker(false);

    action_tx.send(Action::EndEncounter())?;
    let note = recv_note(&mut event_rx).await?;

    assert!(note_requested.load(Ordering::SeqCst));
    assert_eq!(note.source, NoteSource::Backend);
    assert_eq!(note.text, "# カルテ本文");
    return Ok(());
}

#[tokio::test]
async fn it_falls_back_to_the_template_on_double_failure() -> Result<()> {
    let (note_requested, action_tx, mut event_rx) = start_worker(true);

    action_tx.send(Action::EndEncounter())?;
    let note = recv_note(&mut event_rx).await?;

    assert!(note_requested.load(Ordering::SeqCst));
    assert_eq!(note.source, NoteSource::Fallback);
    assert!(note.text.starts_with("# 内科カルテ"));
    assert!(note.text.contains("**主訴**: （未入力）"));
    assert!(note.text.contains("作成時刻: "));
    return Ok(());
}

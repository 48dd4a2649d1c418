#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::clipboard::ClipboardService;
use super::Notes;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::ApiBox;
use crate::domain::models::Author;
use crate::domain::models::ClinicalNote;
use crate::domain::models::Event;
use crate::domain::models::StreamEvent;

async fn end_encounter(api: &ApiBox, tx: &mpsc::UnboundedSender<Event>) -> Result<()> {
    let encounter_id = Config::get(ConfigKey::EncounterId);

    // Best effort. A failed end never blocks note generation.
    if let Err(err) = api.end_encounter(&encounter_id).await {
        tracing::warn!(error = ?err, encounter_id = encounter_id, "failed to end encounter");
    }

    let note = match api.generate_note(&encounter_id).await {
        Ok(note) => {
            if let Some(cc) = &note.chief_complaint {
                Config::set(ConfigKey::ChiefComplaint, cc);
            }
            note
        }
        Err(err) => {
            tracing::warn!(error = ?err, encounter_id = encounter_id, "note generation failed, using fallback template");
            let cc = Config::get(ConfigKey::ChiefComplaint);
            if cc.is_empty() {
                ClinicalNote::fallback(None)
            } else {
                ClinicalNote::fallback(Some(&cc))
            }
        }
    };

    tx.send(Event::NoteReady(note))?;
    return Ok(());
}

fn copy_note(text: String, tx: &mpsc::UnboundedSender<Event>) -> Result<()> {
    if let Err(err) = ClipboardService::set(text) {
        tracing::warn!(error = ?err, "failed to copy note to clipboard");
        return Ok(());
    }

    tx.send(Event::NoteCopied())?;
    return Ok(());
}

async fn save_note(text: String, tx: &mpsc::UnboundedSender<Event>) -> Result<()> {
    let encounter_id = Config::get(ConfigKey::EncounterId);
    match Notes::default().save(&encounter_id, &text).await {
        Ok(path) => {
            tx.send(Event::NoteSaved(path))?;
        }
        Err(err) => {
            tracing::warn!(error = ?err, "failed to save note");
        }
    }

    return Ok(());
}

pub struct ActionsService {}

impl ActionsService {
    /// Worker loop between the UI and the backend. Owns the single in-flight
    /// streaming task: opening a new stream aborts the previous task before
    /// anything else, so at most one connection is live per view.
    pub async fn start(
        api: ApiBox,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let api = Arc::new(api);
        let mut next_stream_id: u64 = 0;

        // Lazy default.
        let mut worker: JoinHandle<Result<()>> = tokio::spawn(async {
            return Ok(());
        });

        loop {
            let event = rx.recv().await;
            if event.is_none() {
                continue;
            }

            match event.unwrap() {
                Action::SubmitMessage(content) => {
                    let encounter_id = Config::get(ConfigKey::EncounterId);
                    let res = api
                        .post_message(&encounter_id, Author::User, &content)
                        .await;
                    if let Err(err) = res {
                        // Explicit gap: the optimistic entry stays and no
                        // user-facing error is raised.
                        tracing::error!(error = ?err, encounter_id = encounter_id, "failed to post message");
                        continue;
                    }

                    worker.abort();
                    next_stream_id += 1;
                    let stream_id = next_stream_id;
                    tx.send(Event::StreamOpened(stream_id))?;

                    let worker_tx = tx.clone();
                    let worker_api = api.clone();
                    worker = tokio::spawn(async move {
                        let res = worker_api
                            .stream_reply(&encounter_id, stream_id, &worker_tx)
                            .await;

                        if let Err(err) = res {
                            tracing::warn!(error = ?err, stream_id = stream_id, "stream closed with error");
                            worker_tx.send(Event::Stream(stream_id, StreamEvent::Failed))?;
                        }

                        return Ok(());
                    });
                }
                Action::StreamAbort() => {
                    worker.abort();
                }
                Action::EndEncounter() => {
                    worker.abort();
                    end_encounter(&api, &tx).await?;
                }
                Action::CopyNote(text) => {
                    copy_note(text, &tx)?;
                }
                Action::SaveNote(text) => {
                    save_note(text, &tx).await?;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tokio::time;
use tokio_util::io::StreamReader;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Author;
use crate::domain::models::ClinicalNote;
use crate::domain::models::ConsultApi;
use crate::domain::models::EncounterSummary;
use crate::domain::models::Event;
use crate::domain::models::StreamEvent;

fn convert_err(err: reqwest::Error) -> std::io::Error {
    let err_msg = err.to_string();
    return std::io::Error::new(std::io::ErrorKind::Interrupted, err_msg);
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct GreetingResponse {
    content: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CreateEncounterRequest {
    chief_complaint: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CreateEncounterResponse {
    encounter_id: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct MessageRequest {
    role: String,
    content: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct NoteResponse {
    note_md: String,
    chief_complaint: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct TokenPayload {
    delta: String,
}

/// One frame of the server-push channel: an `event:` name and its `data:`
/// payload.
fn dispatch_sse_frame(
    event_name: &str,
    payload: &str,
    stream_id: u64,
    tx: &mpsc::UnboundedSender<Event>,
) -> Result<bool> {
    match event_name {
        "token" => {
            // Malformed fragments degrade to literal delta text rather
            // than aborting the session.
            let delta = match serde_json::from_str::<TokenPayload>(payload) {
                Ok(token) => token.delta,
                Err(_) => payload.to_string(),
            };
            tx.send(Event::Stream(stream_id, StreamEvent::Token(delta)))?;
            return Ok(false);
        }
        "done" => {
            tx.send(Event::Stream(stream_id, StreamEvent::Done))?;
            return Ok(true);
        }
        "error" => {
            bail!("server reported a stream error: {payload}");
        }
        other => {
            tracing::debug!(event = other, "ignoring unknown stream event");
            return Ok(false);
        }
    }
}

pub struct HttpApi {
    url: String,
    timeout: String,
    stream_timeout: String,
}

impl Default for HttpApi {
    fn default() -> HttpApi {
        return HttpApi {
            url: Config::get(ConfigKey::ServerUrl),
            timeout: Config::get(ConfigKey::HealthCheckTimeout),
            stream_timeout: Config::get(ConfigKey::StreamTimeout),
        };
    }
}

#[async_trait]
impl ConsultApi for HttpApi {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        let res = reqwest::Client::new()
            .get(format!("{url}/api/health", url = self.url))
            .timeout(Duration::from_millis(self.timeout.parse::<u64>()?))
            .send()
            .await;

        if res.is_err() {
            tracing::error!(error = ?res.unwrap_err(), "consult service is not reachable");
            bail!("consult service is not reachable");
        }

        let res = res.unwrap();
        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "consult service health check failed");
            bail!("consult service health check failed");
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn create_encounter(&self, chief_complaint: Option<&str>) -> Result<String> {
        let req = CreateEncounterRequest {
            chief_complaint: chief_complaint.map(|cc| return cc.to_string()),
        };

        let res = reqwest::Client::new()
            .post(format!("{url}/consult/new", url = self.url))
            .json(&req)
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "failed to create encounter");
            bail!("failed to create encounter");
        }

        let body = res.json::<CreateEncounterResponse>().await?;
        return Ok(body.encounter_id);
    }

    #[allow(clippy::implicit_return)]
    async fn fetch_greeting(&self) -> Result<String> {
        let res = reqwest::Client::new()
            .get(format!("{url}/api/templates/first-message", url = self.url))
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "failed to fetch greeting template");
            bail!("failed to fetch greeting template");
        }

        let body = res.json::<GreetingResponse>().await?;
        return Ok(body.content);
    }

    #[allow(clippy::implicit_return)]
    async fn post_message(&self, encounter_id: &str, author: Author, content: &str) -> Result<()> {
        let req = MessageRequest {
            role: author.wire_name().to_string(),
            content: content.to_string(),
        };

        let res = reqwest::Client::new()
            .post(format!(
                "{url}/api/encounters/{encounter_id}/messages",
                url = self.url
            ))
            .json(&req)
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                encounter_id = encounter_id,
                "failed to post message"
            );
            bail!("failed to post message");
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn stream_reply<'a>(
        &self,
        encounter_id: &str,
        stream_id: u64,
        tx: &'a mpsc::UnboundedSender<Event>,
    ) -> Result<()> {
        let res = reqwest::Client::new()
            .get(format!(
                "{url}/api/encounters/{encounter_id}/stream",
                url = self.url
            ))
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                encounter_id = encounter_id,
                "failed to open streaming connection"
            );
            bail!("failed to open streaming connection");
        }

        let read_timeout = Duration::from_millis(self.stream_timeout.parse::<u64>()?);
        let stream = res.bytes_stream().map_err(convert_err);
        let mut lines_reader = StreamReader::new(stream).lines();

        // Named-event framing: an `event:` line announces the type of the
        // `data:` line that follows; a blank line ends the frame.
        let mut event_name = "message".to_string();
        loop {
            let line = match time::timeout(read_timeout, lines_reader.next_line()).await {
                Ok(Ok(Some(line))) => line,
                Ok(Ok(None)) => {
                    bail!("stream ended without a completion sentinel");
                }
                Ok(Err(err)) => {
                    bail!("stream transport failed: {err}");
                }
                Err(_) => {
                    bail!("timed out waiting for the next stream payload");
                }
            };

            // Only framing gets stripped: the CR of a CRLF line ending and
            // the single space after the field name. Payload whitespace is
            // significant in raw deltas.
            let line = match line.strip_suffix('\r') {
                Some(stripped) => stripped.to_string(),
                None => line,
            };
            if line.is_empty() {
                event_name = "message".to_string();
                continue;
            }

            if let Some(name) = line.strip_prefix("event:") {
                event_name = name.trim().to_string();
                continue;
            }

            if let Some(payload) = line.strip_prefix("data:") {
                let payload = payload.strip_prefix(' ').unwrap_or(payload);
                let done = dispatch_sse_frame(&event_name, payload, stream_id, tx)?;
                if done {
                    return Ok(());
                }
            }
        }
    }

    #[allow(clippy::implicit_return)]
    async fn end_encounter(&self, encounter_id: &str) -> Result<()> {
        let res = reqwest::Client::new()
            .post(format!(
                "{url}/api/encounters/{encounter_id}/end",
                url = self.url
            ))
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                encounter_id = encounter_id,
                "failed to end encounter"
            );
            bail!("failed to end encounter");
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn generate_note(&self, encounter_id: &str) -> Result<ClinicalNote> {
        let res = reqwest::Client::new()
            .post(format!(
                "{url}/api/encounters/{encounter_id}/clinical-note",
                url = self.url
            ))
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                encounter_id = encounter_id,
                "failed to generate clinical note"
            );
            bail!("failed to generate clinical note");
        }

        let body = res.json::<NoteResponse>().await?;
        return Ok(ClinicalNote::from_backend(body.note_md, body.chief_complaint));
    }

    #[allow(clippy::implicit_return)]
    async fn list_encounters(&self, status: Option<&str>) -> Result<Vec<EncounterSummary>> {
        let mut req = reqwest::Client::new().get(format!("{url}/api/encounters", url = self.url));
        if let Some(status) = status {
            req = req.query(&[("status", status)]);
        }

        let res = req.send().await?;
        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "failed to list encounters");
            bail!("failed to list encounters");
        }

        let body = res.json::<Vec<EncounterSummary>>().await?;
        return Ok(body);
    }
}

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use super::Author;
use super::ClinicalNote;
use super::EncounterSummary;
use super::Event;

/// The backend boundary of the session controller. The service owns all
/// durable state; this client only references encounters by id.
#[async_trait]
pub trait ConsultApi {
    /// Used at startup to verify the service is reachable before entering
    /// the chat view.
    async fn health_check(&self) -> Result<()>;

    /// Opens a new encounter and returns its id.
    async fn create_encounter(&self, chief_complaint: Option<&str>) -> Result<String>;

    /// Fetches the greeting template used to seed the transcript.
    async fn fetch_greeting(&self) -> Result<String>;

    /// Posts one message to the encounter. Status only; the reply arrives
    /// over the streaming connection.
    async fn post_message(&self, encounter_id: &str, author: Author, content: &str) -> Result<()>;

    /// Opens the incremental-response connection and forwards each framed
    /// payload as an id-tagged stream event, strictly in receipt order.
    /// Returns once the connection closes, for any reason.
    async fn stream_reply<'a>(
        &self,
        encounter_id: &str,
        stream_id: u64,
        tx: &'a mpsc::UnboundedSender<Event>,
    ) -> Result<()>;

    /// Marks the encounter closed server side. Best effort; callers carry
    /// on when this fails.
    async fn end_encounter(&self, encounter_id: &str) -> Result<()>;

    /// Requests the generated clinical note for the encounter.
    async fn generate_note(&self, encounter_id: &str) -> Result<ClinicalNote>;

    async fn list_encounters(&self, status: Option<&str>) -> Result<Vec<EncounterSummary>>;
}

pub type ApiBox = Box<dyn ConsultApi + Send + Sync>;

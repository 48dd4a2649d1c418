use serde_derive::Deserialize;
use serde_derive::Serialize;

/// One row of the encounters list view. Field names match the backend's
/// camelCase payload.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterSummary {
    pub id: String,
    pub status: String,
    pub chief_complaint: Option<String>,
    pub started_at: Option<String>,
    pub ended_at: Option<String>,
    pub triage_level: Option<String>,
    pub needs_attention: bool,
}

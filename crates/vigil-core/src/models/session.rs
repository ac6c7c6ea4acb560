use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Persisted record of an assessment session, as kept by a Session
/// Persistence collaborator. Only the aggregate result is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionRecord {
    pub id: Uuid,
    pub subject_ref: String,
    pub instrument_name: String,
    pub date: jiff::civil::Date,
    pub status: RecordStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_risk_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_score: Option<i64>,
    pub created_at: jiff::Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<jiff::Timestamp>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RecordStatus {
    Open,
    Submitted,
}

/// Payload handed to Session Persistence on submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmittedResult {
    pub final_risk_level: String,
    pub total_score: i64,
}

impl SessionRecord {
    pub fn open(
        subject_ref: impl Into<String>,
        instrument_name: impl Into<String>,
        date: jiff::civil::Date,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject_ref: subject_ref.into(),
            instrument_name: instrument_name.into(),
            date,
            status: RecordStatus::Open,
            final_risk_level: None,
            total_score: None,
            created_at: jiff::Timestamp::now(),
            submitted_at: None,
        }
    }
}

use std::collections::HashMap;

use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use vigil_core::models::session::{RecordStatus, SessionRecord, SubmittedResult};

use crate::BoxFuture;
use crate::error::SessionError;

/// Where session records live. Only the aggregate result is submitted;
/// per-item answers stay with the session.
pub trait SessionPersistence: Send + Sync {
    /// Create a session record and return its id.
    fn open<'a>(
        &'a self,
        subject_ref: &'a str,
        instrument_name: &'a str,
        date: jiff::civil::Date,
    ) -> BoxFuture<'a, Result<Uuid, SessionError>>;

    /// Attach the final result. An `Err` means the submission was not
    /// acknowledged.
    fn submit<'a>(
        &'a self,
        record_id: Uuid,
        result: &'a SubmittedResult,
    ) -> BoxFuture<'a, Result<(), SessionError>>;
}

/// Process-local persistence, used when no data directory is configured.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    records: Mutex<HashMap<Uuid, SessionRecord>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, id: Uuid) -> Option<SessionRecord> {
        self.records.lock().await.get(&id).cloned()
    }

    pub async fn records(&self) -> Vec<SessionRecord> {
        let mut records: Vec<_> = self.records.lock().await.values().cloned().collect();
        records.sort_by_key(|r| r.created_at);
        records
    }
}

impl SessionPersistence for MemoryPersistence {
    fn open<'a>(
        &'a self,
        subject_ref: &'a str,
        instrument_name: &'a str,
        date: jiff::civil::Date,
    ) -> BoxFuture<'a, Result<Uuid, SessionError>> {
        Box::pin(async move {
            let record = SessionRecord::open(subject_ref, instrument_name, date);
            let id = record.id;
            self.records.lock().await.insert(id, record);
            info!(record_id = %id, "session record opened");
            Ok(id)
        })
    }

    fn submit<'a>(
        &'a self,
        record_id: Uuid,
        result: &'a SubmittedResult,
    ) -> BoxFuture<'a, Result<(), SessionError>> {
        Box::pin(async move {
            let mut records = self.records.lock().await;
            let record = records.get_mut(&record_id).ok_or_else(|| {
                SessionError::Persistence(format!("no session record {record_id}"))
            })?;
            apply_submission(record, result)
        })
    }
}

/// Mark `record` submitted with `result`. A record only accepts one
/// submission.
pub fn apply_submission(
    record: &mut SessionRecord,
    result: &SubmittedResult,
) -> Result<(), SessionError> {
    if record.status == RecordStatus::Submitted {
        return Err(SessionError::Persistence(format!(
            "session record {} already submitted",
            record.id
        )));
    }
    record.status = RecordStatus::Submitted;
    record.final_risk_level = Some(result.final_risk_level.clone());
    record.total_score = Some(result.total_score);
    record.submitted_at = Some(jiff::Timestamp::now());
    Ok(())
}

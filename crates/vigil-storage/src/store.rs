use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use vigil_core::keys;
use vigil_core::models::instrument::{InstrumentDefinition, InstrumentSummary};
use vigil_core::models::session::{SessionRecord, SubmittedResult};
use vigil_session::BoxFuture;
use vigil_session::catalog::{InstrumentCatalog, unavailable};
use vigil_session::error::SessionError;
use vigil_session::persistence::{SessionPersistence, apply_submission};

use crate::error::StorageError;
use crate::state;

/// JSON documents under one data directory:
/// `instruments/<id>.json` and `sessions/<uuid>.json`.
pub struct JsonStore {
    root: PathBuf,
    // Serializes read-modify-write of session records.
    write_lock: Mutex<()>,
}

impl JsonStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn put_instrument(&self, definition: &InstrumentDefinition) -> Result<(), StorageError> {
        state::save_state(&self.root, &keys::instrument(&definition.id)?, definition).await
    }

    pub async fn load_instrument(&self, id: &str) -> Result<InstrumentDefinition, StorageError> {
        state::load_state(&self.root, &keys::instrument(id)?).await
    }

    /// Every readable definition. Unreadable files are logged and skipped.
    pub async fn instruments(&self) -> Result<Vec<InstrumentDefinition>, StorageError> {
        let mut definitions = Vec::new();
        for key in crate::objects::list_objects(&self.root, keys::INSTRUMENTS_PREFIX).await? {
            match state::load_state::<InstrumentDefinition>(&self.root, &key).await {
                Ok(definition) => definitions.push(definition),
                Err(e) => warn!(key = %key, error = %e, "skipping unreadable instrument"),
            }
        }
        Ok(definitions)
    }

    pub async fn session_record(&self, id: Uuid) -> Result<SessionRecord, StorageError> {
        state::load_state(&self.root, &keys::session(id)).await
    }

    pub async fn session_records(&self) -> Result<Vec<SessionRecord>, StorageError> {
        let mut records = Vec::new();
        for key in crate::objects::list_objects(&self.root, keys::SESSIONS_PREFIX).await? {
            let id = keys::session_id_from_key(&key)?;
            records.push(self.session_record(id).await?);
        }
        records.sort_by_key(|r| r.created_at);
        Ok(records)
    }

    async fn create_record(
        &self,
        subject_ref: &str,
        instrument_name: &str,
        date: jiff::civil::Date,
    ) -> Result<Uuid, StorageError> {
        let record = SessionRecord::open(subject_ref, instrument_name, date);
        state::save_state(&self.root, &keys::session(record.id), &record).await?;
        info!(record_id = %record.id, subject_ref, instrument_name, "session record opened");
        Ok(record.id)
    }

    async fn submit_record(
        &self,
        record_id: Uuid,
        result: &SubmittedResult,
    ) -> Result<(), SessionError> {
        let _guard = self.write_lock.lock().await;
        let mut record = self.session_record(record_id).await.map_err(persistence)?;
        apply_submission(&mut record, result)?;
        state::save_state(&self.root, &keys::session(record_id), &record)
            .await
            .map_err(persistence)?;
        info!(
            record_id = %record_id,
            risk_level = %result.final_risk_level,
            "session record submitted"
        );
        Ok(())
    }
}

impl InstrumentCatalog for JsonStore {
    fn list_active(&self) -> BoxFuture<'_, Result<Vec<InstrumentSummary>, SessionError>> {
        Box::pin(async {
            let definitions = self
                .instruments()
                .await
                .map_err(|e| unavailable("*", e.to_string()))?;
            Ok(definitions
                .iter()
                .filter(|d| d.active)
                .map(InstrumentDefinition::summary)
                .collect())
        })
    }

    fn get<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, Result<InstrumentDefinition, SessionError>> {
        Box::pin(async move {
            self.load_instrument(id).await.map_err(|e| match e {
                StorageError::Serialization(e) => SessionError::MalformedInstrument {
                    instrument_id: id.to_string(),
                    reason: e.to_string(),
                },
                other => unavailable(id, other.to_string()),
            })
        })
    }
}

impl SessionPersistence for JsonStore {
    fn open<'a>(
        &'a self,
        subject_ref: &'a str,
        instrument_name: &'a str,
        date: jiff::civil::Date,
    ) -> BoxFuture<'a, Result<Uuid, SessionError>> {
        Box::pin(async move {
            self.create_record(subject_ref, instrument_name, date)
                .await
                .map_err(persistence)
        })
    }

    fn submit<'a>(
        &'a self,
        record_id: Uuid,
        result: &'a SubmittedResult,
    ) -> BoxFuture<'a, Result<(), SessionError>> {
        Box::pin(async move { self.submit_record(record_id, result).await })
    }
}

fn persistence(err: StorageError) -> SessionError {
    SessionError::Persistence(err.to_string())
}

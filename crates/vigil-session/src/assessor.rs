use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use vigil_core::models::instrument::InstrumentSummary;
use vigil_core::models::result::AssessmentResult;
use vigil_core::models::session::SubmittedResult;
use vigil_instruments::model::Instrument;

use crate::catalog::{InstrumentCatalog, unavailable};
use crate::error::SessionError;
use crate::persistence::SessionPersistence;
use crate::session::{
    LoadedInstrument, OpenRequest, PendingSubmission, Session, SubmissionReceipt, Ticket,
};

/// An instrument fetched and validated for an [`OpenRequest`], not yet
/// backed by a persistence record.
#[derive(Debug, Clone)]
pub struct ResolvedInstrument {
    pub ticket: Ticket,
    pub subject_ref: String,
    pub instrument: Arc<Instrument>,
}

/// Drives the collaborator round-trips of a session: catalog fetch and
/// record creation on open, result delivery on submit.
///
/// Validated instruments are cached by id and shared read-only between
/// sessions.
pub struct Assessor {
    catalog: Arc<dyn InstrumentCatalog>,
    persistence: Arc<dyn SessionPersistence>,
    cache: Mutex<HashMap<String, Arc<Instrument>>>,
}

impl Assessor {
    pub fn new(
        catalog: Arc<dyn InstrumentCatalog>,
        persistence: Arc<dyn SessionPersistence>,
    ) -> Self {
        Self {
            catalog,
            persistence,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub async fn list_instruments(&self) -> Result<Vec<InstrumentSummary>, SessionError> {
        self.catalog.list_active().await
    }

    /// Fetch and validate an instrument, or return the cached copy.
    pub async fn instrument(&self, id: &str) -> Result<Arc<Instrument>, SessionError> {
        if let Some(cached) = self.cache.lock().await.get(id) {
            return Ok(Arc::clone(cached));
        }

        let definition = self.catalog.get(id).await?;
        if definition.id != id {
            return Err(unavailable(
                id,
                format!("catalog returned instrument '{}'", definition.id),
            ));
        }
        let instrument = Arc::new(Instrument::from_definition(definition).inspect_err(|e| {
            warn!(instrument_id = id, error = %e, "catalog served a malformed instrument");
        })?);

        let mut cache = self.cache.lock().await;
        let entry = cache.entry(id.to_string()).or_insert(instrument);
        Ok(Arc::clone(entry))
    }

    /// Drop a cached instrument so the next open refetches it.
    pub async fn invalidate(&self, id: &str) {
        self.cache.lock().await.remove(id);
    }

    /// Resolve an [`OpenRequest`] against the catalog: load the
    /// instrument and reject inactive ones.
    pub async fn fetch(
        &self,
        request: &OpenRequest,
        instrument_id: &str,
    ) -> Result<ResolvedInstrument, SessionError> {
        let instrument = self.instrument(instrument_id).await?;
        if !instrument.is_active() {
            return Err(unavailable(instrument_id, "instrument is inactive"));
        }

        Ok(ResolvedInstrument {
            ticket: request.ticket,
            subject_ref: request.subject_ref.clone(),
            instrument,
        })
    }

    /// Open the persistence record for a fetched instrument. Nothing is
    /// written when `session` has moved past the request's ticket.
    pub async fn open_record(
        &self,
        session: &Session,
        resolved: ResolvedInstrument,
    ) -> Result<LoadedInstrument, SessionError> {
        if !session.is_current(&resolved.ticket) {
            debug!(session_id = %session.id(), "skipping record for superseded open");
            return Err(SessionError::StaleResponse);
        }

        let today = jiff::Zoned::now().date();
        let record_id = self
            .persistence
            .open(&resolved.subject_ref, resolved.instrument.name(), today)
            .await?;

        Ok(LoadedInstrument {
            ticket: resolved.ticket,
            instrument: resolved.instrument,
            record_id,
        })
    }

    /// Hand a [`PendingSubmission`] to persistence. A receipt is only
    /// produced once persistence acknowledges.
    pub async fn deliver(
        &self,
        pending: PendingSubmission,
    ) -> Result<SubmissionReceipt, SessionError> {
        let payload = SubmittedResult {
            final_risk_level: pending.result.risk_level.clone(),
            total_score: pending.result.total_score,
        };
        self.persistence
            .submit(pending.record_id, &payload)
            .await
            .inspect_err(|e| {
                warn!(record_id = %pending.record_id, error = %e, "submission not acknowledged");
            })?;

        Ok(SubmissionReceipt {
            ticket: pending.ticket,
            result: pending.result,
        })
    }

    /// `Selecting → InProgress` in one call. On any failure the session
    /// stays in `Selecting`.
    pub async fn select(
        &self,
        session: &mut Session,
        instrument_id: &str,
    ) -> Result<(), SessionError> {
        let request = session.begin_open()?;
        let resolved = self.fetch(&request, instrument_id).await?;
        let loaded = self.open_record(session, resolved).await?;
        session.open(loaded)?;
        info!(session_id = %session.id(), instrument_id, "instrument opened");
        Ok(())
    }

    /// `InProgress → Completed` in one call. On any failure the session
    /// stays in `InProgress` with its answers intact and unlocked.
    pub async fn submit(&self, session: &mut Session) -> Result<AssessmentResult, SessionError> {
        let pending = session.begin_submit()?;
        let ticket = pending.ticket;
        match self.deliver(pending).await {
            Ok(receipt) => Ok(session.complete(receipt)?.clone()),
            Err(err) => {
                session.abort_submit(ticket)?;
                Err(err)
            }
        }
    }
}

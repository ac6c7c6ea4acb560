use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;
use uuid::Uuid;

use vigil_core::models::instrument::Domain;
use vigil_core::models::result::{AssessmentResult, DomainSubtotal};
use vigil_instruments::answers::{AnswerStore, Progress};
use vigil_instruments::model::Instrument;
use vigil_instruments::scoring;

use crate::error::SessionError;
use crate::events::{SessionAction, SessionEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SessionStatus {
    Selecting,
    InProgress,
    Completed,
}

/// Binds a collaborator round-trip to the session state that issued it.
///
/// Every new ticket supersedes the previous one, so a late response for a
/// replaced or reset session is rejected instead of applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    session_id: Uuid,
    epoch: u64,
}

impl Ticket {
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }
}

/// Issued by [`Session::begin_open`]; carries what the catalog and
/// persistence collaborators need.
#[derive(Debug, Clone)]
pub struct OpenRequest {
    pub ticket: Ticket,
    pub subject_ref: String,
}

/// A validated instrument plus the persistence record opened for it.
#[derive(Debug, Clone)]
pub struct LoadedInstrument {
    pub ticket: Ticket,
    pub instrument: Arc<Instrument>,
    pub record_id: Uuid,
}

/// Issued by [`Session::begin_submit`]; the score is computed once here.
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub ticket: Ticket,
    pub record_id: Uuid,
    pub result: AssessmentResult,
}

/// Proof that persistence acknowledged a [`PendingSubmission`].
#[derive(Debug, Clone)]
pub struct SubmissionReceipt {
    pub ticket: Ticket,
    pub result: AssessmentResult,
}

/// One row of a sidebar-style domain index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DomainStatus {
    pub index: usize,
    pub id: String,
    pub name: String,
    pub complete: bool,
    pub current: bool,
}

#[derive(Debug)]
struct Active {
    instrument: Arc<Instrument>,
    record_id: Uuid,
    answers: AnswerStore,
    current: usize,
    pending: Option<Ticket>,
}

#[derive(Debug)]
enum Phase {
    Selecting,
    InProgress(Active),
    Completed {
        active: Active,
        result: AssessmentResult,
    },
}

/// One attempt at one instrument for one subject.
///
/// `Selecting → InProgress → Completed`. Completed is terminal; use
/// [`Session::reset`] (or a fresh session) to assess again. The session
/// exclusively owns its answers; the instrument is shared read-only.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    subject_ref: String,
    epoch: u64,
    phase: Phase,
}

impl Session {
    pub fn new(subject_ref: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject_ref: subject_ref.into(),
            epoch: 0,
            phase: Phase::Selecting,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn subject_ref(&self) -> &str {
        &self.subject_ref
    }

    pub fn status(&self) -> SessionStatus {
        match self.phase {
            Phase::Selecting => SessionStatus::Selecting,
            Phase::InProgress(_) => SessionStatus::InProgress,
            Phase::Completed { .. } => SessionStatus::Completed,
        }
    }

    pub fn instrument(&self) -> Option<&Arc<Instrument>> {
        self.active().map(|a| &a.instrument)
    }

    pub fn answers(&self) -> Option<&AnswerStore> {
        self.active().map(|a| &a.answers)
    }

    pub fn record_id(&self) -> Option<Uuid> {
        self.active().map(|a| a.record_id)
    }

    pub fn current_domain_index(&self) -> Option<usize> {
        self.active().map(|a| a.current)
    }

    pub fn current_domain(&self) -> Option<&Domain> {
        self.active().and_then(|a| a.instrument.domain(a.current))
    }

    /// Derived, read-only. Never gates navigation.
    pub fn is_domain_complete(&self, index: usize) -> bool {
        self.active()
            .is_some_and(|a| a.answers.is_domain_complete(&a.instrument, index))
    }

    pub fn domain_statuses(&self) -> Vec<DomainStatus> {
        let Some(active) = self.active() else {
            return Vec::new();
        };
        active
            .instrument
            .domains()
            .iter()
            .enumerate()
            .map(|(index, domain)| DomainStatus {
                index,
                id: domain.id.clone(),
                name: domain.name.clone(),
                complete: active.answers.is_domain_complete(&active.instrument, index),
                current: index == active.current,
            })
            .collect()
    }

    /// Whether a submission has been issued and not yet completed or aborted.
    pub fn is_submitting(&self) -> bool {
        matches!(&self.phase, Phase::InProgress(active) if active.pending.is_some())
    }

    pub fn progress(&self) -> Option<Progress> {
        self.active().map(|a| a.answers.progress(&a.instrument))
    }

    /// Score of the answers recorded so far. Once completed this is the
    /// frozen result.
    pub fn live_score(&self) -> Result<AssessmentResult, SessionError> {
        match &self.phase {
            Phase::Selecting => Err(SessionError::NotStarted),
            Phase::InProgress(active) => Ok(scoring::score(&active.instrument, &active.answers)),
            Phase::Completed { result, .. } => Ok(result.clone()),
        }
    }

    pub fn subtotals(&self) -> Result<Vec<DomainSubtotal>, SessionError> {
        let active = self.active().ok_or(SessionError::NotStarted)?;
        Ok(scoring::domain_subtotals(&active.instrument, &active.answers))
    }

    /// The frozen result, present only once completed.
    pub fn result(&self) -> Option<&AssessmentResult> {
        match &self.phase {
            Phase::Completed { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Start `Selecting → InProgress`. The returned request must be
    /// resolved by a catalog/persistence round-trip and handed back to
    /// [`Session::open`].
    pub fn begin_open(&mut self) -> Result<OpenRequest, SessionError> {
        match self.status() {
            SessionStatus::Selecting => Ok(OpenRequest {
                ticket: self.issue_ticket(),
                subject_ref: self.subject_ref.clone(),
            }),
            SessionStatus::InProgress => Err(SessionError::AlreadyStarted),
            SessionStatus::Completed => Err(SessionError::AlreadySubmitted),
        }
    }

    /// Finish `Selecting → InProgress`. The domain pointer starts at 0 and
    /// the answer set starts empty.
    pub fn open(&mut self, loaded: LoadedInstrument) -> Result<(), SessionError> {
        self.check_ticket(loaded.ticket)?;
        match self.status() {
            SessionStatus::Selecting => {}
            SessionStatus::InProgress => return Err(SessionError::AlreadyStarted),
            SessionStatus::Completed => return Err(SessionError::AlreadySubmitted),
        }
        if !loaded.instrument.is_active() {
            return Err(SessionError::InstrumentUnavailable {
                instrument_id: loaded.instrument.id().to_string(),
                reason: "instrument is inactive".to_string(),
            });
        }

        SessionEvent::new(SessionAction::Opened, self.id, &self.subject_ref)
            .with_instrument(loaded.instrument.id())
            .with_details(serde_json::json!({
                "version": loaded.instrument.version(),
                "record_id": loaded.record_id,
            }))
            .emit();

        self.phase = Phase::InProgress(Active {
            instrument: loaded.instrument,
            record_id: loaded.record_id,
            answers: AnswerStore::new(),
            current: 0,
            pending: None,
        });
        Ok(())
    }

    /// Store or overwrite the answer for `item_id`. Never changes status.
    /// Answers are locked while a submission awaits acknowledgement.
    pub fn record_answer(&mut self, item_id: &str, value: &str) -> Result<(), SessionError> {
        let active = self.active_mut()?;
        if active.pending.is_some() {
            return Err(SessionError::SubmissionPending);
        }
        active.answers.set(&active.instrument, item_id, value)?;
        debug!(session_id = %self.id, item_id, value, "answer recorded");
        Ok(())
    }

    /// Move to the next domain; stays put on the last one.
    pub fn advance_domain(&mut self) -> Result<usize, SessionError> {
        let active = self.active_mut()?;
        if active.current + 1 < active.instrument.domain_count() {
            active.current += 1;
        }
        Ok(active.current)
    }

    /// Move to the previous domain; stays put on the first one.
    pub fn retreat_domain(&mut self) -> Result<usize, SessionError> {
        let active = self.active_mut()?;
        active.current = active.current.saturating_sub(1);
        Ok(active.current)
    }

    /// Jump straight to any domain, complete or not.
    pub fn jump_to_domain(&mut self, index: usize) -> Result<usize, SessionError> {
        let active = self.active_mut()?;
        let count = active.instrument.domain_count();
        if index >= count {
            return Err(SessionError::DomainOutOfRange { index, count });
        }
        active.current = index;
        Ok(index)
    }

    /// Check the completeness gate and compute the final score. Answers
    /// stay locked until the matching receipt reaches [`Session::complete`]
    /// or the submission is dropped with [`Session::abort_submit`].
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, SessionError> {
        let active = self.active_mut()?;
        if active.pending.is_some() {
            return Err(SessionError::SubmissionPending);
        }
        if !active.answers.is_complete(&active.instrument) {
            let missing = active
                .answers
                .unanswered(&active.instrument)
                .into_iter()
                .map(str::to_string)
                .collect();
            return Err(SessionError::IncompleteAssessment { missing });
        }

        let result = scoring::score(&active.instrument, &active.answers);
        let record_id = active.record_id;
        let ticket = self.issue_ticket();
        self.active_mut()?.pending = Some(ticket);
        Ok(PendingSubmission {
            ticket,
            record_id,
            result,
        })
    }

    /// Release the answer lock after persistence refused a submission.
    pub fn abort_submit(&mut self, ticket: Ticket) -> Result<(), SessionError> {
        self.check_ticket(ticket)?;
        let active = self.active_mut()?;
        if active.pending != Some(ticket) {
            return Err(SessionError::StaleResponse);
        }
        active.pending = None;
        debug!(session_id = %self.id, "submission aborted");
        Ok(())
    }

    /// Finish `InProgress → Completed`, freezing the receipt's result.
    pub fn complete(
        &mut self,
        receipt: SubmissionReceipt,
    ) -> Result<&AssessmentResult, SessionError> {
        self.check_ticket(receipt.ticket)?;
        if self.active_mut()?.pending != Some(receipt.ticket) {
            return Err(SessionError::StaleResponse);
        }

        let active = match std::mem::replace(&mut self.phase, Phase::Selecting) {
            Phase::InProgress(active) => active,
            other => {
                self.phase = other;
                return Err(SessionError::NotStarted);
            }
        };

        info!(
            session_id = %self.id,
            instrument_id = active.instrument.id(),
            total_score = receipt.result.total_score,
            risk_level = %receipt.result.risk_level,
            "assessment completed"
        );
        SessionEvent::new(SessionAction::Submitted, self.id, &self.subject_ref)
            .with_instrument(active.instrument.id())
            .with_details(serde_json::json!({
                "record_id": active.record_id,
                "total_score": receipt.result.total_score,
                "risk_level": receipt.result.risk_level,
            }))
            .emit();

        self.epoch += 1;
        self.phase = Phase::Completed {
            active,
            result: receipt.result,
        };
        match &self.phase {
            Phase::Completed { result, .. } => Ok(result),
            _ => Err(SessionError::NotStarted),
        }
    }

    /// Whether `ticket` was issued by this session and nothing has
    /// superseded it since.
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.session_id == self.id && ticket.epoch == self.epoch
    }

    /// Back to `Selecting`: answers cleared, pointer dropped, and every
    /// outstanding ticket invalidated.
    pub fn reset(&mut self) {
        let instrument_id = self.instrument().map(|i| i.id().to_string());
        let mut event = SessionEvent::new(SessionAction::Reset, self.id, &self.subject_ref);
        if let Some(id) = instrument_id {
            event = event.with_instrument(id);
        }
        event.emit();

        self.epoch += 1;
        self.phase = Phase::Selecting;
    }

    fn active(&self) -> Option<&Active> {
        match &self.phase {
            Phase::Selecting => None,
            Phase::InProgress(active) | Phase::Completed { active, .. } => Some(active),
        }
    }

    /// The mutable in-progress state, or the error for why there is none.
    fn active_mut(&mut self) -> Result<&mut Active, SessionError> {
        match &mut self.phase {
            Phase::Selecting => Err(SessionError::NotStarted),
            Phase::InProgress(active) => Ok(active),
            Phase::Completed { .. } => Err(SessionError::AlreadySubmitted),
        }
    }

    fn issue_ticket(&mut self) -> Ticket {
        self.epoch += 1;
        Ticket {
            session_id: self.id,
            epoch: self.epoch,
        }
    }

    fn check_ticket(&self, ticket: Ticket) -> Result<(), SessionError> {
        if !self.is_current(&ticket) {
            debug!(session_id = %self.id, "discarding stale response");
            return Err(SessionError::StaleResponse);
        }
        Ok(())
    }
}

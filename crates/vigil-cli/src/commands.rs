use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use vigil_core::models::instrument::InstrumentSummary;
use vigil_core::models::result::{AssessmentResult, DomainSubtotal};
use vigil_instruments::model::Instrument;
use vigil_session::assessor::Assessor;
use vigil_session::catalog::BuiltinCatalog;
use vigil_session::error::SessionError;
use vigil_session::persistence::MemoryPersistence;
use vigil_session::session::Session;
use vigil_storage::store::JsonStore;

use crate::config::VigilConfig;

/// Everything `assess` reports once a session completes.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentReport {
    pub session_id: Uuid,
    pub record_id: Option<Uuid>,
    pub instrument_id: String,
    pub instrument_name: String,
    pub subject_ref: String,
    pub subtotals: Vec<DomainSubtotal>,
    pub result: AssessmentResult,
}

/// Wire the collaborators the config asks for.
pub fn build_assessor(config: &VigilConfig) -> Assessor {
    match &config.data_dir {
        Some(dir) => {
            let store = Arc::new(JsonStore::new(dir));
            Assessor::new(store.clone(), store)
        }
        None => Assessor::new(Arc::new(BuiltinCatalog), Arc::new(MemoryPersistence::new())),
    }
}

pub fn render_summaries(summaries: &[InstrumentSummary]) -> String {
    if summaries.is_empty() {
        return "no active instruments\n".to_string();
    }
    let mut out = String::new();
    for s in summaries {
        let _ = writeln!(
            out,
            "{:<24} {:<40} v{:<8} {:>2} domains  {}",
            s.id,
            s.name,
            s.version,
            s.domain_count,
            s.scoring_method.as_str()
        );
    }
    out
}

pub fn render_instrument(instrument: &Instrument) -> String {
    let mut out = format!(
        "{} ({}) v{}, {} scoring\n",
        instrument.name(),
        instrument.id(),
        instrument.version(),
        instrument.scoring_method().as_str()
    );
    if let Some(description) = instrument.description() {
        let _ = writeln!(out, "{description}");
    }

    for (index, domain) in instrument.domains().iter().enumerate() {
        let _ = writeln!(out, "\n{}. {} (weight {})", index + 1, domain.name, domain.weight);
        for item in &domain.items {
            let _ = writeln!(out, "   {}: {}", item.id, item.prompt);
            for option in &item.options {
                let _ = writeln!(
                    out,
                    "      {:<14} {:>3}  {}",
                    option.value, option.points, option.label
                );
            }
        }
    }

    out.push_str("\nScoring table:\n");
    for entry in instrument.scoring_table() {
        let max = entry
            .max_score
            .map_or_else(|| "+".to_string(), |m| format!("-{m}"));
        let _ = writeln!(out, "   {}{:<6} {}", entry.min_score, max, entry.risk_level);
    }
    let _ = writeln!(out, "   otherwise  {}", instrument.fallback_level());
    out
}

pub fn render_report(report: &AssessmentReport) -> String {
    let mut out = format!(
        "{} - subject {}\n\n",
        report.instrument_name, report.subject_ref
    );
    for subtotal in &report.subtotals {
        let _ = writeln!(
            out,
            "  {:<40} {:>4}  ({}/{})",
            subtotal.domain_name, subtotal.points, subtotal.answered, subtotal.item_count
        );
    }
    let _ = writeln!(out, "\nTotal score: {}", report.result.total_score);
    let _ = writeln!(out, "Risk level:  {}", report.result.risk_level);
    out
}

/// Validate a definition file without touching any catalog.
pub fn validate_file(path: &Path) -> eyre::Result<Instrument> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read {}: {e}", path.display()))?;
    Ok(Instrument::from_json(&contents)?)
}

/// Parse an answers file: a JSON object mapping item id to option value.
pub fn load_answers(path: &Path) -> eyre::Result<BTreeMap<String, String>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read {}: {e}", path.display()))?;
    Ok(serde_json::from_str(&contents)?)
}

/// Run one session end to end: open, answer domain by domain, submit.
pub async fn run_assessment(
    assessor: &Assessor,
    instrument_id: &str,
    subject_ref: &str,
    answers: &BTreeMap<String, String>,
) -> Result<AssessmentReport, SessionError> {
    let mut session = Session::new(subject_ref);
    assessor.select(&mut session, instrument_id).await?;
    let instrument = session
        .instrument()
        .cloned()
        .ok_or(SessionError::NotStarted)?;

    if let Some(stray) = answers.keys().find(|id| instrument.item(id).is_none()) {
        return Err(SessionError::UnknownItem {
            item_id: stray.clone(),
        });
    }

    for (index, domain) in instrument.domains().iter().enumerate() {
        session.jump_to_domain(index)?;
        for item in &domain.items {
            if let Some(value) = answers.get(&item.id) {
                session.record_answer(&item.id, value)?;
            }
        }
        debug!(
            domain = %domain.id,
            complete = session.is_domain_complete(index),
            "domain answered"
        );
    }

    let subtotals = session.subtotals()?;
    let result = assessor.submit(&mut session).await?;

    Ok(AssessmentReport {
        session_id: session.id(),
        record_id: session.record_id(),
        instrument_id: instrument.id().to_string(),
        instrument_name: instrument.name().to_string(),
        subject_ref: subject_ref.to_string(),
        subtotals,
        result,
    })
}

//! Score computation and risk-level resolution.
//!
//! Everything here is a pure function of `(instrument, answers)`.

use vigil_core::models::instrument::ScoringMethod;
use vigil_core::models::result::{AssessmentResult, DomainSubtotal};

use crate::answers::AnswerStore;
use crate::model::Instrument;

/// Total score plus the resolved risk level. Valid at any point of a
/// session; unanswered items contribute nothing.
pub fn score(instrument: &Instrument, answers: &AnswerStore) -> AssessmentResult {
    let total_score = total(instrument, answers);
    AssessmentResult {
        total_score,
        risk_level: resolve_level(instrument, total_score).to_string(),
    }
}

pub fn total(instrument: &Instrument, answers: &AnswerStore) -> i64 {
    answers
        .iter()
        .map(|(item_id, answer)| answer.points * weight_of(instrument, item_id))
        .sum()
}

/// First scoring entry (in definition order) whose inclusive range holds
/// `total`, or the instrument's fallback level.
pub fn resolve_level(instrument: &Instrument, total: i64) -> &str {
    instrument
        .scoring_table()
        .iter()
        .find(|entry| entry.contains(total))
        .map(|entry| entry.risk_level.as_str())
        .unwrap_or_else(|| instrument.fallback_level())
}

pub fn domain_subtotals(instrument: &Instrument, answers: &AnswerStore) -> Vec<DomainSubtotal> {
    instrument
        .domains()
        .iter()
        .map(|domain| {
            let recorded: Vec<_> = domain
                .items
                .iter()
                .filter_map(|item| answers.get(&item.id).map(|a| (item, a)))
                .collect();
            let points = recorded
                .iter()
                .map(|(item, answer)| answer.points * weight_of(instrument, &item.id))
                .sum();
            DomainSubtotal {
                domain_id: domain.id.clone(),
                domain_name: domain.name.clone(),
                points,
                answered: recorded.len(),
                item_count: domain.items.len(),
            }
        })
        .collect()
}

fn weight_of(instrument: &Instrument, item_id: &str) -> i64 {
    match instrument.scoring_method() {
        ScoringMethod::Additive => 1,
        ScoringMethod::Weighted => instrument
            .domain_of(item_id)
            .and_then(|index| instrument.domain(index))
            .map_or(1, |domain| domain.weight),
    }
}

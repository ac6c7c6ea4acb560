use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The frozen outcome of a completed assessment. This is what display
/// surfaces and downstream workflows consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AssessmentResult {
    pub total_score: i64,
    pub risk_level: String,
}

/// Live per-domain breakdown of the points collected so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DomainSubtotal {
    pub domain_id: String,
    pub domain_name: String,
    pub points: i64,
    pub answered: usize,
    pub item_count: usize,
}

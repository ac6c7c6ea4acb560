use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Risk level used when a score falls outside every scoring-table range.
pub const DEFAULT_FALLBACK_LEVEL: &str = "Low";

/// How answer points combine into a total score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ScoringMethod {
    /// Plain sum of the selected options' points.
    #[default]
    Additive,
    /// Each answer's points are multiplied by its domain weight.
    Weighted,
}

impl ScoringMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringMethod::Additive => "additive",
            ScoringMethod::Weighted => "weighted",
        }
    }
}

/// Raw, unvalidated instrument definition as it arrives from a catalog.
///
/// Structural rules are only enforced once this is turned into a
/// validated instrument by `vigil-instruments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InstrumentDefinition {
    pub id: String,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub scoring_method: ScoringMethod,
    #[serde(default = "default_active")]
    pub active: bool,
    pub domains: Vec<Domain>,
    #[serde(default)]
    pub scoring_table: Vec<ScoringTableEntry>,
    /// Level reported when no scoring entry matches. `None` means
    /// [`DEFAULT_FALLBACK_LEVEL`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A thematic grouping of items. Domain order is navigation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Domain {
    pub id: String,
    pub name: String,
    #[serde(default = "default_weight")]
    pub weight: i64,
    pub items: Vec<Item>,
}

/// A single question within a domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Item {
    pub id: String,
    pub prompt: String,
    pub options: Vec<AnswerOption>,
}

/// One selectable answer to an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnswerOption {
    pub id: String,
    pub label: String,
    /// The datum recorded when this option is selected.
    pub value: String,
    pub points: i64,
}

/// Inclusive score range mapped to a risk level. `max_score: None` is
/// unbounded above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoringTableEntry {
    pub min_score: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_score: Option<i64>,
    pub risk_level: String,
}

impl ScoringTableEntry {
    pub fn contains(&self, score: i64) -> bool {
        score >= self.min_score && self.max_score.is_none_or(|max| score <= max)
    }
}

/// Catalog listing row for an instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InstrumentSummary {
    pub id: String,
    pub name: String,
    pub version: String,
    pub domain_count: usize,
    pub scoring_method: ScoringMethod,
}

impl InstrumentDefinition {
    pub fn summary(&self) -> InstrumentSummary {
        InstrumentSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            version: self.version.clone(),
            domain_count: self.domains.len(),
            scoring_method: self.scoring_method,
        }
    }
}

fn default_active() -> bool {
    true
}

fn default_weight() -> i64 {
    1
}

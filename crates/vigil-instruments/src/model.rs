use std::collections::{HashMap, HashSet};

use vigil_core::models::instrument::{
    AnswerOption, DEFAULT_FALLBACK_LEVEL, Domain, InstrumentDefinition, InstrumentSummary, Item,
    ScoringMethod, ScoringTableEntry,
};

use crate::error::InstrumentError;

/// Where an item sits inside its instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemPosition {
    pub domain: usize,
    pub item: usize,
}

/// A validated, immutable instrument.
///
/// Only constructible through [`Instrument::from_definition`], so every
/// value of this type satisfies the structural rules: at least one domain,
/// no empty domains, no optionless items, unique item ids across the whole
/// instrument, unique option values per item, a scoring table without
/// overlapping ranges, and a worst-case total that fits in an `i64`.
#[derive(Debug, Clone)]
pub struct Instrument {
    definition: InstrumentDefinition,
    positions: HashMap<String, ItemPosition>,
}

impl Instrument {
    pub fn from_definition(definition: InstrumentDefinition) -> Result<Self, InstrumentError> {
        let malformed = |reason: String| InstrumentError::Malformed {
            instrument_id: definition.id.clone(),
            reason,
        };

        if definition.domains.is_empty() {
            return Err(malformed("instrument has no domains".to_string()));
        }

        let mut domain_ids = HashSet::new();
        let mut positions = HashMap::new();
        for (domain_index, domain) in definition.domains.iter().enumerate() {
            if !domain_ids.insert(domain.id.as_str()) {
                return Err(malformed(format!("duplicate domain id '{}'", domain.id)));
            }
            if domain.weight <= 0 {
                return Err(malformed(format!(
                    "domain '{}' has non-positive weight {}",
                    domain.id, domain.weight
                )));
            }
            if domain.items.is_empty() {
                return Err(malformed(format!("domain '{}' has no items", domain.id)));
            }

            for (item_index, item) in domain.items.iter().enumerate() {
                if item.options.is_empty() {
                    return Err(malformed(format!("item '{}' has no options", item.id)));
                }

                let mut values = HashSet::new();
                for option in &item.options {
                    if !values.insert(option.value.as_str()) {
                        return Err(malformed(format!(
                            "item '{}' has duplicate option value '{}'",
                            item.id, option.value
                        )));
                    }
                }

                let position = ItemPosition {
                    domain: domain_index,
                    item: item_index,
                };
                if positions.insert(item.id.clone(), position).is_some() {
                    return Err(malformed(format!(
                        "item '{}' appears more than once",
                        item.id
                    )));
                }
            }
        }

        if score_bound(&definition).is_none() {
            return Err(malformed(
                "worst-case total score does not fit in a 64-bit integer".to_string(),
            ));
        }
        validate_scoring_table(&definition.scoring_table).map_err(malformed)?;

        Ok(Self {
            definition,
            positions,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, InstrumentError> {
        let definition: InstrumentDefinition = serde_json::from_str(json)?;
        Self::from_definition(definition)
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn version(&self) -> &str {
        &self.definition.version
    }

    pub fn scoring_method(&self) -> ScoringMethod {
        self.definition.scoring_method
    }

    pub fn is_active(&self) -> bool {
        self.definition.active
    }

    /// Domains in navigation order.
    pub fn domains(&self) -> &[Domain] {
        &self.definition.domains
    }

    pub fn domain(&self, index: usize) -> Option<&Domain> {
        self.definition.domains.get(index)
    }

    pub fn domain_count(&self) -> usize {
        self.definition.domains.len()
    }

    pub fn item_count(&self) -> usize {
        self.positions.len()
    }

    /// Every item in navigation order (domain by domain).
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.definition.domains.iter().flat_map(|d| &d.items)
    }

    pub fn position(&self, item_id: &str) -> Option<ItemPosition> {
        self.positions.get(item_id).copied()
    }

    /// Index of the domain that owns `item_id`.
    pub fn domain_of(&self, item_id: &str) -> Option<usize> {
        self.position(item_id).map(|p| p.domain)
    }

    pub fn item(&self, item_id: &str) -> Option<&Item> {
        let position = self.position(item_id)?;
        Some(&self.definition.domains[position.domain].items[position.item])
    }

    pub fn option(&self, item_id: &str, value: &str) -> Option<&AnswerOption> {
        self.item(item_id)?.options.iter().find(|o| o.value == value)
    }

    /// Scoring entries in definition order. The first matching entry wins.
    pub fn scoring_table(&self) -> &[ScoringTableEntry] {
        &self.definition.scoring_table
    }

    pub fn fallback_level(&self) -> &str {
        self.definition
            .fallback_level
            .as_deref()
            .unwrap_or(DEFAULT_FALLBACK_LEVEL)
    }

    pub fn description(&self) -> Option<&str> {
        self.definition.description.as_deref()
    }

    pub fn summary(&self) -> InstrumentSummary {
        self.definition.summary()
    }

    pub fn definition(&self) -> &InstrumentDefinition {
        &self.definition
    }
}

/// Largest absolute total any answer set can reach, or `None` on overflow.
/// Partial sums and domain subtotals stay within the same bound.
fn score_bound(definition: &InstrumentDefinition) -> Option<i64> {
    let mut bound: i64 = 0;
    for domain in &definition.domains {
        let weight = match definition.scoring_method {
            ScoringMethod::Additive => 1,
            ScoringMethod::Weighted => domain.weight,
        };
        for item in &domain.items {
            let mut widest: i64 = 0;
            for option in &item.options {
                widest = widest.max(option.points.checked_abs()?);
            }
            bound = bound.checked_add(widest.checked_mul(weight)?)?;
        }
    }
    Some(bound)
}

fn validate_scoring_table(table: &[ScoringTableEntry]) -> Result<(), String> {
    for entry in table {
        if let Some(max) = entry.max_score
            && entry.min_score > max
        {
            return Err(format!(
                "scoring entry '{}' has min {} above max {}",
                entry.risk_level, entry.min_score, max
            ));
        }
    }

    for (i, a) in table.iter().enumerate() {
        for b in &table[i + 1..] {
            if ranges_overlap(a, b) {
                return Err(format!(
                    "scoring entries '{}' and '{}' overlap",
                    a.risk_level, b.risk_level
                ));
            }
        }
    }
    Ok(())
}

fn ranges_overlap(a: &ScoringTableEntry, b: &ScoringTableEntry) -> bool {
    let a_reaches_b = a.max_score.is_none_or(|max| b.min_score <= max);
    let b_reaches_a = b.max_score.is_none_or(|max| a.min_score <= max);
    a_reaches_b && b_reaches_a
}

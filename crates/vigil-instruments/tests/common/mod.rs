#![allow(dead_code)]

use vigil_core::models::instrument::{
    AnswerOption, Domain, InstrumentDefinition, Item, ScoringMethod, ScoringTableEntry,
};
use vigil_instruments::model::Instrument;

pub fn item(id: &str, points: &[i64]) -> Item {
    Item {
        id: id.to_string(),
        prompt: format!("{id}?"),
        options: points
            .iter()
            .map(|p| AnswerOption {
                id: format!("{id}_{p}"),
                label: p.to_string(),
                value: p.to_string(),
                points: *p,
            })
            .collect(),
    }
}

pub fn domain(id: &str, items: Vec<Item>) -> Domain {
    Domain {
        id: id.to_string(),
        name: id.to_uppercase(),
        weight: 1,
        items,
    }
}

pub fn entry(min: i64, max: Option<i64>, level: &str) -> ScoringTableEntry {
    ScoringTableEntry {
        min_score: min,
        max_score: max,
        risk_level: level.to_string(),
    }
}

pub fn definition(domains: Vec<Domain>, table: Vec<ScoringTableEntry>) -> InstrumentDefinition {
    InstrumentDefinition {
        id: "test".to_string(),
        name: "Test Instrument".to_string(),
        version: "1".to_string(),
        scoring_method: ScoringMethod::Additive,
        active: true,
        domains,
        scoring_table: table,
        fallback_level: None,
        description: None,
    }
}

/// Two domains: `d1` with item `x` (0/5/10), `d2` with item `y` (0/3).
/// Table: [0,5] Low, [6,12] Medium, [13,20] High.
pub fn two_domain() -> Instrument {
    Instrument::from_definition(definition(
        vec![
            domain("d1", vec![item("x", &[0, 5, 10])]),
            domain("d2", vec![item("y", &[0, 3])]),
        ],
        vec![
            entry(0, Some(5), "Low"),
            entry(6, Some(12), "Medium"),
            entry(13, Some(20), "High"),
        ],
    ))
    .unwrap()
}

pub mod pretrial_screen;
pub mod supervision_needs;

use vigil_core::models::instrument::{AnswerOption, Item, ScoringTableEntry};

/// Build an item from `(value, label, points)` triples. Option ids mirror
/// their values.
fn item(id: &str, prompt: &str, options: &[(&str, &str, i64)]) -> Item {
    Item {
        id: id.to_string(),
        prompt: prompt.to_string(),
        options: options
            .iter()
            .map(|(value, label, points)| AnswerOption {
                id: format!("{id}.{value}"),
                label: label.to_string(),
                value: value.to_string(),
                points: *points,
            })
            .collect(),
    }
}

fn yes_no(id: &str, prompt: &str, yes_points: i64) -> Item {
    item(id, prompt, &[("no", "No", 0), ("yes", "Yes", yes_points)])
}

fn band(min_score: i64, max_score: Option<i64>, risk_level: &str) -> ScoringTableEntry {
    ScoringTableEntry {
        min_score,
        max_score,
        risk_level: risk_level.to_string(),
    }
}

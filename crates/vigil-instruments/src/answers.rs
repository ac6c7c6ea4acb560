use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::InstrumentError;
use crate::model::Instrument;

/// A recorded answer: the selected option's value and the points it carried
/// when it was selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Answer {
    pub value: String,
    pub points: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
}

/// Answers keyed by item id. Re-answering an item overwrites it.
///
/// The store never fabricates an answer: an item is either explicitly
/// answered with one of its options or unanswered.
#[derive(Debug, Default)]
pub struct AnswerStore {
    answers: BTreeMap<String, Answer>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` for `item_id`, resolving its points from the
    /// instrument. Returns the answer it replaced, if any. Nothing is
    /// written on error.
    pub fn set(
        &mut self,
        instrument: &Instrument,
        item_id: &str,
        value: &str,
    ) -> Result<Option<Answer>, InstrumentError> {
        if instrument.item(item_id).is_none() {
            return Err(InstrumentError::UnknownItem {
                instrument_id: instrument.id().to_string(),
                item_id: item_id.to_string(),
            });
        }
        let option =
            instrument
                .option(item_id, value)
                .ok_or_else(|| InstrumentError::InvalidOptionValue {
                    item_id: item_id.to_string(),
                    value: value.to_string(),
                })?;

        let answer = Answer {
            value: option.value.clone(),
            points: option.points,
        };
        Ok(self.answers.insert(item_id.to_string(), answer))
    }

    pub fn get(&self, item_id: &str) -> Option<&Answer> {
        self.answers.get(item_id)
    }

    pub fn is_answered(&self, item_id: &str) -> bool {
        self.answers.contains_key(item_id)
    }

    /// True when every item of every domain has an answer.
    pub fn is_complete(&self, instrument: &Instrument) -> bool {
        instrument.items().all(|item| self.is_answered(&item.id))
    }

    /// True when every item of the domain at `index` has an answer. An
    /// out-of-range index is never complete.
    pub fn is_domain_complete(&self, instrument: &Instrument, index: usize) -> bool {
        instrument
            .domain(index)
            .is_some_and(|d| d.items.iter().all(|item| self.is_answered(&item.id)))
    }

    /// Unanswered item ids in navigation order.
    pub fn unanswered<'a>(&self, instrument: &'a Instrument) -> Vec<&'a str> {
        instrument
            .items()
            .filter(|item| !self.is_answered(&item.id))
            .map(|item| item.id.as_str())
            .collect()
    }

    pub fn progress(&self, instrument: &Instrument) -> Progress {
        let total = instrument.item_count();
        let answered = instrument
            .items()
            .filter(|item| self.is_answered(&item.id))
            .count();
        Progress { answered, total }
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Answer)> {
        self.answers.iter().map(|(id, answer)| (id.as_str(), answer))
    }

    pub fn clear(&mut self) {
        self.answers.clear();
    }
}

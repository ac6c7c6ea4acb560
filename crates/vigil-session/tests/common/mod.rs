#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use uuid::Uuid;
use vigil_core::models::instrument::{
    AnswerOption, Domain, InstrumentDefinition, InstrumentSummary, Item, ScoringMethod,
    ScoringTableEntry,
};
use vigil_core::models::session::SubmittedResult;
use vigil_instruments::model::Instrument;
use vigil_session::BoxFuture;
use vigil_session::catalog::{InstrumentCatalog, StaticCatalog};
use vigil_session::error::SessionError;
use vigil_session::persistence::{MemoryPersistence, SessionPersistence};
use vigil_session::session::{LoadedInstrument, Session};

fn item(id: &str, points: &[i64]) -> Item {
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

fn domain(id: &str, items: Vec<Item>) -> Domain {
    Domain {
        id: id.to_string(),
        name: id.to_uppercase(),
        weight: 1,
        items,
    }
}

fn entry(min: i64, max: Option<i64>, level: &str) -> ScoringTableEntry {
    ScoringTableEntry {
        min_score: min,
        max_score: max,
        risk_level: level.to_string(),
    }
}

/// `d1`: item `x` (0/5/10). `d2`: item `y` (0/3). `d3`: items `z1`, `z2`
/// (0/1). Table: [0,5] Low, [6,12] Medium, [13,20] High.
pub fn three_domain_definition() -> InstrumentDefinition {
    InstrumentDefinition {
        id: "screen".to_string(),
        name: "Screen".to_string(),
        version: "1".to_string(),
        scoring_method: ScoringMethod::Additive,
        active: true,
        domains: vec![
            domain("d1", vec![item("x", &[0, 5, 10])]),
            domain("d2", vec![item("y", &[0, 3])]),
            domain("d3", vec![item("z1", &[0, 1]), item("z2", &[0, 1])]),
        ],
        scoring_table: vec![
            entry(0, Some(5), "Low"),
            entry(6, Some(12), "Medium"),
            entry(13, Some(20), "High"),
        ],
        fallback_level: None,
        description: None,
    }
}

/// The two-domain scenario instrument: `x` (0/5/10), `y` (0/3).
pub fn two_domain_definition() -> InstrumentDefinition {
    let mut def = three_domain_definition();
    def.id = "pair".to_string();
    def.name = "Pair".to_string();
    def.domains.truncate(2);
    def
}

pub fn instrument(def: InstrumentDefinition) -> Arc<Instrument> {
    Arc::new(Instrument::from_definition(def).unwrap())
}

/// Open `session` synchronously, standing in for a collaborator round-trip.
pub fn open_directly(session: &mut Session, instrument: Arc<Instrument>) {
    let request = session.begin_open().unwrap();
    session
        .open(LoadedInstrument {
            ticket: request.ticket,
            instrument,
            record_id: Uuid::new_v4(),
        })
        .unwrap();
}

pub fn answer_all(session: &mut Session, answers: &[(&str, &str)]) {
    for (item_id, value) in answers {
        session.record_answer(item_id, value).unwrap();
    }
}

/// Catalog that counts `get` calls.
pub struct CountingCatalog {
    inner: StaticCatalog,
    pub gets: AtomicUsize,
}

impl CountingCatalog {
    pub fn new(definitions: Vec<InstrumentDefinition>) -> Self {
        Self {
            inner: StaticCatalog::new(definitions),
            gets: AtomicUsize::new(0),
        }
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

impl InstrumentCatalog for CountingCatalog {
    fn list_active(&self) -> BoxFuture<'_, Result<Vec<InstrumentSummary>, SessionError>> {
        self.inner.list_active()
    }

    fn get<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, Result<InstrumentDefinition, SessionError>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(id)
    }
}

/// Persistence that rejects the first `failures` submissions.
pub struct FlakyPersistence {
    inner: MemoryPersistence,
    failures: AtomicUsize,
    pub submits: AtomicUsize,
}

impl FlakyPersistence {
    pub fn new(failures: usize) -> Self {
        Self {
            inner: MemoryPersistence::new(),
            failures: AtomicUsize::new(failures),
            submits: AtomicUsize::new(0),
        }
    }

    pub fn submit_count(&self) -> usize {
        self.submits.load(Ordering::SeqCst)
    }

    pub fn memory(&self) -> &MemoryPersistence {
        &self.inner
    }
}

impl SessionPersistence for FlakyPersistence {
    fn open<'a>(
        &'a self,
        subject_ref: &'a str,
        instrument_name: &'a str,
        date: jiff::civil::Date,
    ) -> BoxFuture<'a, Result<Uuid, SessionError>> {
        self.inner.open(subject_ref, instrument_name, date)
    }

    fn submit<'a>(
        &'a self,
        record_id: Uuid,
        result: &'a SubmittedResult,
    ) -> BoxFuture<'a, Result<(), SessionError>> {
        self.submits.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Box::pin(async { Err(SessionError::Persistence("backend down".to_string())) });
        }
        self.inner.submit(record_id, result)
    }
}

/// Persistence whose `open` always fails.
pub struct ClosedPersistence;

impl SessionPersistence for ClosedPersistence {
    fn open<'a>(
        &'a self,
        _subject_ref: &'a str,
        _instrument_name: &'a str,
        _date: jiff::civil::Date,
    ) -> BoxFuture<'a, Result<Uuid, SessionError>> {
        Box::pin(async { Err(SessionError::Persistence("read-only".to_string())) })
    }

    fn submit<'a>(
        &'a self,
        _record_id: Uuid,
        _result: &'a SubmittedResult,
    ) -> BoxFuture<'a, Result<(), SessionError>> {
        Box::pin(async { Err(SessionError::Persistence("read-only".to_string())) })
    }
}

use vigil_core::models::instrument::{InstrumentDefinition, InstrumentSummary};
use vigil_instruments::all_instruments;

use crate::BoxFuture;
use crate::error::SessionError;

/// Source of instrument definitions.
///
/// `get` returns the raw definition; validation happens in the engine so a
/// malformed catalog entry surfaces as `MalformedInstrument`.
pub trait InstrumentCatalog: Send + Sync {
    /// Active instruments, in catalog order.
    fn list_active(&self) -> BoxFuture<'_, Result<Vec<InstrumentSummary>, SessionError>>;

    /// Full nested definition, or `InstrumentUnavailable`.
    fn get<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, Result<InstrumentDefinition, SessionError>>;
}

/// Catalog over the instruments bundled in `vigil-instruments`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl InstrumentCatalog for BuiltinCatalog {
    fn list_active(&self) -> BoxFuture<'_, Result<Vec<InstrumentSummary>, SessionError>> {
        Box::pin(async {
            Ok(all_instruments()
                .iter()
                .map(|i| i.definition())
                .filter(|d| d.active)
                .map(InstrumentDefinition::summary)
                .collect())
        })
    }

    fn get<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, Result<InstrumentDefinition, SessionError>> {
        Box::pin(async move {
            vigil_instruments::get_instrument(id)
                .map(|i| i.definition().clone())
                .ok_or_else(|| unavailable(id, "not in catalog"))
        })
    }
}

/// Fixed in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    definitions: Vec<InstrumentDefinition>,
}

impl StaticCatalog {
    pub fn new(definitions: Vec<InstrumentDefinition>) -> Self {
        Self { definitions }
    }
}

impl InstrumentCatalog for StaticCatalog {
    fn list_active(&self) -> BoxFuture<'_, Result<Vec<InstrumentSummary>, SessionError>> {
        Box::pin(async {
            Ok(self
                .definitions
                .iter()
                .filter(|d| d.active)
                .map(InstrumentDefinition::summary)
                .collect())
        })
    }

    fn get<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, Result<InstrumentDefinition, SessionError>> {
        Box::pin(async move {
            self.definitions
                .iter()
                .find(|d| d.id == id)
                .cloned()
                .ok_or_else(|| unavailable(id, "not in catalog"))
        })
    }
}

pub fn unavailable(id: &str, reason: impl Into<String>) -> SessionError {
    SessionError::InstrumentUnavailable {
        instrument_id: id.to_string(),
        reason: reason.into(),
    }
}

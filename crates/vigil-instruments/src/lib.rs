//! vigil-instruments
//!
//! Risk-assessment instrument model, answer store, and scoring. Pure logic —
//! no I/O. Validates raw definitions into immutable instruments, records
//! answers against them, and resolves totals into risk levels.

pub mod answers;
pub mod error;
pub mod instruments;
pub mod model;
pub mod scoring;

use vigil_core::models::instrument::InstrumentDefinition;

use error::InstrumentError;
use model::Instrument;

/// Trait implemented by each instrument bundled with the engine.
pub trait BuiltinInstrument: Send + Sync {
    /// Unique identifier (e.g., "pretrial_screen").
    fn id(&self) -> &str;

    /// The raw definition, exactly as a catalog would serve it.
    fn definition(&self) -> &InstrumentDefinition;

    /// Validate the bundled definition into an [`Instrument`].
    fn load(&self) -> Result<Instrument, InstrumentError> {
        Instrument::from_definition(self.definition().clone())
    }
}

/// Return all bundled instruments.
pub fn all_instruments() -> Vec<Box<dyn BuiltinInstrument>> {
    vec![
        Box::new(instruments::pretrial_screen::PretrialScreen),
        Box::new(instruments::supervision_needs::SupervisionNeeds),
    ]
}

/// Look up a bundled instrument by ID.
pub fn get_instrument(id: &str) -> Option<Box<dyn BuiltinInstrument>> {
    all_instruments().into_iter().find(|i| i.id() == id)
}

//! vigil-core
//!
//! Pure data types and storage key conventions.
//! No I/O and no scoring logic — this is the shared vocabulary of the
//! Vigil risk-assessment engine.

pub mod error;
pub mod keys;
pub mod models;

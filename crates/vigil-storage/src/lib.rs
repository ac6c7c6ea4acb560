//! vigil-storage
//!
//! Local JSON-directory storage. Thin layer over `tokio::fs` that serves
//! instrument definitions and keeps session records, implementing the
//! catalog and persistence collaborators of `vigil-session`.

pub mod error;
pub mod objects;
pub mod state;
pub mod store;

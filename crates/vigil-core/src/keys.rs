//! Storage key conventions.
//!
//! Pure string functions — no filesystem access. These define the canonical
//! layout of objects under a Vigil data directory.

use uuid::Uuid;

use crate::error::CoreError;

pub const INSTRUMENTS_PREFIX: &str = "instruments/";

pub const SESSIONS_PREFIX: &str = "sessions/";

/// Key for an instrument definition. The id must be a single path
/// segment: non-empty, without `/`, `\` or `..`.
pub fn instrument(id: &str) -> Result<String, CoreError> {
    if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
        return Err(CoreError::InvalidKey(format!("instrument id {id:?}")));
    }
    Ok(format!("{INSTRUMENTS_PREFIX}{id}.json"))
}

pub fn session(id: Uuid) -> String {
    format!("{SESSIONS_PREFIX}{id}.json")
}

/// Recover the session id from a key produced by [`session`].
pub fn session_id_from_key(key: &str) -> Result<Uuid, CoreError> {
    let stem = key
        .strip_prefix(SESSIONS_PREFIX)
        .and_then(|rest| rest.strip_suffix(".json"))
        .ok_or_else(|| CoreError::InvalidKey(key.to_string()))?;
    Ok(Uuid::parse_str(stem)?)
}

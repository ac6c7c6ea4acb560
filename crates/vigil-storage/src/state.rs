use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};

use crate::error::StorageError;
use crate::objects;

/// Load a JSON document.
pub async fn load_state<T: DeserializeOwned>(root: &Path, key: &str) -> Result<T, StorageError> {
    let body = objects::get_object(root, key).await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Save a JSON document, pretty-printed.
pub async fn save_state<T: Serialize>(
    root: &Path,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let body = serde_json::to_vec_pretty(value)?;
    objects::put_object(root, key, body).await
}

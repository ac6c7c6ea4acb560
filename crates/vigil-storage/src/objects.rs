use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// Resolve `key` under `root`. Keys are `/`-separated and relative.
pub fn object_path(root: &Path, key: &str) -> PathBuf {
    key.split('/')
        .filter(|part| !part.is_empty())
        .fold(root.to_path_buf(), |path, part| path.join(part))
}

/// Read an object's bytes.
pub async fn get_object(root: &Path, key: &str) -> Result<Vec<u8>, StorageError> {
    tokio::fs::read(object_path(root, key))
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound {
                key: key.to_string(),
            },
            _ => StorageError::Read {
                key: key.to_string(),
                message: e.to_string(),
            },
        })
}

/// Write an object, replacing any previous content. The body lands in a
/// sibling temp file first and is renamed into place.
pub async fn put_object(root: &Path, key: &str, body: Vec<u8>) -> Result<(), StorageError> {
    let path = object_path(root, key);
    let write_err = |e: std::io::Error| StorageError::Write {
        key: key.to_string(),
        message: e.to_string(),
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, body).await.map_err(write_err)?;
    tokio::fs::rename(&tmp, &path).await.map_err(write_err)?;
    Ok(())
}

/// List `.json` object keys directly under a prefix, sorted. A missing
/// prefix directory lists as empty.
pub async fn list_objects(root: &Path, prefix: &str) -> Result<Vec<String>, StorageError> {
    let list_err = |e: std::io::Error| StorageError::List {
        prefix: prefix.to_string(),
        message: e.to_string(),
    };

    let mut entries = match tokio::fs::read_dir(object_path(root, prefix)).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(list_err(e)),
    };

    let mut keys = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(list_err)? {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.ends_with(".json") && entry.file_type().await.map_err(list_err)?.is_file() {
            keys.push(format!("{prefix}{name}"));
        }
    }
    keys.sort();
    Ok(keys)
}

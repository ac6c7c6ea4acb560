use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {key}")]
    NotFound { key: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Key(#[from] vigil_core::error::CoreError),

    #[error("read error for {key}: {message}")]
    Read { key: String, message: String },

    #[error("write error for {key}: {message}")]
    Write { key: String, message: String },

    #[error("list error under {prefix}: {message}")]
    List { prefix: String, message: String },
}

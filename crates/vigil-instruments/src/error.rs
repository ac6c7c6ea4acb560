use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstrumentError {
    #[error("unknown instrument: {0}")]
    UnknownInstrument(String),

    #[error("malformed instrument '{instrument_id}': {reason}")]
    Malformed {
        instrument_id: String,
        reason: String,
    },

    #[error("unknown item '{item_id}' for instrument '{instrument_id}'")]
    UnknownItem {
        instrument_id: String,
        item_id: String,
    },

    #[error("'{value}' is not an option of item '{item_id}'")]
    InvalidOptionValue { item_id: String, value: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

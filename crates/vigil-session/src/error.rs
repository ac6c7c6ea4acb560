use thiserror::Error;
use vigil_instruments::error::InstrumentError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("malformed instrument '{instrument_id}': {reason}")]
    MalformedInstrument {
        instrument_id: String,
        reason: String,
    },

    #[error("instrument '{instrument_id}' unavailable: {reason}")]
    InstrumentUnavailable {
        instrument_id: String,
        reason: String,
    },

    #[error("unknown item '{item_id}'")]
    UnknownItem { item_id: String },

    #[error("'{value}' is not an option of item '{item_id}'")]
    InvalidOptionValue { item_id: String, value: String },

    #[error("assessment incomplete: {} item(s) unanswered", missing.len())]
    IncompleteAssessment { missing: Vec<String> },

    #[error("session already submitted")]
    AlreadySubmitted,

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("no instrument selected")]
    NotStarted,

    #[error("an instrument is already open in this session")]
    AlreadyStarted,

    #[error("domain index {index} out of range (instrument has {count} domains)")]
    DomainOutOfRange { index: usize, count: usize },

    #[error("a submission is awaiting acknowledgement")]
    SubmissionPending,

    #[error("response does not belong to the current session request")]
    StaleResponse,
}

impl From<InstrumentError> for SessionError {
    fn from(err: InstrumentError) -> Self {
        match err {
            InstrumentError::UnknownInstrument(id) => SessionError::InstrumentUnavailable {
                instrument_id: id,
                reason: "not in catalog".to_string(),
            },
            InstrumentError::Malformed {
                instrument_id,
                reason,
            } => SessionError::MalformedInstrument {
                instrument_id,
                reason,
            },
            InstrumentError::UnknownItem { item_id, .. } => SessionError::UnknownItem { item_id },
            InstrumentError::InvalidOptionValue { item_id, value } => {
                SessionError::InvalidOptionValue { item_id, value }
            }
            InstrumentError::Serialization(e) => SessionError::MalformedInstrument {
                instrument_id: String::new(),
                reason: e.to_string(),
            },
        }
    }
}

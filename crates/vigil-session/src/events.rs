use serde::Serialize;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionAction {
    Opened,
    Submitted,
    Reset,
}

impl SessionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionAction::Opened => "opened",
            SessionAction::Submitted => "submitted",
            SessionAction::Reset => "reset",
        }
    }
}

/// A structured lifecycle event for one assessment session.
///
/// Emitted through `tracing` so whatever subscriber the host installs
/// (plain text, JSON) receives it alongside ordinary logs.
#[derive(Debug, Clone, Serialize)]
pub struct SessionEvent {
    pub action: SessionAction,
    pub session_id: Uuid,
    pub subject_ref: String,
    pub instrument_id: Option<String>,
    pub details: Option<serde_json::Value>,
}

impl SessionEvent {
    pub fn new(action: SessionAction, session_id: Uuid, subject_ref: impl Into<String>) -> Self {
        Self {
            action,
            session_id,
            subject_ref: subject_ref.into(),
            instrument_id: None,
            details: None,
        }
    }

    pub fn with_instrument(mut self, instrument_id: impl Into<String>) -> Self {
        self.instrument_id = Some(instrument_id.into());
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Emit this event via tracing.
    pub fn emit(&self) {
        let details = self
            .details
            .as_ref()
            .map(|d| d.to_string())
            .unwrap_or_default();
        info!(
            event.action = self.action.as_str(),
            event.session_id = %self.session_id,
            event.subject_ref = %self.subject_ref,
            event.instrument_id = self.instrument_id.as_deref().unwrap_or(""),
            event.details = %details,
            "session event"
        );
    }
}

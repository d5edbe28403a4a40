use serde::{Deserialize, Serialize};

use crate::EventSource;
use bankers_errors::UserFacingError;

/// Structured failure information shared across domains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short user-facing message.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether retrying the operation might succeed.
    pub retryable: bool,
}

impl FailureContext {
    #[must_use]
    pub fn new(
        code: Option<impl Into<String>>,
        message: impl Into<String>,
        hint: Option<impl Into<String>>,
        retryable: bool,
    ) -> Self {
        Self {
            code: code.map(Into::into),
            message: message.into(),
            hint: hint.map(Into::into),
            retryable,
        }
    }

    /// Build failure context from a `UserFacingError` implementation.
    #[must_use]
    pub fn from_error<E: UserFacingError + ?Sized>(error: &E) -> Self {
        Self::new(
            error.user_code(),
            error.user_message().into_owned(),
            error.user_hint(),
            error.is_retryable(),
        )
    }
}

pub mod dataset;
pub mod general;
pub mod safety;

pub use dataset::*;
pub use general::*;
pub use safety::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// Warnings, configuration and command lifecycle
    General(GeneralEvent),

    /// Safety evaluation progress and verdicts
    Safety(SafetyEvent),

    /// Dataset store operations
    Dataset(DatasetEvent),
}

impl AppEvent {
    /// Identify the source domain for this event (used for metadata/logging).
    #[must_use]
    pub fn event_source(&self) -> EventSource {
        match self {
            Self::General(_) => EventSource::General,
            Self::Safety(_) => EventSource::Safety,
            Self::Dataset(_) => EventSource::Dataset,
        }
    }

    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            Self::General(GeneralEvent::OperationFailed { .. })
            | Self::Dataset(DatasetEvent::Failed { .. }) => Level::ERROR,

            // An unsafe verdict is a normal outcome, not a fault
            Self::General(GeneralEvent::Warning { .. })
            | Self::Safety(
                SafetyEvent::UnsafeStateDetected { .. } | SafetyEvent::ValidationFailed { .. },
            ) => Level::WARN,

            Self::General(GeneralEvent::OperationStarted { .. })
            | Self::Safety(SafetyEvent::ProcessAdmitted { .. }) => Level::DEBUG,

            _ => Level::INFO,
        }
    }

    /// Get the log target for this event (for structured logging)
    #[must_use]
    pub fn log_target(&self) -> &'static str {
        match self {
            Self::General(_) => "bankers::events::general",
            Self::Safety(_) => "bankers::events::safety",
            Self::Dataset(_) => "bankers::events::dataset",
        }
    }
}

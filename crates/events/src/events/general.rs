use serde::{Deserialize, Serialize};

use super::FailureContext;

/// Command lifecycle, configuration and warnings that are not tied to one
/// domain
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeneralEvent {
    /// Something the user should notice that does not stop the command,
    /// e.g. a dataset being overwritten
    Warning { message: String, context: String },

    /// A CLI command began; `operation` is its name, e.g. `dataset import`
    OperationStarted { operation: String },

    /// `success` is false when the command ran but reached a negative
    /// answer (unsafe snapshot, rejected order)
    OperationCompleted { operation: String, success: bool },

    OperationFailed {
        operation: String,
        failure: FailureContext,
    },

    /// Configuration loaded, with any values that were ignored
    ConfigurationValidated {
        source: String,
        warnings: Vec<String>,
    },
}

impl GeneralEvent {
    #[must_use]
    pub fn warning(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Warning {
            message: message.into(),
            context: context.into(),
        }
    }
}

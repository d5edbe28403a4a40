//! CLI error handling

use std::borrow::Cow;
use std::fmt;

use bankers_errors::UserFacingError;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    Config(bankers_errors::ConfigError),
    /// Error from a library crate (validation, storage, ...)
    Ops(bankers_errors::Error),
    InvalidArguments(String),
    /// Interactive input ended or could not be read
    Input(String),
    /// Background evaluation task failed to complete
    Task(String),
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "Configuration error: {e}"),
            CliError::Ops(e) => {
                let message = e.user_message();
                write!(f, "{message}")?;
                if let Some(code) = e.user_code() {
                    write!(f, "\n  Code: {code}")?;
                }
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                if e.is_retryable() {
                    write!(f, "\n  Retry: safe to retry this operation.")?;
                }
                Ok(())
            }
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Input(msg) => write!(f, "Input error: {msg}"),
            CliError::Task(msg) => write!(f, "Evaluation task failed: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl CliError {
    /// Stable error code, when the underlying error has one
    pub fn code(&self) -> Option<&'static str> {
        match self {
            CliError::Config(e) => e.user_code(),
            CliError::Ops(e) => e.user_code(),
            CliError::InvalidArguments(_) => Some("cli.invalid_arguments"),
            CliError::Input(_) => Some("cli.input"),
            CliError::Task(_) => Some("cli.task"),
            CliError::Io(_) => Some("cli.io"),
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        match self {
            CliError::Config(e) => e.user_hint(),
            CliError::Ops(e) => e.user_hint(),
            _ => None,
        }
    }

    /// Error object printed instead of a result in JSON mode
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": self.to_string(),
            "code": self.code(),
            "hint": self.hint(),
        })
    }
}

impl UserFacingError for CliError {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            CliError::Ops(e) => e.user_message(),
            _ => Cow::Owned(self.to_string()),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        self.hint()
    }

    fn is_retryable(&self) -> bool {
        matches!(self, CliError::Ops(e) if e.is_retryable())
    }

    fn user_code(&self) -> Option<&'static str> {
        self.code()
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Ops(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<bankers_errors::ConfigError> for CliError {
    fn from(e: bankers_errors::ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<bankers_errors::Error> for CliError {
    fn from(e: bankers_errors::Error) -> Self {
        CliError::Ops(e)
    }
}

impl From<bankers_errors::ValidationError> for CliError {
    fn from(e: bankers_errors::ValidationError) -> Self {
        CliError::Ops(e.into())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<tokio::task::JoinError> for CliError {
    fn from(e: tokio::task::JoinError) -> Self {
        CliError::Task(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankers_errors::{StorageError, ValidationError};

    #[test]
    fn test_ops_error_shows_code_and_hint() {
        let err = CliError::from(bankers_errors::Error::from(StorageError::DatasetNotFound {
            name: "lab".into(),
        }));
        let text = err.to_string();
        assert!(text.contains("lab"));
        assert!(text.contains("Code: storage.dataset_not_found"));
    }

    #[test]
    fn test_json_error_object() {
        let err = CliError::from(bankers_errors::Error::from(StorageError::DatasetNotFound {
            name: "lab".into(),
        }));
        let json = err.to_json();
        assert_eq!(json["code"], "storage.dataset_not_found");
        assert!(json["error"].as_str().unwrap().contains("lab"));

        let json = CliError::InvalidArguments("bad order".into()).to_json();
        assert_eq!(json["code"], "cli.invalid_arguments");
        assert!(json["hint"].is_null());
    }

    #[test]
    fn test_failure_message_omits_code_lines() {
        let err = CliError::from(bankers_errors::Error::from(StorageError::DatasetNotFound {
            name: "lab".into(),
        }));
        assert!(!err.user_message().contains("Code:"));
        assert_eq!(err.user_code(), Some("storage.dataset_not_found"));
        assert!(!err.is_retryable());

        let err = CliError::Input("end of input".into());
        assert_eq!(err.user_message(), "Input error: end of input");
        assert_eq!(err.user_code(), Some("cli.input"));
    }

    #[test]
    fn test_validation_error_converts() {
        let err = CliError::from(ValidationError::NegativeValue {
            field: "available[1]".into(),
            value: -2,
        });
        assert!(matches!(err, CliError::Ops(_)));
        assert!(err.to_string().contains("available[1]"));
    }
}

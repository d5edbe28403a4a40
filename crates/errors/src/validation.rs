//! Snapshot validation error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// Reasons a resource snapshot is rejected before it can be evaluated.
///
/// Every variant is recoverable at the input boundary: the caller is
/// expected to re-prompt or reject the data and report it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("{field} must be at least 1")]
    EmptyDimension { field: String },

    #[error("{field}: expected {expected} entries, found {actual}")]
    Dimension {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("{field}: '{token}' is not an integer")]
    NonInteger { field: String, token: String },

    #[error("{field}: negative value {value}")]
    NegativeValue { field: String, value: i64 },

    #[error(
        "P{process} holds {allocated} units of resource {resource} but declares a maximum of {maximum}"
    )]
    InfeasibleClaim {
        process: usize,
        resource: usize,
        allocated: i64,
        maximum: i64,
    },
}

impl ValidationError {
    /// Build a dimension mismatch for the named field
    pub fn dimension(field: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::Dimension {
            field: field.into(),
            expected,
            actual,
        }
    }

    /// Whether this is one of the dimension failures (count or length)
    #[must_use]
    pub fn is_dimension(&self) -> bool {
        matches!(self, Self::EmptyDimension { .. } | Self::Dimension { .. })
    }
}

impl UserFacingError for ValidationError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::EmptyDimension { .. } => {
                Some("Declare at least one process and one resource type.")
            }
            Self::Dimension { .. } => {
                Some("Every row needs exactly one entry per resource type.")
            }
            Self::NonInteger { .. } => Some("Enter whole numbers separated by spaces."),
            Self::NegativeValue { .. } => Some("Resource counts cannot be negative."),
            Self::InfeasibleClaim { .. } => {
                Some("A process cannot hold more than its declared maximum; fix the Max or Allocation row.")
            }
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::EmptyDimension { .. } | Self::Dimension { .. } => "validation.dimension",
            Self::NonInteger { .. } => "validation.non_integer",
            Self::NegativeValue { .. } => "validation.negative_value",
            Self::InfeasibleClaim { .. } => "validation.infeasible_claim",
        };
        Some(code)
    }
}

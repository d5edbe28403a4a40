//! Safety evaluation outcome types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// The snapshot admits no safe sequence.
///
/// This is an ordinary answer rather than a fault. `unfinished` lists the
/// processes still waiting when the scan stalled, `work` the resources that
/// were free at that point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsafe state: {} process(es) cannot finish ({})", .unfinished.len(), labels(.unfinished))]
pub struct UnsafeStateError {
    pub unfinished: Vec<usize>,
    pub work: Vec<u64>,
    pub admitted: Vec<usize>,
}

/// Why a caller-supplied completion order is not a safe sequence
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SequenceViolation {
    #[error("P{process} is out of range for {processes} processes")]
    OutOfRange { process: usize, processes: usize },

    #[error("P{process} appears more than once")]
    Duplicate { process: usize },

    #[error("sequence covers {actual} of {expected} processes")]
    Incomplete { expected: usize, actual: usize },

    #[error(
        "P{process} at position {position} needs {need} of resource {resource} but only {work} are free"
    )]
    NotCoverable {
        process: usize,
        position: usize,
        resource: usize,
        need: u64,
        work: u64,
    },
}

fn labels(indices: &[usize]) -> String {
    indices
        .iter()
        .map(|i| format!("P{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl UserFacingError for UnsafeStateError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        Some("Free more resources or lower the listed processes' maximum claims.")
    }

    fn user_code(&self) -> Option<&'static str> {
        Some("safety.unsafe")
    }
}

impl UserFacingError for SequenceViolation {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::OutOfRange { .. } => "sequence.out_of_range",
            Self::Duplicate { .. } => "sequence.duplicate",
            Self::Incomplete { .. } => "sequence.incomplete",
            Self::NotCoverable { .. } => "sequence.not_coverable",
        };
        Some(code)
    }
}

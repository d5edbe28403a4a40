//! Safe sequence and verdict types

use bankers_errors::UnsafeStateError;
use bankers_types::ProcessId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A feasible completion order: every process exactly once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SafeSequence(Vec<ProcessId>);

impl SafeSequence {
    pub(crate) fn new(order: Vec<ProcessId>) -> Self {
        Self(order)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[ProcessId] {
        &self.0
    }

    /// Process indices in completion order
    #[must_use]
    pub fn indices(&self) -> Vec<usize> {
        self.0.iter().map(|p| p.index()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProcessId> {
        self.0.iter()
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<ProcessId> {
        self.0
    }
}

impl fmt::Display for SafeSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pos, process) in self.0.iter().enumerate() {
            if pos > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{process}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a SafeSequence {
    type Item = &'a ProcessId;
    type IntoIter = std::slice::Iter<'a, ProcessId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One process admitted to the sequence, with the Work vector around it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admission {
    pub process: ProcessId,
    /// 1-based scan round the admission happened in
    pub round: usize,
    /// 0-based position in the resulting sequence
    pub position: usize,
    pub work_before: Vec<u64>,
    pub work_after: Vec<u64>,
}

/// Final answer of one evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Safe(SafeSequence),
    Unsafe(UnsafeStateError),
}

impl Verdict {
    #[must_use]
    pub fn is_safe(&self) -> bool {
        matches!(self, Self::Safe(_))
    }

    /// Convert into the whole-result form
    ///
    /// # Errors
    ///
    /// Returns the `UnsafeStateError` when no safe sequence exists.
    pub fn into_result(self) -> Result<SafeSequence, UnsafeStateError> {
        match self {
            Self::Safe(sequence) => Ok(sequence),
            Self::Unsafe(err) => Err(err),
        }
    }
}

/// Every admission of an evaluation plus its verdict
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub admissions: Vec<Admission>,
    pub verdict: Verdict,
}

impl Evaluation {
    /// Number of scans that admitted at least one process
    ///
    /// The final empty scan that confirms a verdict is not counted, so the
    /// value does not depend on whether the evaluation was driven by a
    /// [`Stepper`](crate::Stepper) or run in one go.
    #[must_use]
    pub fn rounds(&self) -> usize {
        self.admissions.last().map_or(0, |admission| admission.round)
    }
}

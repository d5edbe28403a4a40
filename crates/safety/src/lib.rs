#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Deadlock-avoidance safety check
//!
//! Given a validated [`ResourceState`], decide whether every process can
//! obtain its remaining claim and finish in some order, and produce one
//! such order. Evaluation is synchronous, performs no I/O and never mutates
//! the state it is given; identical input always yields an identical
//! verdict.
//!
//! Two entry points share one implementation:
//! - [`SafetyEngine::evaluate`] runs to completion and returns the sequence
//! - [`SafetyEngine::stepper`] yields admissions one at a time for callers
//!   that want to pace presentation

mod sequence;
mod stepper;
mod verify;

pub use sequence::{Admission, Evaluation, SafeSequence, Verdict};
pub use stepper::Stepper;
pub use verify::verify_sequence;

pub use bankers_errors::UnsafeStateError;
pub use bankers_state::ResourceState;
pub use bankers_types::{ProcessId, RoundPolicy};

/// Runs the safety algorithm under a fixed round policy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SafetyEngine {
    policy: RoundPolicy,
}

impl SafetyEngine {
    /// Create an engine using the given round policy
    #[must_use]
    pub fn new(policy: RoundPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(&self) -> RoundPolicy {
        self.policy
    }

    /// Decide safety and return one witnessing order.
    ///
    /// # Errors
    ///
    /// Returns `UnsafeStateError` with the unfinished processes when no
    /// safe sequence exists.
    pub fn evaluate(&self, state: &ResourceState) -> Result<SafeSequence, UnsafeStateError> {
        self.stepper(state).finish().into_result()
    }

    /// Start a step-wise evaluation
    #[must_use]
    pub fn stepper<'a>(&self, state: &'a ResourceState) -> Stepper<'a> {
        Stepper::new(state, self.policy)
    }

    /// Evaluate while recording every admission
    #[must_use]
    pub fn trace(&self, state: &ResourceState) -> Evaluation {
        let mut stepper = self.stepper(state);
        let admissions: Vec<Admission> = stepper.by_ref().collect();
        Evaluation {
            admissions,
            verdict: stepper.finish(),
        }
    }

    /// Whether any safe sequence exists
    #[must_use]
    pub fn is_safe(&self, state: &ResourceState) -> bool {
        self.evaluate(state).is_ok()
    }
}

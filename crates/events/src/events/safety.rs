use bankers_types::{ProcessId, RoundPolicy};
use serde::{Deserialize, Serialize};

use super::FailureContext;

/// Events emitted while a snapshot is checked for safety
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SafetyEvent {
    /// Snapshot validated and handed to the engine
    EvaluationStarted {
        processes: usize,
        resources: usize,
        policy: RoundPolicy,
    },

    /// One process was found able to finish and released its holdings
    ProcessAdmitted {
        process: ProcessId,
        round: usize,
        position: usize,
        /// Units handed back by the process
        released: Vec<u64>,
        /// Work after the release
        work: Vec<u64>,
    },

    EvaluationCompleted {
        sequence: Vec<ProcessId>,
        rounds: usize,
    },

    UnsafeStateDetected {
        unfinished: Vec<usize>,
        work: Vec<u64>,
        failure: FailureContext,
    },

    /// Input rejected before evaluation
    ValidationFailed {
        failure: FailureContext,
    },
}

//! Command results handed to the renderer

use bankers_safety::{Admission, Evaluation, ResourceState, RoundPolicy, Verdict};
use bankers_types::{Dataset, ProcessId};
use serde::Serialize;

/// Result of one CLI command
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "result", rename_all = "snake_case")]
pub enum CommandOutcome {
    Evaluation(EvaluationReport),
    Verification(VerificationReport),
    DatasetList(DatasetListing),
    DatasetShow(DatasetView),
    Success(String),
}

impl CommandOutcome {
    /// Serialize as pretty JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Process exit code: non-zero when the snapshot was judged unsafe
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Evaluation(report) if !report.verdict.safe => 2,
            Self::Verification(report) if !report.valid => 2,
            _ => 0,
        }
    }
}

/// The matrices of a snapshot, including the derived need
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotView {
    pub processes: usize,
    pub resources: usize,
    pub allocation: Vec<Vec<u64>>,
    pub maximum: Vec<Vec<u64>>,
    pub need: Vec<Vec<u64>>,
    pub available: Vec<u64>,
}

impl From<&ResourceState> for SnapshotView {
    fn from(state: &ResourceState) -> Self {
        Self {
            processes: state.num_processes(),
            resources: state.num_resources(),
            allocation: state.allocation_matrix().to_vec(),
            maximum: state.maximum_matrix().to_vec(),
            need: state.need_matrix().to_vec(),
            available: state.available().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VerdictView {
    pub safe: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<Vec<ProcessId>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unfinished: Vec<usize>,
    /// Work vector when the scan ended
    pub work: Vec<u64>,
}

impl VerdictView {
    pub fn new(verdict: &Verdict, state: &ResourceState) -> Self {
        match verdict {
            Verdict::Safe(sequence) => {
                let mut work = state.available().to_vec();
                for process in sequence.iter() {
                    for (free, held) in work.iter_mut().zip(state.allocation(process.index())) {
                        *free = free.saturating_add(*held);
                    }
                }
                Self {
                    safe: true,
                    sequence: Some(sequence.as_slice().to_vec()),
                    unfinished: Vec::new(),
                    work,
                }
            }
            Verdict::Unsafe(err) => Self {
                safe: false,
                sequence: None,
                unfinished: err.unfinished.clone(),
                work: err.work.clone(),
            },
        }
    }
}

/// Full record of a `check` or `play` run
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    /// Where the snapshot came from
    pub source: String,
    pub policy: RoundPolicy,
    pub snapshot: SnapshotView,
    pub steps: Vec<Admission>,
    pub verdict: VerdictView,
    /// Steps were already shown live during playback
    #[serde(skip)]
    pub streamed: bool,
}

impl EvaluationReport {
    pub fn new(
        source: impl Into<String>,
        policy: RoundPolicy,
        state: &ResourceState,
        evaluation: &Evaluation,
    ) -> Self {
        Self {
            source: source.into(),
            policy,
            snapshot: SnapshotView::from(state),
            steps: evaluation.admissions.clone(),
            verdict: VerdictView::new(&evaluation.verdict, state),
            streamed: false,
        }
    }
}

/// Result of replaying a user-supplied order
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub source: String,
    pub order: Vec<ProcessId>,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub name: String,
    pub processes: usize,
    pub resources: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetListing {
    pub path: String,
    pub datasets: Vec<DatasetSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetView {
    pub name: String,
    pub dataset: Dataset,
    pub snapshot: SnapshotView,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankers_safety::SafetyEngine;

    #[test]
    fn test_unsafe_report_exit_code() {
        let mut dataset = Dataset::textbook();
        dataset.available = vec![0, 0, 0];
        let state = ResourceState::try_from(dataset).unwrap();
        let evaluation = SafetyEngine::default().trace(&state);
        let outcome = CommandOutcome::Evaluation(EvaluationReport::new(
            "test",
            RoundPolicy::OnePerRound,
            &state,
            &evaluation,
        ));
        assert_eq!(outcome.exit_code(), 2);

        let json: serde_json::Value = serde_json::from_str(&outcome.to_json().unwrap()).unwrap();
        assert_eq!(json["kind"], "evaluation");
        assert_eq!(json["result"]["verdict"]["safe"], false);
        assert_eq!(
            json["result"]["verdict"]["unfinished"],
            serde_json::json!([0, 1, 2, 3, 4])
        );
    }

    #[test]
    fn test_safe_report_final_work_is_total() {
        let state = ResourceState::try_from(Dataset::textbook()).unwrap();
        let evaluation = SafetyEngine::default().trace(&state);
        let report = EvaluationReport::new("textbook", RoundPolicy::OnePerRound, &state, &evaluation);

        assert!(report.verdict.safe);
        assert_eq!(report.verdict.work, vec![10, 5, 7]);
        assert_eq!(report.steps.len(), 5);
        assert_eq!(CommandOutcome::Evaluation(report).exit_code(), 0);
    }
}

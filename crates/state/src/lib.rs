#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Validated resource-allocation snapshots
//!
//! A [`ResourceState`] is the immutable input of the safety check: the
//! allocation and maximum-claim matrices, the available vector and the need
//! matrix derived from them. It can only be built from input that passes
//! every validation rule, so an invalid snapshot never reaches evaluation.

pub mod parse;
mod validate;

pub use parse::{parse_count, parse_matrix, parse_row};
pub use validate::ensure_non_negative;

use bankers_errors::ValidationError;
use bankers_types::{Dataset, ProcessId};
use tracing::debug;

/// Validated, read-only snapshot of processes and resources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceState {
    processes: usize,
    resources: usize,
    allocation: Vec<Vec<u64>>,
    maximum: Vec<Vec<u64>>,
    need: Vec<Vec<u64>>,
    available: Vec<u64>,
}

impl ResourceState {
    /// Validate the input and build a snapshot.
    ///
    /// `processes` and `resources` are the declared `n` and `m`; the
    /// matrices must be `n × m` and `available` must have `m` entries.
    ///
    /// # Errors
    ///
    /// - `EmptyDimension` / `Dimension` when a count is zero or a shape
    ///   does not match the declared sizes
    /// - `NegativeValue` for any negative entry
    /// - `InfeasibleClaim` when a process holds more than its maximum
    pub fn new(
        processes: usize,
        resources: usize,
        allocation: Vec<Vec<i64>>,
        maximum: Vec<Vec<i64>>,
        available: Vec<i64>,
    ) -> Result<Self, ValidationError> {
        Self::validate(processes, resources, &allocation, &maximum, &available).inspect_err(
            |err| debug!(error = %err, processes, resources, "rejected resource snapshot"),
        )?;

        let allocation = to_unsigned_matrix(allocation);
        let maximum = to_unsigned_matrix(maximum);
        let need = maximum
            .iter()
            .zip(&allocation)
            .map(|(max_row, held_row)| {
                max_row
                    .iter()
                    .zip(held_row)
                    .map(|(max, held)| max - held)
                    .collect()
            })
            .collect();

        Ok(Self {
            processes,
            resources,
            allocation,
            maximum,
            need,
            available: available.into_iter().map(i64::unsigned_abs).collect(),
        })
    }

    fn validate(
        processes: usize,
        resources: usize,
        allocation: &[Vec<i64>],
        maximum: &[Vec<i64>],
        available: &[i64],
    ) -> Result<(), ValidationError> {
        validate::ensure_non_empty(processes, "num_processes")?;
        validate::ensure_non_empty(resources, "num_resources")?;
        validate::ensure_shape(allocation, processes, resources, "allocation")?;
        validate::ensure_shape(maximum, processes, resources, "maximum")?;
        validate::ensure_len(available, resources, "available")?;

        validate::ensure_matrix_non_negative(allocation, "allocation")?;
        validate::ensure_matrix_non_negative(maximum, "maximum")?;
        validate::ensure_non_negative(available, "available")?;

        validate::ensure_feasible_claims(allocation, maximum)
    }

    /// Number of processes (`n`)
    #[must_use]
    pub fn num_processes(&self) -> usize {
        self.processes
    }

    /// Number of resource types (`m`)
    #[must_use]
    pub fn num_resources(&self) -> usize {
        self.resources
    }

    /// Process identifiers in index order
    pub fn processes(&self) -> impl ExactSizeIterator<Item = ProcessId> + '_ {
        (0..self.processes).map(ProcessId)
    }

    /// Units currently held by process `i`
    ///
    /// # Panics
    ///
    /// Panics if `i` is not below [`num_processes`](Self::num_processes).
    #[must_use]
    pub fn allocation(&self, i: usize) -> &[u64] {
        &self.allocation[i]
    }

    /// Declared maximum claim of process `i`
    ///
    /// # Panics
    ///
    /// Panics if `i` is not below [`num_processes`](Self::num_processes).
    #[must_use]
    pub fn maximum(&self, i: usize) -> &[u64] {
        &self.maximum[i]
    }

    /// Remaining claim of process `i` (`maximum - allocation`)
    ///
    /// # Panics
    ///
    /// Panics if `i` is not below [`num_processes`](Self::num_processes).
    #[must_use]
    pub fn need(&self, i: usize) -> &[u64] {
        &self.need[i]
    }

    #[must_use]
    pub fn allocation_matrix(&self) -> &[Vec<u64>] {
        &self.allocation
    }

    #[must_use]
    pub fn maximum_matrix(&self) -> &[Vec<u64>] {
        &self.maximum
    }

    #[must_use]
    pub fn need_matrix(&self) -> &[Vec<u64>] {
        &self.need
    }

    /// Units of each resource type not held by any process
    #[must_use]
    pub fn available(&self) -> &[u64] {
        &self.available
    }

    /// Convert back into the persisted record
    #[must_use]
    pub fn to_dataset(&self) -> Dataset {
        Dataset {
            num_processes: self.processes,
            num_resources: self.resources,
            allocation: to_signed_matrix(&self.allocation),
            maximum: to_signed_matrix(&self.maximum),
            available: self.available.iter().map(|&v| to_signed(v)).collect(),
        }
    }
}

impl TryFrom<Dataset> for ResourceState {
    type Error = ValidationError;

    fn try_from(dataset: Dataset) -> Result<Self, Self::Error> {
        Self::new(
            dataset.num_processes,
            dataset.num_resources,
            dataset.allocation,
            dataset.maximum,
            dataset.available,
        )
    }
}

impl TryFrom<&Dataset> for ResourceState {
    type Error = ValidationError;

    fn try_from(dataset: &Dataset) -> Result<Self, Self::Error> {
        Self::try_from(dataset.clone())
    }
}

// Only called after validation, so every entry is non-negative.
fn to_unsigned_matrix(matrix: Vec<Vec<i64>>) -> Vec<Vec<u64>> {
    matrix
        .into_iter()
        .map(|row| row.into_iter().map(i64::unsigned_abs).collect())
        .collect()
}

// Values originate from i64 input, so they always fit.
fn to_signed(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn to_signed_matrix(matrix: &[Vec<u64>]) -> Vec<Vec<i64>> {
    matrix
        .iter()
        .map(|row| row.iter().map(|&v| to_signed(v)).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textbook() -> ResourceState {
        ResourceState::try_from(Dataset::textbook()).unwrap()
    }

    #[test]
    fn test_need_is_derived_once() {
        let state = textbook();
        assert_eq!(state.need(0), &[7, 4, 3]);
        assert_eq!(state.need(1), &[1, 2, 2]);
        assert_eq!(state.need(2), &[6, 0, 0]);
        assert_eq!(state.need(3), &[0, 1, 1]);
        assert_eq!(state.need(4), &[4, 3, 1]);
    }

    #[test]
    fn test_accessors() {
        let state = textbook();
        assert_eq!(state.num_processes(), 5);
        assert_eq!(state.num_resources(), 3);
        assert_eq!(state.available(), &[3, 3, 2]);
        assert_eq!(state.allocation(2), &[3, 0, 2]);
        assert_eq!(state.maximum(4), &[4, 3, 3]);
        assert_eq!(
            state.processes().map(ProcessId::index).collect::<Vec<_>>(),
            vec![0, 1, 2, 3, 4]
        );
    }

    #[test]
    fn test_infeasible_claim() {
        let err = ResourceState::new(1, 1, vec![vec![3]], vec![vec![2]], vec![0]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InfeasibleClaim {
                process: 0,
                resource: 0,
                allocated: 3,
                maximum: 2,
            }
        );
    }

    #[test]
    fn test_available_length_mismatch() {
        let mut dataset = Dataset::textbook();
        dataset.available = vec![3, 3];
        let err = ResourceState::try_from(dataset).unwrap_err();
        assert_eq!(err, ValidationError::dimension("available", 3, 2));
    }

    #[test]
    fn test_row_count_mismatch() {
        let mut dataset = Dataset::textbook();
        dataset.num_processes = 6;
        let err = ResourceState::try_from(dataset).unwrap_err();
        assert_eq!(err, ValidationError::dimension("allocation", 6, 5));
    }

    #[test]
    fn test_zero_counts_rejected() {
        let err = ResourceState::new(0, 1, vec![], vec![], vec![1]).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyDimension { .. }));
        let err = ResourceState::new(1, 0, vec![vec![]], vec![vec![]], vec![]).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyDimension { .. }));
    }

    #[test]
    fn test_negative_checked_before_infeasible() {
        let err =
            ResourceState::new(1, 2, vec![vec![5, 0]], vec![vec![1, 0]], vec![-1, 0]).unwrap_err();
        assert!(matches!(err, ValidationError::NegativeValue { value: -1, .. }));
    }

    #[test]
    fn test_negative_maximum() {
        let err = ResourceState::new(1, 1, vec![vec![0]], vec![vec![-4]], vec![0]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NegativeValue {
                field: "maximum[0][0]".into(),
                value: -4,
            }
        );
    }

    #[test]
    fn test_dataset_roundtrip() {
        let dataset = Dataset::textbook();
        let state = ResourceState::try_from(&dataset).unwrap();
        assert_eq!(state.to_dataset(), dataset);
    }
}

//! Replay a caller-supplied completion order against a snapshot

use bankers_errors::SequenceViolation;
use bankers_state::ResourceState;
use bankers_types::ProcessId;

/// Check that `order` is a safe sequence for `state`.
///
/// Walks the order with a private Work vector, requiring every process to be
/// in range, unique and coverable at its position, and the order to contain
/// all processes.
///
/// # Errors
///
/// Returns the first `SequenceViolation` encountered.
pub fn verify_sequence(state: &ResourceState, order: &[ProcessId]) -> Result<(), SequenceViolation> {
    let n = state.num_processes();
    let mut work = state.available().to_vec();
    let mut seen = vec![false; n];

    for (position, process) in order.iter().enumerate() {
        let i = process.index();
        if i >= n {
            return Err(SequenceViolation::OutOfRange {
                process: i,
                processes: n,
            });
        }
        if seen[i] {
            return Err(SequenceViolation::Duplicate { process: i });
        }

        if let Some((resource, (&need, &free))) = state
            .need(i)
            .iter()
            .zip(&work)
            .enumerate()
            .find(|(_, (need, free))| need > free)
        {
            return Err(SequenceViolation::NotCoverable {
                process: i,
                position,
                resource,
                need,
                work: free,
            });
        }

        for (free, held) in work.iter_mut().zip(state.allocation(i)) {
            *free = free.saturating_add(*held);
        }
        seen[i] = true;
    }

    if order.len() != n {
        return Err(SequenceViolation::Incomplete {
            expected: n,
            actual: order.len(),
        });
    }
    Ok(())
}

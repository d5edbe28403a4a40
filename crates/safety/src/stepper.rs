//! Step-wise safety evaluation
//!
//! [`Stepper`] owns the transient Work and Finish scratch state of a single
//! evaluation and yields admissions on demand, so a presentation layer can
//! pace them however it likes. Once `step` returns `None` the verdict is
//! fixed.

use crate::sequence::{Admission, SafeSequence, Verdict};
use bankers_errors::UnsafeStateError;
use bankers_state::ResourceState;
use bankers_types::{ProcessId, RoundPolicy};
use tracing::{debug, error, trace};

/// Pull-based driver for one safety evaluation
#[derive(Debug, Clone)]
pub struct Stepper<'a> {
    state: &'a ResourceState,
    policy: RoundPolicy,
    work: Vec<u64>,
    finish: Vec<bool>,
    sequence: Vec<ProcessId>,
    /// Next index to examine in the current scan
    cursor: usize,
    /// 1-based number of the current scan
    round: usize,
    admitted_this_round: usize,
    verdict: Option<Verdict>,
}

impl<'a> Stepper<'a> {
    pub(crate) fn new(state: &'a ResourceState, policy: RoundPolicy) -> Self {
        Self {
            state,
            policy,
            work: state.available().to_vec(),
            finish: vec![false; state.num_processes()],
            sequence: Vec::with_capacity(state.num_processes()),
            cursor: 0,
            round: 1,
            admitted_this_round: 0,
            verdict: None,
        }
    }

    /// Admit the next process, or `None` once no further admission is
    /// possible. After `None` the verdict is available.
    pub fn step(&mut self) -> Option<Admission> {
        if self.verdict.is_some() {
            return None;
        }

        let n = self.state.num_processes();
        loop {
            if self.sequence.len() == n {
                self.conclude_safe();
                return None;
            }

            // At most n scans can happen: each one before the last admits
            // at least one process.
            debug_assert!(
                self.cursor != 0 || self.round <= n,
                "safety scan exceeded {n} rounds"
            );
            if self.cursor == 0 && self.round > n {
                error!(round = self.round, processes = n, "safety scan exceeded round bound");
                self.conclude_unsafe();
                return None;
            }

            while self.cursor < n {
                let i = self.cursor;
                self.cursor += 1;
                if self.is_admissible(i) {
                    let admission = self.admit(i);
                    match self.policy {
                        RoundPolicy::OnePerRound => self.next_round(),
                        RoundPolicy::Sweep => self.admitted_this_round += 1,
                    }
                    return Some(admission);
                }
            }

            if self.admitted_this_round == 0 {
                self.conclude_unsafe();
                return None;
            }
            self.next_round();
        }
    }

    /// Run the remaining steps and return the verdict
    #[must_use]
    pub fn finish(mut self) -> Verdict {
        while self.step().is_some() {}
        self.verdict
            .take()
            .unwrap_or_else(|| Verdict::Unsafe(self.unsafe_error()))
    }

    /// Verdict once stepping has ended, `None` while admissions remain
    #[must_use]
    pub fn verdict(&self) -> Option<&Verdict> {
        self.verdict.as_ref()
    }

    /// Current Work vector
    #[must_use]
    pub fn work(&self) -> &[u64] {
        &self.work
    }

    /// Processes admitted so far, in order
    #[must_use]
    pub fn sequence(&self) -> &[ProcessId] {
        &self.sequence
    }

    #[must_use]
    pub fn is_finished(&self, process: ProcessId) -> bool {
        self.finish.get(process.index()).copied().unwrap_or(false)
    }

    /// Number of the scan in progress
    ///
    /// Once every process is admitted under one-per-round this already names
    /// the scan after the last admission; see [`Evaluation::rounds`](crate::Evaluation::rounds).
    #[must_use]
    pub fn round(&self) -> usize {
        self.round
    }

    #[must_use]
    pub fn policy(&self) -> RoundPolicy {
        self.policy
    }

    fn is_admissible(&self, i: usize) -> bool {
        !self.finish[i]
            && self
                .state
                .need(i)
                .iter()
                .zip(&self.work)
                .all(|(need, work)| need <= work)
    }

    fn admit(&mut self, i: usize) -> Admission {
        let work_before = self.work.clone();
        for (work, held) in self.work.iter_mut().zip(self.state.allocation(i)) {
            *work = work.saturating_add(*held);
        }
        self.finish[i] = true;
        let process = ProcessId(i);
        self.sequence.push(process);

        debug!(
            process = %process,
            round = self.round,
            work = ?self.work,
            "admitted process to safe sequence"
        );

        Admission {
            process,
            round: self.round,
            position: self.sequence.len() - 1,
            work_before,
            work_after: self.work.clone(),
        }
    }

    fn next_round(&mut self) {
        trace!(round = self.round, "starting next scan");
        self.round += 1;
        self.cursor = 0;
        self.admitted_this_round = 0;
    }

    fn conclude_safe(&mut self) {
        debug!(round = self.round, "snapshot is safe");
        self.verdict = Some(Verdict::Safe(SafeSequence::new(self.sequence.clone())));
    }

    fn conclude_unsafe(&mut self) {
        let err = self.unsafe_error();
        debug!(unfinished = ?err.unfinished, work = ?err.work, "snapshot is unsafe");
        self.verdict = Some(Verdict::Unsafe(err));
    }

    fn unsafe_error(&self) -> UnsafeStateError {
        UnsafeStateError {
            unfinished: self
                .finish
                .iter()
                .enumerate()
                .filter(|(_, done)| !**done)
                .map(|(i, _)| i)
                .collect(),
            work: self.work.clone(),
            admitted: self.sequence.iter().map(|p| p.index()).collect(),
        }
    }
}

impl Iterator for Stepper<'_> {
    type Item = Admission;

    fn next(&mut self) -> Option<Self::Item> {
        self.step()
    }
}

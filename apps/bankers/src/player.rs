//! Paced playback of a safety evaluation

use crate::outcome::EvaluationReport;
use bankers_events::EventEmitter;
use bankers_safety::{Evaluation, ResourceState, SafetyEngine, Verdict};
use std::time::Duration;

/// Walks a [`Stepper`](bankers_safety::Stepper) and announces each
/// admission as an event, pausing between steps when animating
pub struct SequencePlayer<'e, E: EventEmitter> {
    engine: SafetyEngine,
    delay: Duration,
    animate: bool,
    emitter: &'e E,
}

impl<'e, E: EventEmitter> SequencePlayer<'e, E> {
    pub fn new(engine: SafetyEngine, delay: Duration, animate: bool, emitter: &'e E) -> Self {
        Self {
            engine,
            delay,
            animate,
            emitter,
        }
    }

    /// Play the evaluation of `state` and return its report
    pub async fn play(&self, source: &str, state: &ResourceState) -> EvaluationReport {
        self.emitter.emit_evaluation_started(
            state.num_processes(),
            state.num_resources(),
            self.engine.policy(),
        );

        let mut stepper = self.engine.stepper(state);
        let mut admissions = Vec::with_capacity(state.num_processes());

        while let Some(admission) = stepper.step() {
            if self.animate && !admissions.is_empty() && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.emitter.emit_process_admitted(
                admission.process,
                admission.round,
                admission.position,
                state.allocation(admission.process.index()).to_vec(),
                admission.work_after.clone(),
            );
            admissions.push(admission);
        }

        let evaluation = Evaluation {
            admissions,
            verdict: stepper.finish(),
        };
        match &evaluation.verdict {
            Verdict::Safe(sequence) => self
                .emitter
                .emit_evaluation_completed(sequence.as_slice().to_vec(), evaluation.rounds()),
            Verdict::Unsafe(err) => self.emitter.emit_unsafe_state(err),
        }

        let mut report = EvaluationReport::new(source, self.engine.policy(), state, &evaluation);
        report.streamed = true;
        report
    }
}

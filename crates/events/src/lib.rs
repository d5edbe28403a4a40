#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for async communication in bankers
//!
//! Library crates never print. Anything the user should see travels through
//! this channel as an [`EventMessage`] and is rendered or logged by the CLI.
//!
//! - **Domain events**: grouped by area (general, safety, dataset)
//! - **`EventEmitter` trait**: one API whether you hold a raw sender or a
//!   context struct that owns one
//! - **Metadata**: every message carries an [`EventMeta`] with id, timestamp,
//!   level and source for tracing

pub mod meta;
pub use meta::{EventLevel, EventMeta, EventSource};

pub mod events;
pub use events::{AppEvent, DatasetEvent, FailureContext, GeneralEvent, SafetyEvent};

use bankers_types::{ProcessId, RoundPolicy};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// An event together with its metadata envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub meta: EventMeta,
    pub event: AppEvent,
}

impl EventMessage {
    #[must_use]
    pub fn new(meta: EventMeta, event: AppEvent) -> Self {
        Self { meta, event }
    }

    /// Wrap an event, deriving level and source from the event itself
    #[must_use]
    pub fn from_event(event: AppEvent) -> Self {
        let meta = EventMeta::for_event(&event);
        Self { meta, event }
    }
}

pub type EventSender = UnboundedSender<EventMessage>;

pub type EventReceiver = UnboundedReceiver<EventMessage>;

/// Create a new event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// The unified trait for emitting events throughout bankers
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Correlation id stamped on every message this emitter sends
    fn correlation_id(&self) -> Option<&str> {
        None
    }

    /// Adjust metadata before a message is sent
    fn enrich_meta(&self, meta: EventMeta) -> EventMeta {
        match self.correlation_id() {
            Some(id) => meta.with_correlation_id(id),
            None => meta,
        }
    }

    fn emit(&self, event: AppEvent) {
        let meta = EventMeta::for_event(&event);
        self.emit_with_meta(meta, event);
    }

    fn emit_with_meta(&self, meta: EventMeta, event: AppEvent) {
        if let Some(sender) = self.event_sender() {
            // A dropped receiver only means nobody is listening anymore
            let _ = sender.send(EventMessage::new(self.enrich_meta(meta), event));
        }
    }

    fn emit_warning(&self, message: impl Into<String>, context: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::warning(message, context)));
    }

    fn emit_operation_started(&self, operation: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::OperationStarted {
            operation: operation.into(),
        }));
    }

    fn emit_operation_completed(&self, operation: impl Into<String>, success: bool) {
        self.emit(AppEvent::General(GeneralEvent::OperationCompleted {
            operation: operation.into(),
            success,
        }));
    }

    fn emit_operation_failed(&self, operation: impl Into<String>, failure: FailureContext) {
        self.emit(AppEvent::General(GeneralEvent::OperationFailed {
            operation: operation.into(),
            failure,
        }));
    }

    fn emit_evaluation_started(&self, processes: usize, resources: usize, policy: RoundPolicy) {
        self.emit(AppEvent::Safety(SafetyEvent::EvaluationStarted {
            processes,
            resources,
            policy,
        }));
    }

    fn emit_process_admitted(
        &self,
        process: ProcessId,
        round: usize,
        position: usize,
        released: Vec<u64>,
        work: Vec<u64>,
    ) {
        self.emit(AppEvent::Safety(SafetyEvent::ProcessAdmitted {
            process,
            round,
            position,
            released,
            work,
        }));
    }

    fn emit_evaluation_completed(&self, sequence: Vec<ProcessId>, rounds: usize) {
        self.emit(AppEvent::Safety(SafetyEvent::EvaluationCompleted {
            sequence,
            rounds,
        }));
    }

    fn emit_unsafe_state(&self, error: &bankers_errors::UnsafeStateError) {
        self.emit(AppEvent::Safety(SafetyEvent::UnsafeStateDetected {
            unfinished: error.unfinished.clone(),
            work: error.work.clone(),
            failure: FailureContext::from_error(error),
        }));
    }
}

impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}

/// Sender bound to one correlation id, shared by all events of a command
#[derive(Debug, Clone)]
pub struct EventContext {
    sender: EventSender,
    correlation_id: String,
}

impl EventContext {
    /// Bind `sender` to a fresh correlation id
    #[must_use]
    pub fn new(sender: EventSender) -> Self {
        Self {
            sender,
            correlation_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    #[must_use]
    pub fn with_correlation_id(sender: EventSender, correlation_id: impl Into<String>) -> Self {
        Self {
            sender,
            correlation_id: correlation_id.into(),
        }
    }

    #[must_use]
    pub fn sender(&self) -> &EventSender {
        &self.sender
    }
}

impl EventEmitter for EventContext {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.sender)
    }

    fn correlation_id(&self) -> Option<&str> {
        Some(&self.correlation_id)
    }
}

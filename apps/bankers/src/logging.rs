//! Structured logging integration for events
//!
//! Every event that crosses the channel is also recorded through `tracing`
//! with its metadata as structured fields, so debug log files carry the
//! complete admission trail of a run.

use bankers_events::{AppEvent, DatasetEvent, EventMessage, GeneralEvent, SafetyEvent};
use tracing::{debug, error, info, warn};

/// Log an event at its level with structured fields
pub fn log_event_with_tracing(message: &EventMessage) {
    let meta = &message.meta;
    match &message.event {
        AppEvent::Safety(event) => match event {
            SafetyEvent::EvaluationStarted {
                processes,
                resources,
                policy,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    processes,
                    resources,
                    policy = %policy,
                    "Safety evaluation started"
                );
            }
            SafetyEvent::ProcessAdmitted {
                process,
                round,
                position,
                released,
                work,
            } => {
                debug!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    process = %process,
                    round,
                    position,
                    released = ?released,
                    work = ?work,
                    "Process admitted"
                );
            }
            SafetyEvent::EvaluationCompleted { sequence, rounds } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    sequence = ?sequence,
                    rounds,
                    "Safe sequence found"
                );
            }
            SafetyEvent::UnsafeStateDetected {
                unfinished,
                work,
                failure,
            } => {
                warn!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    unfinished = ?unfinished,
                    work = ?work,
                    code = ?failure.code,
                    message = %failure.message,
                    "Unsafe state detected"
                );
            }
            SafetyEvent::ValidationFailed { failure } => {
                warn!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Snapshot rejected"
                );
            }
        },

        AppEvent::Dataset(event) => match event {
            DatasetEvent::Loaded {
                name,
                processes,
                resources,
            } => {
                info!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    name = %name,
                    processes,
                    resources,
                    "Dataset loaded"
                );
            }
            DatasetEvent::Saved { name, path } => {
                info!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    name = %name,
                    path = %path.display(),
                    "Dataset saved"
                );
            }
            DatasetEvent::Removed { name } => {
                info!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    name = %name,
                    "Dataset removed"
                );
            }
            DatasetEvent::Imported { name, source } => {
                info!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    name = %name,
                    file = %source.display(),
                    "Dataset imported"
                );
            }
            DatasetEvent::Failed { name, failure } => {
                error!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    name = ?name,
                    retryable = failure.retryable,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Dataset operation failed"
                );
            }
        },

        AppEvent::General(event) => match event {
            GeneralEvent::Warning { message, context } => {
                warn!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    context = %context,
                    "{message}"
                );
            }
            GeneralEvent::OperationStarted { operation } => {
                debug!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    operation = %operation,
                    "Operation started"
                );
            }
            GeneralEvent::OperationCompleted { operation, success } => {
                info!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    operation = %operation,
                    success,
                    "Operation completed"
                );
            }
            GeneralEvent::OperationFailed { operation, failure } => {
                error!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    operation = %operation,
                    retryable = failure.retryable,
                    code = ?failure.code,
                    message = %failure.message,
                    "Operation failed"
                );
            }
            GeneralEvent::ConfigurationValidated { source, warnings } => {
                info!(
                    correlation = ?meta.correlation_id,
                    config = %source,
                    warnings = ?warnings,
                    "Configuration validated"
                );
            }
        },
    }
}

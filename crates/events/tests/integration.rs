//! Integration tests for events

use bankers_errors::UnsafeStateError;
use bankers_events::*;
use bankers_types::{ProcessId, RoundPolicy};

#[tokio::test]
async fn test_operation_lifecycle_levels() {
    let (tx, mut rx) = channel();

    tx.emit_operation_started("dataset import");
    tx.emit_warning("Replaced existing dataset 'lab'", "/tmp/banker_data.json");
    tx.emit_operation_completed("dataset import", true);
    tx.emit_operation_failed(
        "check",
        FailureContext::new(
            Some("storage.dataset_not_found"),
            "no dataset 'lab'",
            None::<String>,
            false,
        ),
    );
    drop(tx);

    let mut messages = Vec::new();
    while let Some(message) = rx.recv().await {
        assert_eq!(message.meta.source, EventSource::General);
        assert!(message.meta.correlation_id.is_none());
        messages.push(message);
    }

    let levels: Vec<EventLevel> = messages.iter().map(|m| m.meta.level).collect();
    assert_eq!(
        levels,
        vec![EventLevel::Debug, EventLevel::Warn, EventLevel::Info, EventLevel::Error]
    );
    match &messages[1].event {
        AppEvent::General(GeneralEvent::Warning { message, context }) => {
            assert!(message.contains("'lab'"));
            assert_eq!(context, "/tmp/banker_data.json");
        }
        other => panic!("unexpected event {other:?}"),
    }
    match &messages[3].event {
        AppEvent::General(GeneralEvent::OperationFailed { operation, failure }) => {
            assert_eq!(operation, "check");
            assert_eq!(failure.code.as_deref(), Some("storage.dataset_not_found"));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn test_dropped_receiver() {
    let (tx, rx) = channel();
    drop(rx);

    // Should not panic when receiver is dropped
    tx.emit_operation_started("check");
}

#[tokio::test]
async fn test_context_stamps_correlation_id() {
    let (tx, mut rx) = channel();
    let ctx = EventContext::with_correlation_id(tx, "run-42");

    ctx.emit_evaluation_started(5, 3, RoundPolicy::Sweep);
    ctx.emit_process_admitted(ProcessId(1), 1, 0, vec![2, 0, 0], vec![5, 3, 2]);
    drop(ctx);

    let mut messages = Vec::new();
    while let Some(message) = rx.recv().await {
        messages.push(message);
    }

    assert_eq!(messages.len(), 2);
    for message in &messages {
        assert_eq!(message.meta.correlation_id.as_deref(), Some("run-42"));
        assert_eq!(message.meta.source, EventSource::Safety);
    }
    assert_eq!(messages[0].meta.level, EventLevel::Info);
    assert_eq!(messages[1].meta.level, EventLevel::Debug);
}

#[tokio::test]
async fn test_unsafe_state_carries_failure_context() {
    let (tx, mut rx) = channel();
    let error = UnsafeStateError {
        unfinished: vec![0, 2],
        work: vec![1, 0],
        admitted: vec![1],
    };
    tx.emit_unsafe_state(&error);

    let message = rx.recv().await.unwrap();
    assert_eq!(message.meta.level, EventLevel::Warn);
    match message.event {
        AppEvent::Safety(SafetyEvent::UnsafeStateDetected {
            unfinished,
            work,
            failure,
        }) => {
            assert_eq!(unfinished, vec![0, 2]);
            assert_eq!(work, vec![1, 0]);
            assert_eq!(failure.code.as_deref(), Some("safety.unsafe"));
            assert!(failure.message.contains("P0, P2"));
            assert!(!failure.retryable);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn test_event_serialization_shape() {
    let message = EventMessage::from_event(AppEvent::Safety(SafetyEvent::EvaluationCompleted {
        sequence: vec![ProcessId(1), ProcessId(3)],
        rounds: 2,
    }));
    let json = serde_json::to_value(&message).unwrap();

    assert_eq!(json["event"]["domain"], "safety");
    assert_eq!(json["event"]["event"]["type"], "evaluation_completed");
    assert_eq!(json["event"]["event"]["sequence"], serde_json::json!([1, 3]));
    assert_eq!(json["meta"]["source"], "safety");
    assert_eq!(json["meta"]["level"], "info");
}

#[test]
fn test_dataset_log_targets() {
    let event = AppEvent::Dataset(DatasetEvent::Removed {
        name: "textbook".into(),
    });
    assert_eq!(event.log_target(), "bankers::events::dataset");
    assert_eq!(event.event_source(), EventSource::Dataset);
    assert_eq!(event.log_level(), tracing::Level::INFO);
}

//! Event handling and user feedback

use crate::display::format_vector;
use crate::logging::log_event_with_tracing;
use bankers_events::{AppEvent, DatasetEvent, EventMessage, GeneralEvent, SafetyEvent};
use console::{Style, Term};

/// Renders events to stderr while a command runs
pub struct EventHandler {
    colors_enabled: bool,
    debug_enabled: bool,
    /// JSON mode keeps the console silent; events are only logged
    quiet: bool,
    term: Term,
}

impl EventHandler {
    pub fn new(colors_enabled: bool, debug_enabled: bool, quiet: bool) -> Self {
        Self {
            colors_enabled,
            debug_enabled,
            quiet,
            term: Term::stderr(),
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, message: EventMessage) {
        log_event_with_tracing(&message);

        if self.quiet {
            return;
        }
        if let Some(line) = self.render(&message.event) {
            self.term.write_line(&line).unwrap_or(());
        }
    }

    /// Console line for an event, if it should be shown
    pub fn render(&self, event: &AppEvent) -> Option<String> {
        match event {
            AppEvent::Safety(event) => self.render_safety(event),
            AppEvent::Dataset(event) => self.render_dataset(event),
            AppEvent::General(event) => self.render_general(event),
        }
    }

    fn render_safety(&self, event: &SafetyEvent) -> Option<String> {
        match event {
            SafetyEvent::EvaluationStarted {
                processes,
                resources,
                policy,
            } => self.debug_only(format!(
                "Evaluating {processes} processes over {resources} resources ({policy})"
            )),
            SafetyEvent::ProcessAdmitted {
                process,
                round,
                position,
                released,
                work,
            } => Some(format!(
                "Step {} (round {round}): {} can finish, releases {} -> Work {}",
                position + 1,
                self.paint(&process.to_string(), &Style::new().green().bold()),
                format_vector(released),
                format_vector(work)
            )),
            SafetyEvent::EvaluationCompleted { sequence, rounds } => self.debug_only(format!(
                "Evaluation finished after {rounds} round(s) with {} admissions",
                sequence.len()
            )),
            SafetyEvent::UnsafeStateDetected { failure, .. } => {
                self.debug_only(format!("Stalled: {}", failure.message))
            }
            SafetyEvent::ValidationFailed { failure } => self.debug_only(format!(
                "{} {}",
                self.paint("Invalid input:", &Style::new().yellow()),
                failure.message
            )),
        }
    }

    fn render_dataset(&self, event: &DatasetEvent) -> Option<String> {
        // Final results already report dataset changes on stdout
        let line = match event {
            DatasetEvent::Loaded {
                name,
                processes,
                resources,
            } => format!("Loaded dataset '{name}' ({processes}x{resources})"),
            DatasetEvent::Saved { name, path } => {
                format!("Saved dataset '{name}' to {}", path.display())
            }
            DatasetEvent::Removed { name } => format!("Removed dataset '{name}'"),
            DatasetEvent::Imported { name, source } => {
                format!("Imported dataset '{name}' from {}", source.display())
            }
            DatasetEvent::Failed { name, failure } => format!(
                "{} {}{}",
                self.paint("Dataset error:", &Style::new().red()),
                name.as_deref()
                    .map(|n| format!("'{n}': "))
                    .unwrap_or_default(),
                failure.message
            ),
        };
        self.debug_only(line)
    }

    fn render_general(&self, event: &GeneralEvent) -> Option<String> {
        match event {
            GeneralEvent::Warning { message, context } => Some(format!(
                "{} {message} ({context})",
                self.paint("Warning:", &Style::new().yellow())
            )),
            // The error itself is printed once the command returns
            GeneralEvent::OperationFailed { operation, failure } => self.debug_only(format!(
                "{} {operation}: {}",
                self.paint("Failed:", &Style::new().red()),
                failure.message
            )),
            GeneralEvent::OperationStarted { operation } => {
                self.debug_only(format!("Started {operation}"))
            }
            GeneralEvent::OperationCompleted { operation, success } => {
                self.debug_only(format!("Completed {operation} (success: {success})"))
            }
            GeneralEvent::ConfigurationValidated { source, warnings } => {
                if warnings.is_empty() {
                    self.debug_only(format!("Configuration loaded from {source}"))
                } else {
                    Some(format!(
                        "{} {source}: {}",
                        self.paint("Configuration warnings in", &Style::new().yellow()),
                        warnings.join("; ")
                    ))
                }
            }
        }
    }

    fn debug_only(&self, line: String) -> Option<String> {
        self.debug_enabled.then_some(line)
    }

    fn paint(&self, text: &str, style: &Style) -> String {
        if self.colors_enabled {
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankers_events::FailureContext;
    use bankers_types::{ProcessId, RoundPolicy};

    #[test]
    fn test_admission_line() {
        let handler = EventHandler::new(false, false, false);
        let line = handler
            .render(&AppEvent::Safety(SafetyEvent::ProcessAdmitted {
                process: ProcessId(1),
                round: 1,
                position: 0,
                released: vec![2, 0, 0],
                work: vec![5, 3, 2],
            }))
            .unwrap();
        assert_eq!(
            line,
            "Step 1 (round 1): P1 can finish, releases [2, 0, 0] -> Work [5, 3, 2]"
        );
    }

    #[test]
    fn test_debug_events_hidden_by_default() {
        let event = AppEvent::Safety(SafetyEvent::EvaluationStarted {
            processes: 5,
            resources: 3,
            policy: RoundPolicy::Sweep,
        });
        assert!(EventHandler::new(false, false, false).render(&event).is_none());
        assert!(EventHandler::new(false, true, false)
            .render(&event)
            .unwrap()
            .contains("sweep"));
    }

    #[test]
    fn test_dataset_failure_line_in_debug() {
        let event = AppEvent::Dataset(DatasetEvent::Failed {
            name: Some("lab".into()),
            failure: FailureContext::new(None::<String>, "boom", None::<String>, false),
        });
        assert!(EventHandler::new(false, false, false).render(&event).is_none());
        let line = EventHandler::new(false, true, false).render(&event).unwrap();
        assert_eq!(line, "Dataset error: 'lab': boom");
    }

    #[test]
    fn test_operation_lifecycle_only_in_debug() {
        let failed = AppEvent::General(GeneralEvent::OperationFailed {
            operation: "check".into(),
            failure: FailureContext::new(
                None::<String>,
                "no dataset 'lab'",
                None::<String>,
                false,
            ),
        });
        let started = AppEvent::General(GeneralEvent::OperationStarted {
            operation: "check".into(),
        });
        let quiet = EventHandler::new(false, false, false);
        assert!(quiet.render(&failed).is_none());
        assert!(quiet.render(&started).is_none());

        let debug = EventHandler::new(false, true, false);
        assert_eq!(debug.render(&failed).unwrap(), "Failed: check: no dataset 'lab'");
        assert_eq!(debug.render(&started).unwrap(), "Started check");
    }

    #[test]
    fn test_warning_always_shown() {
        let event = AppEvent::General(GeneralEvent::warning(
            "Replaced existing dataset 'lab'",
            "/tmp/banker_data.json",
        ));
        assert_eq!(
            EventHandler::new(false, false, false).render(&event).unwrap(),
            "Warning: Replaced existing dataset 'lab' (/tmp/banker_data.json)"
        );
    }
}

//! Output rendering and formatting

use crate::outcome::{
    CommandOutcome, DatasetListing, DatasetView, EvaluationReport, SnapshotView,
    VerificationReport,
};
use bankers_safety::Admission;
use bankers_types::ColorChoice;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use console::{Style, Term};
use std::io;

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    json_output: bool,
    color_choice: ColorChoice,
    term: Term,
}

impl OutputRenderer {
    pub fn new(json_output: bool, color_choice: ColorChoice) -> Self {
        Self {
            json_output,
            color_choice,
            term: Term::stdout(),
        }
    }

    /// Render a command result
    pub fn render_result(&self, result: &CommandOutcome) -> io::Result<()> {
        if self.json_output {
            self.render_json(result)
        } else {
            self.render_table(result)
        }
    }

    fn render_json(&self, result: &CommandOutcome) -> io::Result<()> {
        let json = result.to_json().map_err(io::Error::other)?;
        self.term.write_line(&json)
    }

    fn render_table(&self, result: &CommandOutcome) -> io::Result<()> {
        match result {
            CommandOutcome::Evaluation(report) => self.render_evaluation(report),
            CommandOutcome::Verification(report) => self.render_verification(report),
            CommandOutcome::DatasetList(listing) => self.render_dataset_list(listing),
            CommandOutcome::DatasetShow(view) => self.render_dataset(view),
            CommandOutcome::Success(message) => self.term.write_line(message),
        }
    }

    fn render_evaluation(&self, report: &EvaluationReport) -> io::Result<()> {
        let snapshot = &report.snapshot;
        self.term.write_line(&format!(
            "{} ({} processes, {} resources, policy {})",
            self.bold(&report.source),
            snapshot.processes,
            snapshot.resources,
            report.policy
        ))?;
        self.term.write_line(&snapshot_table(snapshot).to_string())?;
        self.term.write_line(&format!(
            "Available: {}",
            format_vector(&snapshot.available)
        ))?;

        if !report.streamed && !report.steps.is_empty() {
            self.term.write_line("")?;
            self.term.write_line(&steps_table(&report.steps).to_string())?;
        }

        self.term.write_line("")?;
        let verdict = &report.verdict;
        match &verdict.sequence {
            Some(sequence) if verdict.safe => {
                let order = sequence
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" -> ");
                self.term.write_line(&format!(
                    "{} safe sequence: {order}",
                    self.paint("[SAFE]", &Style::new().green().bold())
                ))
            }
            _ => {
                let blocked = verdict
                    .unfinished
                    .iter()
                    .map(|i| format!("P{i}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                self.term.write_line(&format!(
                    "{} no safe sequence; {blocked} cannot finish with Work {}",
                    self.paint("[UNSAFE]", &Style::new().red().bold()),
                    format_vector(&verdict.work)
                ))
            }
        }
    }

    fn render_verification(&self, report: &VerificationReport) -> io::Result<()> {
        let order = report
            .order
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ");
        if report.valid {
            self.term.write_line(&format!(
                "{} {order} is a safe sequence for {}",
                self.paint("[OK]", &Style::new().green().bold()),
                report.source
            ))
        } else {
            self.term.write_line(&format!(
                "{} {order} is not a safe sequence for {}: {}",
                self.paint("[REJECTED]", &Style::new().red().bold()),
                report.source,
                report.violation.as_deref().unwrap_or("unknown violation")
            ))
        }
    }

    fn render_dataset_list(&self, listing: &DatasetListing) -> io::Result<()> {
        if listing.datasets.is_empty() {
            return self
                .term
                .write_line(&format!("No datasets saved in {}.", listing.path));
        }

        let mut table = new_table();
        table.set_header(vec![
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Processes").add_attribute(Attribute::Bold),
            Cell::new("Resources").add_attribute(Attribute::Bold),
        ]);
        for summary in &listing.datasets {
            table.add_row(vec![
                Cell::new(&summary.name),
                Cell::new(summary.processes),
                Cell::new(summary.resources),
            ]);
        }

        self.term.write_line(&table.to_string())?;
        self.term.write_line(&format!("Stored in {}", listing.path))
    }

    fn render_dataset(&self, view: &DatasetView) -> io::Result<()> {
        self.term.write_line(&self.bold(&view.name))?;
        self.term
            .write_line(&snapshot_table(&view.snapshot).to_string())?;
        self.term.write_line(&format!(
            "Available: {}",
            format_vector(&view.snapshot.available)
        ))
    }

    fn bold(&self, text: &str) -> String {
        self.paint(text, &Style::new().bold())
    }

    fn paint(&self, text: &str, style: &Style) -> String {
        if self.supports_color() {
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn supports_color(&self) -> bool {
        match self.color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.term.features().colors_supported(),
        }
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Per-process allocation, maximum and need
pub fn snapshot_table(snapshot: &SnapshotView) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Process").add_attribute(Attribute::Bold),
        Cell::new("Allocation").add_attribute(Attribute::Bold),
        Cell::new("Max").add_attribute(Attribute::Bold),
        Cell::new("Need").add_attribute(Attribute::Bold),
    ]);

    for i in 0..snapshot.processes {
        table.add_row(vec![
            Cell::new(format!("P{i}")),
            Cell::new(format_vector(&snapshot.allocation[i])),
            Cell::new(format_vector(&snapshot.maximum[i])),
            Cell::new(format_vector(&snapshot.need[i])),
        ]);
    }
    table
}

/// Admission trail of one evaluation
pub fn steps_table(steps: &[Admission]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Step").add_attribute(Attribute::Bold),
        Cell::new("Round").add_attribute(Attribute::Bold),
        Cell::new("Process").add_attribute(Attribute::Bold),
        Cell::new("Work before").add_attribute(Attribute::Bold),
        Cell::new("Work after").add_attribute(Attribute::Bold),
    ]);

    for admission in steps {
        table.add_row(vec![
            Cell::new(admission.position + 1),
            Cell::new(admission.round),
            Cell::new(admission.process).fg(Color::Green),
            Cell::new(format_vector(&admission.work_before)),
            Cell::new(format_vector(&admission.work_after)),
        ]);
    }
    table
}

pub fn format_vector(values: &[u64]) -> String {
    let inner = values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{inner}]")
}

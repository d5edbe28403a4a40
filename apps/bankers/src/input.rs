//! Interactive snapshot entry

use crate::error::CliError;
use bankers_errors::ValidationError;
use bankers_state::parse::{parse_count, parse_row};
use bankers_state::{ensure_non_negative, ResourceState};
use std::io::{BufRead, Write};

/// Line-oriented prompter that asks again until each answer is valid.
///
/// Prompts and complaints go to `output`, so with stdin/stderr the final
/// result on stdout stays clean.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Collect a complete snapshot
    pub fn read_state(&mut self) -> Result<ResourceState, CliError> {
        let n = self.ask("Number of processes: ", |line| {
            parse_count(line, "num_processes")
        })?;
        let m = self.ask("Number of resource types: ", |line| {
            parse_count(line, "num_resources")
        })?;

        writeln!(self.output, "Allocation matrix ({m} values per row):")?;
        let mut allocation = Vec::with_capacity(n);
        for i in 0..n {
            let field = format!("allocation[{i}]");
            allocation.push(self.ask(&format!("  P{i}: "), |line| {
                non_negative_row(line, m, &field)
            })?);
        }

        writeln!(self.output, "Maximum matrix ({m} values per row):")?;
        let mut maximum = Vec::with_capacity(n);
        for (i, held) in allocation.iter().enumerate() {
            let field = format!("maximum[{i}]");
            maximum.push(self.ask(&format!("  P{i}: "), |line| {
                let row = non_negative_row(line, m, &field)?;
                covers_allocation(i, held, &row)?;
                Ok(row)
            })?);
        }

        let available = self.ask(&format!("Available ({m} values): "), |line| {
            non_negative_row(line, m, "available")
        })?;

        Ok(ResourceState::new(n, m, allocation, maximum, available)?)
    }

    fn ask<T>(
        &mut self,
        prompt: &str,
        mut parse: impl FnMut(&str) -> Result<T, ValidationError>,
    ) -> Result<T, CliError> {
        loop {
            write!(self.output, "{prompt}")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(CliError::Input("input ended before the snapshot was complete".into()));
            }

            match parse(line.trim()) {
                Ok(value) => return Ok(value),
                Err(err) => writeln!(self.output, "  {err}; please try again")?,
            }
        }
    }
}

fn non_negative_row(line: &str, m: usize, field: &str) -> Result<Vec<i64>, ValidationError> {
    let row = parse_row(line, m, field)?;
    ensure_non_negative(&row, field)?;
    Ok(row)
}

fn covers_allocation(process: usize, held: &[i64], maximum: &[i64]) -> Result<(), ValidationError> {
    match held
        .iter()
        .zip(maximum)
        .enumerate()
        .find(|(_, (held, max))| held > max)
    {
        Some((resource, (&allocated, &maximum))) => Err(ValidationError::InfeasibleClaim {
            process,
            resource,
            allocated,
            maximum,
        }),
        None => Ok(()),
    }
}

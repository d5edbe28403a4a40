//! Text input parsing for line-oriented collaborators
//!
//! Interactive prompts and plain-text files hand over whitespace-separated
//! rows. These helpers turn them into the signed values that
//! [`ResourceState::new`](crate::ResourceState::new) validates.

use crate::validate;
use crate::ResourceState;
use bankers_errors::ValidationError;

fn parse_token(token: &str, field: &str) -> Result<i64, ValidationError> {
    token.parse().map_err(|_| ValidationError::NonInteger {
        field: field.to_string(),
        token: token.to_string(),
    })
}

/// Parse a process or resource count.
///
/// # Errors
///
/// `NonInteger` for text that is not a whole number, `NegativeValue` for a
/// negative count and `EmptyDimension` for zero.
pub fn parse_count(text: &str, field: &str) -> Result<usize, ValidationError> {
    let value = parse_token(text.trim(), field)?;
    if value < 0 {
        return Err(ValidationError::NegativeValue {
            field: field.to_string(),
            value,
        });
    }
    let count = usize::try_from(value).map_err(|_| ValidationError::NonInteger {
        field: field.to_string(),
        token: text.trim().to_string(),
    })?;
    validate::ensure_non_empty(count, field)?;
    Ok(count)
}

/// Parse one whitespace-separated row of exactly `expected` integers.
///
/// Negative values are accepted here and rejected by state construction.
///
/// # Errors
///
/// `NonInteger` for the first unparsable token, `Dimension` when the token
/// count differs from `expected`.
pub fn parse_row(line: &str, expected: usize, field: &str) -> Result<Vec<i64>, ValidationError> {
    let row = line
        .split_whitespace()
        .map(|token| parse_token(token, field))
        .collect::<Result<Vec<_>, _>>()?;
    if row.len() != expected {
        return Err(ValidationError::dimension(field, expected, row.len()));
    }
    Ok(row)
}

/// Parse `rows` lines of `cols` integers each.
///
/// # Errors
///
/// Propagates the first row error; a missing or extra line is a
/// `Dimension` error on the matrix itself.
pub fn parse_matrix<'a, I>(
    lines: I,
    rows: usize,
    cols: usize,
    field: &str,
) -> Result<Vec<Vec<i64>>, ValidationError>
where
    I: IntoIterator<Item = &'a str>,
{
    let matrix = lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| parse_row(line, cols, &format!("{field}[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;
    if matrix.len() != rows {
        return Err(ValidationError::dimension(field, rows, matrix.len()));
    }
    Ok(matrix)
}

impl ResourceState {
    /// Build a state from raw text the way a console prompt collects it.
    ///
    /// # Errors
    ///
    /// Any `ValidationError`, including `NonInteger` for unparsable tokens.
    pub fn from_text(
        processes: &str,
        resources: &str,
        allocation: &[&str],
        maximum: &[&str],
        available: &str,
    ) -> Result<Self, ValidationError> {
        let n = parse_count(processes, "num_processes")?;
        let m = parse_count(resources, "num_resources")?;
        let allocation = parse_matrix(allocation.iter().copied(), n, m, "allocation")?;
        let maximum = parse_matrix(maximum.iter().copied(), n, m, "maximum")?;
        let available = parse_row(available, m, "available")?;
        Self::new(n, m, allocation, maximum, available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_row() {
        assert_eq!(parse_row(" 3  3 2 ", 3, "available").unwrap(), vec![3, 3, 2]);
    }

    #[test]
    fn test_parse_row_non_integer() {
        let err = parse_row("1 two 3", 3, "allocation[0]").unwrap_err();
        assert_eq!(
            err,
            ValidationError::NonInteger {
                field: "allocation[0]".into(),
                token: "two".into(),
            }
        );
    }

    #[test]
    fn test_parse_row_decimal_is_not_integer() {
        let err = parse_row("1.5 2", 2, "available").unwrap_err();
        assert!(matches!(err, ValidationError::NonInteger { .. }));
    }

    #[test]
    fn test_parse_row_wrong_length() {
        let err = parse_row("1 2", 3, "available").unwrap_err();
        assert_eq!(err, ValidationError::dimension("available", 3, 2));
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(" 5\n", "num_processes").unwrap(), 5);
        assert!(matches!(
            parse_count("0", "num_processes"),
            Err(ValidationError::EmptyDimension { .. })
        ));
        assert!(matches!(
            parse_count("-2", "num_resources"),
            Err(ValidationError::NegativeValue { value: -2, .. })
        ));
        assert!(matches!(
            parse_count("five", "num_processes"),
            Err(ValidationError::NonInteger { .. })
        ));
    }

    #[test]
    fn test_parse_matrix_missing_row() {
        let err = parse_matrix(["1 0", "0 1"], 3, 2, "maximum").unwrap_err();
        assert_eq!(err, ValidationError::dimension("maximum", 3, 2));
    }

    #[test]
    fn test_from_text() {
        let state = ResourceState::from_text("1", "1", &["0"], &["5"], "5").unwrap();
        assert_eq!(state.need(0), &[5]);
    }
}

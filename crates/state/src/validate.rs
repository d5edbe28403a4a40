//! Snapshot validation rules
//!
//! Checks run in a fixed order so the first reported failure is stable:
//! dimensions, then negative entries, then infeasible claims. Within each
//! check entries are visited row-major, allocation before maximum before
//! available.

use bankers_errors::ValidationError;

/// Reject a zero process or resource count
pub(crate) fn ensure_non_empty(count: usize, field: &str) -> Result<(), ValidationError> {
    if count == 0 {
        return Err(ValidationError::EmptyDimension {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Check that a matrix is exactly `rows × cols`
pub(crate) fn ensure_shape(
    matrix: &[Vec<i64>],
    rows: usize,
    cols: usize,
    field: &str,
) -> Result<(), ValidationError> {
    if matrix.len() != rows {
        return Err(ValidationError::dimension(field, rows, matrix.len()));
    }
    for (i, row) in matrix.iter().enumerate() {
        if row.len() != cols {
            return Err(ValidationError::dimension(
                format!("{field}[{i}]"),
                cols,
                row.len(),
            ));
        }
    }
    Ok(())
}

/// Check that a vector has exactly `len` entries
pub(crate) fn ensure_len(values: &[i64], len: usize, field: &str) -> Result<(), ValidationError> {
    if values.len() != len {
        return Err(ValidationError::dimension(field, len, values.len()));
    }
    Ok(())
}

/// Reject the first negative entry of a row or vector.
///
/// # Errors
///
/// Returns `ValidationError::NegativeValue` naming `field[j]` for the first
/// negative entry.
pub fn ensure_non_negative(values: &[i64], field: &str) -> Result<(), ValidationError> {
    match values.iter().position(|&v| v < 0) {
        Some(j) => Err(ValidationError::NegativeValue {
            field: format!("{field}[{j}]"),
            value: values[j],
        }),
        None => Ok(()),
    }
}

pub(crate) fn ensure_matrix_non_negative(
    matrix: &[Vec<i64>],
    field: &str,
) -> Result<(), ValidationError> {
    for (i, row) in matrix.iter().enumerate() {
        ensure_non_negative(row, &format!("{field}[{i}]"))?;
    }
    Ok(())
}

/// Every process must hold no more than it declares it will ever need
pub(crate) fn ensure_feasible_claims(
    allocation: &[Vec<i64>],
    maximum: &[Vec<i64>],
) -> Result<(), ValidationError> {
    for (process, (held, declared)) in allocation.iter().zip(maximum).enumerate() {
        for (resource, (&allocated, &max)) in held.iter().zip(declared).enumerate() {
            if max < allocated {
                return Err(ValidationError::InfeasibleClaim {
                    process,
                    resource,
                    allocated,
                    maximum: max,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_reports_row_count_first() {
        let err = ensure_shape(&[vec![1, 2]], 2, 3, "allocation").unwrap_err();
        assert_eq!(err, ValidationError::dimension("allocation", 2, 1));
    }

    #[test]
    fn test_shape_reports_short_row() {
        let err = ensure_shape(&[vec![1, 2, 3], vec![4]], 2, 3, "maximum").unwrap_err();
        assert_eq!(err, ValidationError::dimension("maximum[1]", 3, 1));
    }

    #[test]
    fn test_first_negative_wins() {
        let err = ensure_matrix_non_negative(&[vec![0, 1], vec![-2, -3]], "allocation")
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::NegativeValue {
                field: "allocation[1][0]".into(),
                value: -2,
            }
        );
    }

    #[test]
    fn test_equal_allocation_and_maximum_is_feasible() {
        assert!(ensure_feasible_claims(&[vec![2, 2]], &[vec![2, 2]]).is_ok());
    }
}

//! Shape and finiteness validation for covariance input.
//!
//! Validation is fail-fast: the first violated constraint produces a
//! descriptive `EngineError::Validation` and no arithmetic runs.

use crate::error::EngineError;

/// Validates and normalizes a symbol list: non-empty, each entry a
/// non-empty string, uppercased, unique after uppercasing.
///
/// # Errors
/// Returns `EngineError::Validation` describing the first violation.
pub fn validate_symbols(symbols: &[String]) -> Result<Vec<String>, EngineError> {
    if symbols.is_empty() {
        return Err(EngineError::validation("symbols must be a non-empty list"));
    }
    let mut upper = Vec::with_capacity(symbols.len());
    for (i, symbol) in symbols.iter().enumerate() {
        let trimmed = symbol.trim();
        if trimmed.is_empty() {
            return Err(EngineError::validation(format!(
                "symbols[{i}] is empty"
            )));
        }
        upper.push(trimmed.to_uppercase());
    }
    for (i, symbol) in upper.iter().enumerate() {
        if upper[..i].contains(symbol) {
            return Err(EngineError::validation(format!(
                "duplicate symbol {symbol}"
            )));
        }
    }
    Ok(upper)
}

/// Validates that `matrix` is square, sized to `n` symbols, with every cell
/// finite.
///
/// # Errors
/// Returns `EngineError::Validation` describing the first violation.
pub fn validate_matrix(n: usize, matrix: &[Vec<f64>]) -> Result<(), EngineError> {
    if matrix.len() != n {
        return Err(EngineError::validation(format!(
            "matrix has {} rows but there are {} symbols",
            matrix.len(),
            n
        )));
    }
    for (i, row) in matrix.iter().enumerate() {
        if row.len() != n {
            return Err(EngineError::validation(format!(
                "matrix row {i} has {} columns, expected {n}",
                row.len()
            )));
        }
        for (j, cell) in row.iter().enumerate() {
            if !cell.is_finite() {
                return Err(EngineError::validation(format!(
                    "matrix[{i}][{j}] is not a finite number"
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn symbols_are_uppercased_and_trimmed() {
        let result = validate_symbols(&symbols(&["aapl", " msft "])).unwrap();
        assert_eq!(result, vec!["AAPL".to_string(), "MSFT".to_string()]);
    }

    #[test]
    fn empty_symbol_list_is_rejected() {
        assert!(validate_symbols(&[]).is_err());
    }

    #[test]
    fn blank_symbol_is_rejected() {
        assert!(validate_symbols(&symbols(&["AAPL", "  "])).is_err());
    }

    #[test]
    fn duplicate_symbols_after_uppercasing_are_rejected() {
        let err = validate_symbols(&symbols(&["aapl", "AAPL"])).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn square_finite_matrix_passes() {
        let matrix = vec![vec![0.04, 0.01], vec![0.01, 0.09]];
        assert!(validate_matrix(2, &matrix).is_ok());
    }

    #[test]
    fn row_count_mismatch_is_rejected() {
        let matrix = vec![vec![0.04, 0.01]];
        let err = validate_matrix(2, &matrix).unwrap_err();
        assert!(err.to_string().contains("rows"));
    }

    #[test]
    fn ragged_row_is_rejected() {
        let matrix = vec![vec![0.04, 0.01], vec![0.01]];
        let err = validate_matrix(2, &matrix).unwrap_err();
        assert!(err.to_string().contains("columns"));
    }

    #[test]
    fn non_finite_cell_is_rejected() {
        let matrix = vec![vec![0.04, f64::NAN], vec![0.01, 0.09]];
        assert!(validate_matrix(2, &matrix).is_err());

        let matrix = vec![vec![0.04, 0.01], vec![f64::INFINITY, 0.09]];
        assert!(validate_matrix(2, &matrix).is_err());
    }
}

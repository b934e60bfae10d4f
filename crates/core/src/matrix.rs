//! Dense matrix inversion and the small amount of linear algebra the
//! allocation strategies need.
//!
//! Inversion is Gauss-Jordan elimination with partial pivoting over an
//! augmented `[A | I]` matrix, with ridge (Tikhonov) regularization applied
//! to the diagonal first. Covariance matrices estimated from correlated
//! assets are routinely near-singular; the ridge keeps them invertible
//! without meaningfully changing well-conditioned inputs.

use crate::error::EngineError;

/// Ridge added to the diagonal before inversion unless overridden.
pub const DEFAULT_RIDGE: f64 = 1e-8;

/// Pivots with absolute value below this are treated as zero.
const PIVOT_EPSILON: f64 = 1e-15;

/// Inverts an n×n matrix via Gauss-Jordan elimination with partial pivoting.
///
/// A copy of `a` gets `ridge` added to every diagonal entry before
/// elimination. Rows are swapped so each pivot is the largest remaining
/// absolute value in its column.
///
/// The caller is expected to have validated that `a` is square with finite
/// entries; this function only guards against unusable pivots.
///
/// # Errors
/// Returns `EngineError::SingularMatrix` if the best available pivot in any
/// column is below `1e-15` in absolute value.
pub fn invert(a: &[Vec<f64>], ridge: f64) -> Result<Vec<Vec<f64>>, EngineError> {
    let n = a.len();
    if n == 0 {
        return Ok(Vec::new());
    }

    // Augmented [A + ridge*I | I], n rows by 2n columns.
    let mut aug: Vec<Vec<f64>> = Vec::with_capacity(n);
    for (i, row) in a.iter().enumerate() {
        let mut r = vec![0.0; 2 * n];
        r[..n].copy_from_slice(row);
        r[i] += ridge;
        r[n + i] = 1.0;
        aug.push(r);
    }

    for col in 0..n {
        // Partial pivoting: bring the largest remaining entry into position.
        let mut pivot_row = col;
        let mut pivot_abs = aug[col][col].abs();
        for row in (col + 1)..n {
            let candidate = aug[row][col].abs();
            if candidate > pivot_abs {
                pivot_row = row;
                pivot_abs = candidate;
            }
        }
        if pivot_abs < PIVOT_EPSILON {
            return Err(EngineError::SingularMatrix);
        }
        aug.swap(col, pivot_row);

        // Normalize the pivot row so the pivot becomes 1.
        let pivot = aug[col][col];
        for value in &mut aug[col] {
            *value /= pivot;
        }

        // Eliminate the pivot column from every other row.
        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = aug[row][col];
            if factor == 0.0 {
                continue;
            }
            for k in 0..(2 * n) {
                aug[row][k] -= factor * aug[col][k];
            }
        }
    }

    // The right half now holds the inverse.
    Ok(aug.into_iter().map(|row| row[n..].to_vec()).collect())
}

/// Matrix-vector product `A·x`.
#[must_use]
pub fn mat_vec(a: &[Vec<f64>], x: &[f64]) -> Vec<f64> {
    a.iter().map(|row| dot(row, x)).collect()
}

/// Dot product of two equal-length slices.
#[must_use]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Quadratic form `wᵀ·A·w`, the portfolio variance when `A` is a covariance
/// matrix and `w` a weight vector.
#[must_use]
pub fn quadratic_form(a: &[Vec<f64>], w: &[f64]) -> f64 {
    dot(w, &mat_vec(a, w))
}

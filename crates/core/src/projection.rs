//! Projection of raw strategy output onto the weight simplex: non-negative
//! entries summing to one.
//!
//! Degenerate inputs (all-negative, all-zero, non-finite sums) fall back to
//! the uniform allocation rather than erroring; a portfolio with no usable
//! signal still has to hold something.

/// Uniform `1/n` allocation.
#[must_use]
pub fn uniform(n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    vec![1.0 / n as f64; n]
}

/// Clips negative entries to zero and normalizes the rest to sum to one.
///
/// If nothing positive survives the clip, returns the uniform allocation.
/// Idempotent on an already non-negative normalized vector.
#[must_use]
pub fn project_non_negative(w: &[f64]) -> Vec<f64> {
    let clipped: Vec<f64> = w.iter().map(|x| x.max(0.0)).collect();
    let sum: f64 = clipped.iter().sum();
    if !(sum > 0.0) {
        return uniform(w.len());
    }
    clipped.into_iter().map(|x| x / sum).collect()
}

/// Divides every entry by the sum so the vector sums to one.
///
/// Returns the uniform allocation when the sum is non-finite or within
/// `1e-12` of zero. Idempotent on an already normalized vector.
#[must_use]
pub fn normalize_to_one(w: &[f64]) -> Vec<f64> {
    let sum: f64 = w.iter().sum();
    if !sum.is_finite() || sum.abs() < 1e-12 {
        return uniform(w.len());
    }
    w.iter().map(|x| x / sum).collect()
}

//! Allocation strategies: Kelly, Markowitz mean-variance, and
//! inverse-variance risk parity.
//!
//! Each strategy takes expected returns `mu` and a covariance matrix whose
//! square/finite invariants were checked upstream, and returns weights on
//! the simplex (non-negative, summing to one).

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::matrix;
use crate::projection;

/// Floor for the Markowitz risk-aversion divisor.
pub const MIN_RISK_AVERSION: f64 = 1e-8;

/// Floor for per-asset variances in risk parity.
const MIN_VARIANCE: f64 = 1e-12;

/// Allocation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    /// Growth-optimal `Σ⁻¹·μ`, projected onto the simplex.
    Kelly,
    /// Mean-variance with a risk-aversion divisor.
    Markowitz,
    /// Inverse-variance approximation to risk parity. Ignores `μ`.
    RiskParity,
}

impl Default for Method {
    fn default() -> Self {
        Self::Markowitz
    }
}

impl Method {
    /// Parses a method name, case-insensitively.
    ///
    /// Anything that is not `kelly` or `risk-parity`/`risk_parity` resolves
    /// to Markowitz. The permissive fall-through is intentional: unknown
    /// names get the default strategy rather than an error.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "kelly" => Self::Kelly,
            "risk-parity" | "risk_parity" => Self::RiskParity,
            other => {
                if !other.is_empty() && other != "markowitz" {
                    tracing::debug!("Unknown allocation method '{other}', using markowitz");
                }
                Self::Markowitz
            }
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kelly => "kelly",
            Self::Markowitz => "markowitz",
            Self::RiskParity => "risk-parity",
        }
    }
}

/// Computes allocation weights for `method`.
///
/// `risk_aversion` only affects Markowitz and is floored at `1e-8` before
/// dividing. `ridge` is the diagonal regularization passed to the inverter.
///
/// # Errors
/// Returns `EngineError::SingularMatrix` if the covariance matrix cannot be
/// inverted even after ridge regularization.
pub fn allocate(
    method: Method,
    mu: &[f64],
    cov: &[Vec<f64>],
    risk_aversion: f64,
    ridge: f64,
) -> Result<Vec<f64>, EngineError> {
    match method {
        Method::Kelly => {
            let raw = matrix::mat_vec(&matrix::invert(cov, ridge)?, mu);
            Ok(projection::project_non_negative(&raw))
        }
        Method::Markowitz => {
            let gamma = risk_aversion.max(MIN_RISK_AVERSION);
            let scaled: Vec<f64> = mu.iter().map(|m| m / gamma).collect();
            let raw = matrix::mat_vec(&matrix::invert(cov, ridge)?, &scaled);
            let non_neg = projection::project_non_negative(&raw);
            // Re-normalize in case clipping moved the sum off one.
            Ok(projection::normalize_to_one(&non_neg))
        }
        Method::RiskParity => {
            let inverse_variances: Vec<f64> = cov
                .iter()
                .enumerate()
                .map(|(i, row)| 1.0 / row[i].max(MIN_VARIANCE))
                .collect();
            Ok(projection::normalize_to_one(&inverse_variances))
        }
    }
}

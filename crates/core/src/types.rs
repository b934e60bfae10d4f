//! Domain types shared between the store, service, and REST surface.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::limits::RiskLimits;

/// The single stored covariance matrix.
///
/// Invariants (enforced at upload/validation time): `matrix` is square with
/// `matrix.len() == symbols.len()`, every cell finite, symbols uppercase,
/// non-empty, and unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CovarianceMatrix {
    /// Opaque id generated on upload.
    pub id: String,
    /// Ordered asset tickers, uppercase.
    pub symbols: Vec<String>,
    /// n×n covariance values.
    pub matrix: Vec<Vec<f64>>,
    pub uploaded_at: DateTime<Utc>,
}

impl CovarianceMatrix {
    /// Number of assets.
    #[must_use]
    pub fn size(&self) -> usize {
        self.symbols.len()
    }
}

/// Expected returns as supplied by the caller.
///
/// The wire format is duck-typed (array, map, or absent); this variant pins
/// the three cases down and `resolve` collapses them into one positional
/// vector before any strategy runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpectedReturns {
    /// Positionally aligned with `symbols`; must have exactly n entries.
    PerSymbol(Vec<f64>),
    /// Keyed by symbol; missing symbols default to 0.
    BySymbol(HashMap<String, f64>),
    /// Absent: every asset defaults to a flat 0.01.
    #[default]
    Flat,
}

/// Default expected return per asset when none were supplied.
pub const DEFAULT_EXPECTED_RETURN: f64 = 0.01;

impl ExpectedReturns {
    /// Resolves to a vector of `symbols.len()` finite returns.
    ///
    /// Symbol lookups are case-insensitive against the uppercased symbol
    /// list.
    ///
    /// # Errors
    /// Returns `EngineError::Validation` if a positional array has the
    /// wrong length, map keys collide after uppercasing, or any supplied
    /// value is non-finite.
    pub fn resolve(&self, symbols: &[String]) -> Result<Vec<f64>, EngineError> {
        let resolved = match self {
            Self::PerSymbol(values) => {
                if values.len() != symbols.len() {
                    return Err(EngineError::validation(format!(
                        "expectedReturns has {} entries but there are {} symbols",
                        values.len(),
                        symbols.len()
                    )));
                }
                values.clone()
            }
            Self::BySymbol(map) => {
                let mut upper: HashMap<String, f64> = HashMap::with_capacity(map.len());
                for (key, value) in map {
                    if upper.insert(key.to_uppercase(), *value).is_some() {
                        return Err(EngineError::validation(format!(
                            "duplicate expectedReturns key {}",
                            key.to_uppercase()
                        )));
                    }
                }
                symbols
                    .iter()
                    .map(|s| upper.get(s).copied().unwrap_or(0.0))
                    .collect()
            }
            Self::Flat => vec![DEFAULT_EXPECTED_RETURN; symbols.len()],
        };
        if let Some(bad) = resolved.iter().find(|v| !v.is_finite()) {
            return Err(EngineError::validation(format!(
                "expectedReturns contains non-finite value {bad}"
            )));
        }
        Ok(resolved)
    }
}

/// An optimization request, either referencing the stored covariance by id
/// or carrying symbols and matrix inline.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimizationRequest {
    /// Allocation method name; unknown or absent names run Markowitz.
    pub method: Option<String>,
    pub expected_returns: ExpectedReturns,
    pub covariance_id: Option<String>,
    pub symbols: Option<Vec<String>>,
    pub matrix: Option<Vec<Vec<f64>>>,
    /// Markowitz risk aversion; defaults to 1.
    pub risk_aversion: Option<f64>,
    pub risk_limits: Option<RiskLimits>,
}

/// One `(symbol, weight)` pair of the final allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Allocation {
    pub symbol: String,
    pub weight: f64,
}

/// Summary statistics of the final allocation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationStats {
    /// `Σ wᵢ·μᵢ`
    pub expected_return: f64,
    /// `wᵀ·Σ·w`
    pub variance: f64,
}

/// Result of a successful optimization run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub method: crate::strategy::Method,
    pub risk_aversion: f64,
    pub symbols: Vec<String>,
    pub allocations: Vec<Allocation>,
    pub stats: AllocationStats,
}

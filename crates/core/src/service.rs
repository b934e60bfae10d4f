//! Optimization service: validates a request, resolves its covariance
//! matrix (inline or from the store), dispatches to the selected strategy,
//! applies risk limits, and computes summary statistics.
//!
//! The store is constructor-injected so tests and multiple instances stay
//! isolated; the service has no other state and no side effects beyond
//! reading the store.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::limits;
use crate::matrix;
use crate::store::CovarianceStore;
use crate::strategy::{self, Method};
use crate::types::{Allocation, AllocationStats, OptimizationRequest, OptimizationResult};
use crate::validate;

pub struct OptimizationService {
    store: Arc<CovarianceStore>,
    config: EngineConfig,
}

impl OptimizationService {
    #[must_use]
    pub fn new(store: Arc<CovarianceStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// Runs one optimization. Fail-fast: the first violated constraint is
    /// returned and nothing past it executes.
    ///
    /// # Errors
    /// - `EngineError::NotFound` when `covariance_id` matches nothing.
    /// - `EngineError::Validation` for shape/finiteness violations.
    /// - `EngineError::SingularMatrix` when inversion fails even after
    ///   ridge regularization.
    pub async fn optimize(
        &self,
        request: OptimizationRequest,
    ) -> Result<OptimizationResult, EngineError> {
        let (symbols, cov) = self.resolve_covariance(&request).await?;
        let mu = request.expected_returns.resolve(&symbols)?;

        let method = Method::parse(request.method.as_deref().unwrap_or_default());
        let risk_aversion = request.risk_aversion.unwrap_or(1.0);

        let weights = strategy::allocate(method, &mu, &cov, risk_aversion, self.config.ridge)?;
        let weights = limits::apply_limits(
            &weights,
            request.risk_limits.and_then(|l| l.max_weight),
        );

        let stats = AllocationStats {
            expected_return: matrix::dot(&weights, &mu),
            variance: matrix::quadratic_form(&cov, &weights),
        };
        tracing::debug!(
            method = method.as_str(),
            assets = symbols.len(),
            expected_return = stats.expected_return,
            variance = stats.variance,
            "Computed allocation"
        );

        let allocations = symbols
            .iter()
            .zip(weights.iter())
            .map(|(symbol, weight)| Allocation {
                symbol: symbol.clone(),
                weight: *weight,
            })
            .collect();

        Ok(OptimizationResult {
            method,
            risk_aversion,
            symbols,
            allocations,
            stats,
        })
    }

    /// Resolves the covariance input: a store lookup when `covariance_id`
    /// is present, otherwise inline `symbols` + `matrix` (validated here;
    /// stored matrices were validated at upload).
    async fn resolve_covariance(
        &self,
        request: &OptimizationRequest,
    ) -> Result<(Vec<String>, Vec<Vec<f64>>), EngineError> {
        if let Some(id) = &request.covariance_id {
            let stored = self
                .store
                .get(id)
                .await
                .ok_or_else(|| EngineError::NotFound(id.clone()))?;
            return Ok((stored.symbols, stored.matrix));
        }

        match (&request.symbols, &request.matrix) {
            (Some(symbols), Some(cov)) => {
                let symbols = validate::validate_symbols(symbols)?;
                validate::validate_matrix(symbols.len(), cov)?;
                Ok((symbols, cov.clone()))
            }
            _ => Err(EngineError::validation(
                "either covarianceId or both symbols and matrix must be provided",
            )),
        }
    }
}

use axum::{extract::State, http::StatusCode, Json};
use portfolio_engine_core::{
    CovarianceStore, EngineConfig, EngineError, OptimizationRequest, OptimizationResult,
    OptimizationService,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared state injected into every handler: the covariance store and the
/// optimization service built around it.
pub struct ApiContext {
    pub store: Arc<CovarianceStore>,
    pub service: OptimizationService,
    max_assets: usize,
}

impl ApiContext {
    #[must_use]
    pub fn new(engine: EngineConfig) -> Self {
        let store = Arc::new(CovarianceStore::new());
        let service = OptimizationService::new(Arc::clone(&store), engine);
        Self {
            store,
            service,
            max_assets: engine.max_assets,
        }
    }
}

#[derive(Deserialize)]
pub struct UploadRequest {
    pub symbols: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    pub id: String,
    pub symbols: Vec<String>,
    pub size: usize,
}

#[derive(Debug, Serialize)]
pub struct OptimizeResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub result: OptimizationResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CovarianceInfo {
    pub id: String,
    pub symbols: Vec<String>,
    pub size: usize,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(err: EngineError) -> ApiError {
    let (status, message) = match &err {
        EngineError::Validation(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        EngineError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        // Generic message only: no internal matrix state leaves the engine.
        EngineError::SingularMatrix => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "Optimization failed".to_string(),
        ),
    };
    (
        status,
        Json(ErrorResponse {
            status: "error",
            message,
        }),
    )
}

fn check_asset_bound(n: usize, max_assets: usize) -> Result<(), ApiError> {
    if n > max_assets {
        return Err(error_response(EngineError::Validation(format!(
            "request has {n} assets, limit is {max_assets}"
        ))));
    }
    Ok(())
}

/// Uploads a covariance matrix, replacing the stored one.
///
/// # Errors
/// Returns 400 with a descriptive message when the symbols or matrix
/// violate the shape/finiteness invariants or exceed the asset bound.
pub async fn upload_covariance(
    State(ctx): State<Arc<ApiContext>>,
    Json(req): Json<UploadRequest>,
) -> Result<Json<UploadResponse>, ApiError> {
    check_asset_bound(req.symbols.len().max(req.matrix.len()), ctx.max_assets)?;

    let stored = ctx
        .store
        .upload(req.symbols, req.matrix)
        .await
        .map_err(error_response)?;

    Ok(Json(UploadResponse {
        status: "success",
        id: stored.id.clone(),
        size: stored.size(),
        symbols: stored.symbols,
    }))
}

/// Runs an optimization against an inline or stored covariance matrix.
///
/// # Errors
/// Returns 404 for an unknown `covarianceId`, 400 for validation failures,
/// and 422 when the matrix is singular even after ridge regularization.
pub async fn run_optimization(
    State(ctx): State<Arc<ApiContext>>,
    Json(req): Json<OptimizationRequest>,
) -> Result<Json<OptimizeResponse>, ApiError> {
    let inline_size = req
        .symbols
        .as_ref()
        .map_or(0, Vec::len)
        .max(req.matrix.as_ref().map_or(0, Vec::len));
    check_asset_bound(inline_size, ctx.max_assets)?;

    let result = ctx.service.optimize(req).await.map_err(error_response)?;

    Ok(Json(OptimizeResponse {
        status: "success",
        result,
    }))
}

/// Returns metadata of the currently stored covariance matrix.
///
/// # Errors
/// Returns 404 when nothing has been uploaded yet.
pub async fn get_covariance(
    State(ctx): State<Arc<ApiContext>>,
) -> Result<Json<CovarianceInfo>, ApiError> {
    let stored = ctx
        .store
        .latest()
        .await
        .ok_or_else(|| error_response(EngineError::NotFound("no covariance uploaded".into())))?;

    Ok(Json(CovarianceInfo {
        id: stored.id.clone(),
        size: stored.size(),
        uploaded_at: stored.uploaded_at,
        symbols: stored.symbols,
    }))
}

/// Liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use portfolio_engine_core::ExpectedReturns;

    fn ctx() -> Arc<ApiContext> {
        Arc::new(ApiContext::new(EngineConfig::default()))
    }

    fn symbols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    fn sample_matrix() -> Vec<Vec<f64>> {
        vec![vec![0.04, 0.01], vec![0.01, 0.09]]
    }

    async fn upload_sample(ctx: &Arc<ApiContext>) -> UploadResponse {
        let response = upload_covariance(
            State(Arc::clone(ctx)),
            Json(UploadRequest {
                symbols: symbols(&["aapl", "msft"]),
                matrix: sample_matrix(),
            }),
        )
        .await
        .unwrap();
        response.0
    }

    // ============================================
    // Upload Handler Tests
    // ============================================

    #[tokio::test]
    async fn upload_returns_id_and_uppercased_symbols() {
        let ctx = ctx();
        let response = upload_sample(&ctx).await;
        assert_eq!(response.status, "success");
        assert_eq!(response.symbols, vec!["AAPL", "MSFT"]);
        assert_eq!(response.size, 2);
        assert!(!response.id.is_empty());
    }

    #[tokio::test]
    async fn upload_rejects_non_square_matrix() {
        let ctx = ctx();
        let err = upload_covariance(
            State(ctx),
            Json(UploadRequest {
                symbols: symbols(&["AAPL", "MSFT"]),
                matrix: vec![vec![0.04, 0.01]],
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn upload_rejects_oversized_matrix() {
        let ctx = Arc::new(ApiContext::new(EngineConfig {
            max_assets: 2,
            ..EngineConfig::default()
        }));
        let names: Vec<String> = (0..3).map(|i| format!("S{i}")).collect();
        let err = upload_covariance(
            State(ctx),
            Json(UploadRequest {
                symbols: names,
                matrix: vec![vec![0.0; 3]; 3],
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
        assert!(err.1 .0.message.contains("limit"));
    }

    // ============================================
    // Optimize Handler Tests
    // ============================================

    #[tokio::test]
    async fn optimize_by_stored_id() {
        let ctx = ctx();
        let uploaded = upload_sample(&ctx).await;
        let response = run_optimization(
            State(Arc::clone(&ctx)),
            Json(OptimizationRequest {
                covariance_id: Some(uploaded.id),
                expected_returns: ExpectedReturns::PerSymbol(vec![0.08, 0.05]),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.0.status, "success");
        let sum: f64 = response
            .0
            .result
            .allocations
            .iter()
            .map(|a| a.weight)
            .sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn optimize_unknown_id_is_404() {
        let err = run_optimization(
            State(ctx()),
            Json(OptimizationRequest {
                covariance_id: Some("missing".to_string()),
                ..Default::default()
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn optimize_without_covariance_is_400() {
        let err = run_optimization(State(ctx()), Json(OptimizationRequest::default()))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn optimize_response_wire_shape_is_camel_case() {
        let ctx = ctx();
        let response = run_optimization(
            State(ctx),
            Json(OptimizationRequest {
                method: Some("risk-parity".to_string()),
                symbols: Some(symbols(&["AAPL", "MSFT"])),
                matrix: Some(sample_matrix()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        let json = serde_json::to_value(&response.0).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["method"], "risk-parity");
        assert_eq!(json["riskAversion"], 1.0);
        assert_eq!(json["allocations"][0]["symbol"], "AAPL");
        assert!(json["stats"]["expectedReturn"].is_number());
        assert!(json["stats"]["variance"].is_number());
    }

    // ============================================
    // Covariance Info & Health Tests
    // ============================================

    #[tokio::test]
    async fn get_covariance_before_upload_is_404() {
        let err = get_covariance(State(ctx())).await.unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn get_covariance_returns_latest_metadata() {
        let ctx = ctx();
        let uploaded = upload_sample(&ctx).await;
        let info = get_covariance(State(ctx)).await.unwrap();
        assert_eq!(info.0.id, uploaded.id);
        assert_eq!(info.0.size, 2);
    }

    #[tokio::test]
    async fn health_is_ok() {
        let response = health().await;
        assert_eq!(response.0.status, "ok");
    }
}

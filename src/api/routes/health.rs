//! Health Routes
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (chain connection can be made)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::error::ApiResult;
use crate::api::state::AppState;

/// GET /health/live
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Opens the chain connection if it is not open yet. A node that cannot be
/// reached answers 503.
pub async fn readiness(State(state): State<Arc<AppState>>) -> ApiResult<StatusCode> {
    state.provider.get().await?;
    Ok(StatusCode::OK)
}

/// GET /health
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (chain, chain_id, node) = match state.provider.get().await {
        Ok(client) => (
            "ok",
            Some(client.chain_id().to_string()),
            Some(client.moniker().to_string()),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Chain unreachable during health check");
            ("unreachable", None, None)
        }
    };

    let status = if chain_id.is_some() { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        chain: chain.to_string(),
        chain_id,
        node,
        contract: state.contract.to_string(),
        connect_attempts: state.provider.connect_attempts(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let status = liveness().await;
        assert_eq!(status, StatusCode::OK);
    }
}

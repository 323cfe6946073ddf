//! HTTP Server
//!
//! Axum router serving the server-rendered pages.
//!
//! # Endpoints
//!
//! ## Pages
//! - `GET /` - Items, proposals and governance parameters
//! - `GET /proposal/:id` - One proposal with its votes
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! Any other path renders the not-found page.

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .route("/", get(routes::pages::list_page))
        .route("/proposal/:id", get(routes::pages::proposal_page))
        .nest("/health", health_routes)
        .fallback(routes::pages::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the server and run until a shutdown signal arrives
pub async fn serve(state: AppState) -> Result<(), ApiError> {
    let addr = state.config.addr();
    let contract = state.contract.clone();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(%contract, "item-dao listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("item-dao shut down gracefully");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::testing::CountingConnector;
    use crate::chain::{ClientProvider, ContractAddress, DaoQueries};
    use crate::model::Item;
    use crate::pages::testing::{detail, summary, MockQueries};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tower::util::ServiceExt;

    const CONTRACT: &str = "juno1eu70kcgh0d2rlm0n88dgtry9wpqnerf5n2fdzt5sxm6d3vrqq3xqa5e9x8";

    fn create_test_app(queries: Arc<dyn DaoQueries>, connector: CountingConnector) -> Router {
        let provider = Arc::new(ClientProvider::new(connector));
        let contract = ContractAddress::parse(CONTRACT).unwrap();
        let config = ApiConfig {
            render_deadline: Duration::from_millis(200),
            ..ApiConfig::default()
        };

        build_router(AppState::new(queries, provider, contract, config))
    }

    fn default_app(queries: MockQueries) -> Router {
        create_test_app(
            queries.shared(),
            CountingConnector::new(Arc::new(AtomicUsize::new(0))),
        )
    }

    async fn fetch(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_list_page() {
        let queries = MockQueries::new()
            .items(vec![Item {
                name: "a".to_string(),
                contents: "b".to_string(),
            }])
            .proposals(vec![]);

        let response = fetch(default_app(queries), "/").await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert_eq!(html.matches("class=\"item-card\"").count(), 1);
        assert_eq!(html.matches("class=\"proposal-card\"").count(), 0);
        assert!(!html.contains("class=\"loading\""));
    }

    #[tokio::test]
    async fn test_list_page_links_proposals() {
        let queries = MockQueries::new().proposals(vec![
            summary(0, "First", "Passed"),
            summary(1, "Second", "Failed"),
        ]);

        let html = body_text(fetch(default_app(queries), "/").await).await;
        assert!(html.contains("href=\"/proposal/0\""));
        assert!(html.contains("href=\"/proposal/1\""));
        assert!(html.contains("👍"));
        assert!(html.contains("👎"));
    }

    #[tokio::test]
    async fn test_list_page_renders_failure() {
        let queries = MockQueries::new().fail_items("connection refused");

        let response = fetch(default_app(queries), "/").await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("class=\"error\""));
        assert!(html.contains("Connection error: connection refused"));
    }

    #[tokio::test]
    async fn test_slow_section_renders_loading_with_refresh() {
        let (queries, _release) = MockQueries::new().hold_items();

        let html = body_text(fetch(default_app(queries), "/").await).await;
        assert!(html.contains("class=\"loading\""));
        assert!(html.contains("http-equiv=\"refresh\""));
    }

    #[tokio::test]
    async fn test_proposal_page() {
        let queries = MockQueries::new().detail(
            2,
            detail(2, "T", "B", "Pending", serde_json::json!({"type": "x"})),
        );

        let response = fetch(default_app(queries), "/proposal/2").await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("class=\"proposal-title\""));
        assert!(html.contains("🤷"));
        assert!(
            html.contains(r#"{"type":"x"}"#)
                || html.contains("{&quot;type&quot;:&quot;x&quot;}")
        );
    }

    #[tokio::test]
    async fn test_proposal_page_invalid_id() {
        let queries = MockQueries::new().shared();
        let app = create_test_app(
            queries.clone(),
            CountingConnector::new(Arc::new(AtomicUsize::new(0))),
        );

        let html = body_text(fetch(app, "/proposal/abc").await).await;
        assert!(html.contains("class=\"error\""));
        assert!(html.contains("invalid proposal id"));
        assert!(queries.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let response = fetch(default_app(MockQueries::new()), "/nope").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Nothing here"));
    }

    #[tokio::test]
    async fn test_health_live() {
        let response = fetch(default_app(MockQueries::new()), "/health/live").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = create_test_app(
            MockQueries::new().shared(),
            CountingConnector::new(Arc::clone(&calls)),
        );

        let response = fetch(app, "/health/ready").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_health_ready_unreachable_chain() {
        let mut connector = CountingConnector::new(Arc::new(AtomicUsize::new(0)));
        connector.fail = true;
        let app = create_test_app(MockQueries::new().shared(), connector);

        let response = fetch(app, "/health/ready").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
        assert!(body["request_id"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_health_full() {
        let response = fetch(default_app(MockQueries::new()), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["chain_id"], "testing-1");
        assert_eq!(body["node"], "test-node");
        assert_eq!(body["contract"], CONTRACT);
    }
}

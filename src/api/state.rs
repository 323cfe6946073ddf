//! Application State
//!
//! Shared state accessible by all handlers. Page controllers are mounted
//! per request from the injected query layer; nothing page-specific lives
//! here.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::chain::{ClientProvider, ContractAddress, DaoQueries};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Query layer handed to every page controller
    pub queries: Arc<dyn DaoQueries>,
    /// Connection provider behind `queries`, used by the health routes
    pub provider: Arc<ClientProvider>,
    /// Contract the pages read from
    pub contract: ContractAddress,
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        queries: Arc<dyn DaoQueries>,
        provider: Arc<ClientProvider>,
        contract: ContractAddress,
        config: ApiConfig,
    ) -> Self {
        Self {
            queries,
            provider,
            contract,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// How long a page render waits for its sections to settle
    pub render_deadline: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8083,
            render_deadline: Duration::from_millis(1500),
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

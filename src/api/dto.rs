//! Response types for the JSON endpoints

use serde::Serialize;

/// Body of `GET /health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy or degraded
    pub status: String,
    /// Chain connection: ok or unreachable
    pub chain: String,
    /// Chain id reported by the node, once connected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,
    /// Moniker of the connected node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    pub contract: String,
    pub connect_attempts: u64,
    pub uptime_seconds: u64,
    pub version: String,
}

//! Tendermint JSON-RPC Transport
//!
//! Thin reqwest wrapper over the two RPC methods the front-end needs:
//! `status` (used to establish a connection) and `abci_query` (used for
//! every smart query).

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::error::{ChainError, ChainResult};

/// JSON-RPC client for a single node
#[derive(Debug)]
pub struct RpcClient {
    client: Client,
    endpoint: String,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Create a client for the given endpoint URL
    pub fn new(endpoint: &str, request_timeout: Duration) -> ChainResult<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ChainError::Connection(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `status` - node identity and sync info
    pub async fn status(&self) -> ChainResult<StatusResult> {
        self.call("status", serde_json::json!({})).await
    }

    /// `abci_query` - raw ABCI query against application state
    pub async fn abci_query(&self, path: &str, data: &[u8]) -> ChainResult<AbciQueryResponse> {
        let params = AbciQueryParams {
            path,
            data: hex::encode(data),
            prove: false,
        };
        let result: AbciQueryResult = self.call("abci_query", params).await?;
        Ok(result.response)
    }

    async fn call<P, R>(&self, method: &str, params: P) -> ChainResult<R>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        tracing::trace!(method, id = request.id, "Sending RPC request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(ChainError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ChainError::Connection(format!(
                "RPC endpoint returned HTTP {}: {}",
                status.as_u16(),
                text
            )));
        }

        let body: RpcResponse<R> = response.json().await.map_err(ChainError::from_transport)?;

        if let Some(error) = body.error {
            return Err(ChainError::Query(error.to_string()));
        }

        body.result
            .ok_or_else(|| ChainError::Decode(format!("RPC response to `{}` has no result", method)))
    }
}

// ============================================
// Wire types
// ============================================

#[derive(Debug, Serialize)]
struct RpcRequest<'a, P> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<R> {
    result: Option<R>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<String>,
}

impl std::fmt::Display for RpcErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.data {
            Some(data) if !data.is_empty() => {
                write!(f, "RPC error {}: {} ({})", self.code, self.message, data)
            }
            _ => write!(f, "RPC error {}: {}", self.code, self.message),
        }
    }
}

#[derive(Debug, Serialize)]
struct AbciQueryParams<'a> {
    path: &'a str,
    data: String,
    prove: bool,
}

#[derive(Debug, Deserialize)]
struct AbciQueryResult {
    response: AbciQueryResponse,
}

/// ABCI query response as reported by the node
#[derive(Debug, Clone, Deserialize)]
pub struct AbciQueryResponse {
    /// Zero on success
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub log: String,
    /// Base64-encoded result bytes
    #[serde(default)]
    pub value: Option<String>,
}

/// Result of the `status` method
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResult {
    pub node_info: NodeInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeInfo {
    /// Chain id
    pub network: String,
    #[serde(default)]
    pub moniker: String,
}

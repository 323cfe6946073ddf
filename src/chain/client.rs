//! Chain Query Client
//!
//! A [`ClientProvider`] lazily opens one read-only connection to the RPC
//! node and hands the same handle to every caller afterwards. It is built
//! once at startup and injected wherever queries are made.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use cosmos_sdk_proto::cosmwasm::wasm::v1 as wasm_proto;
use cosmos_sdk_proto::prost::Message;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use super::error::{ChainError, ChainResult};
use super::query::ContractAddress;
use super::rpc::RpcClient;

/// ABCI path of the CosmWasm smart query
pub const SMART_QUERY_PATH: &str = "/cosmwasm.wasm.v1.Query/SmartContractState";

/// A connected, read-only handle to a chain
#[async_trait]
pub trait ContractQuerier: Send + Sync {
    /// Chain id reported by the node when the connection was made
    fn chain_id(&self) -> &str;

    /// Moniker of the node the connection was made to
    fn moniker(&self) -> &str;

    /// Run a smart query and return the contract's raw JSON answer
    async fn query_smart_raw(&self, contract: &ContractAddress, query: &[u8]) -> ChainResult<Vec<u8>>;
}

/// Something that can open a connection to a chain
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> ChainResult<Arc<dyn ContractQuerier>>;
}

/// Connection settings for the RPC node
#[derive(Debug, Clone)]
pub struct ChainClientConfig {
    /// Tendermint RPC endpoint, e.g. "https://rpc.uni.junomint.com:443"
    pub rpc_url: String,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for ChainClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://rpc.uni.junomint.com:443".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Connected Tendermint RPC client
#[derive(Debug)]
pub struct ChainClient {
    rpc: RpcClient,
    chain_id: String,
    moniker: String,
}

impl ChainClient {
    /// Open a connection: verify the node answers `status` and record its chain id
    pub async fn connect(config: &ChainClientConfig) -> ChainResult<Self> {
        let rpc = RpcClient::new(&config.rpc_url, config.request_timeout)?;

        let status = rpc.status().await.map_err(|e| match e {
            ChainError::Connection(msg) => ChainError::Connection(msg),
            other => ChainError::Connection(format!("{} did not answer status: {}", rpc.endpoint(), other)),
        })?;

        tracing::info!(
            endpoint = rpc.endpoint(),
            chain_id = %status.node_info.network,
            moniker = %status.node_info.moniker,
            "Connected to chain"
        );

        Ok(Self {
            rpc,
            chain_id: status.node_info.network,
            moniker: status.node_info.moniker,
        })
    }
}

#[async_trait]
impl ContractQuerier for ChainClient {
    fn chain_id(&self) -> &str {
        &self.chain_id
    }

    fn moniker(&self) -> &str {
        &self.moniker
    }

    async fn query_smart_raw(&self, contract: &ContractAddress, query: &[u8]) -> ChainResult<Vec<u8>> {
        let request = wasm_proto::QuerySmartContractStateRequest {
            address: contract.as_str().to_string(),
            query_data: query.to_vec(),
        };

        let response = self
            .rpc
            .abci_query(SMART_QUERY_PATH, &request.encode_to_vec())
            .await?;

        if response.code != 0 {
            return Err(ChainError::Query(format!(
                "contract {} rejected query (code {}): {}",
                contract, response.code, response.log
            )));
        }

        let value = response
            .value
            .ok_or_else(|| ChainError::Decode("smart query returned no value".to_string()))?;

        decode_smart_response(&value)
    }
}

/// Unwrap the base64 protobuf envelope around a smart query answer
pub(crate) fn decode_smart_response(value: &str) -> ChainResult<Vec<u8>> {
    let bytes = BASE64
        .decode(value)
        .map_err(|e| ChainError::Decode(format!("invalid base64 in query response: {}", e)))?;

    let response = wasm_proto::QuerySmartContractStateResponse::decode(bytes.as_slice())
        .map_err(|e| ChainError::Decode(format!("invalid smart query response: {}", e)))?;

    Ok(response.data)
}

/// Connects over HTTP(S) to a Tendermint RPC node
pub struct HttpConnector {
    config: ChainClientConfig,
}

impl HttpConnector {
    pub fn new(config: ChainClientConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Connector for HttpConnector {
    async fn connect(&self) -> ChainResult<Arc<dyn ContractQuerier>> {
        let client = ChainClient::connect(&self.config).await?;
        Ok(Arc::new(client))
    }
}

/// One connection attempt, awaited by every caller that arrives while it runs
type Attempt = Shared<BoxFuture<'static, ChainResult<Arc<dyn ContractQuerier>>>>;

enum Slot {
    Empty,
    Connecting(Attempt),
    Ready(Arc<dyn ContractQuerier>),
}

/// Connect-once holder for the chain client
///
/// Concurrent callers share a single in-flight connection attempt and all
/// receive its outcome, success or failure. Once a connection exists it is
/// reused for the lifetime of the provider. A failed attempt is not retried;
/// the next call after it starts a fresh attempt.
pub struct ClientProvider {
    connector: Arc<dyn Connector>,
    slot: Mutex<Slot>,
    attempts: AtomicU64,
}

impl ClientProvider {
    pub fn new(connector: impl Connector + 'static) -> Self {
        Self {
            connector: Arc::new(connector),
            slot: Mutex::new(Slot::Empty),
            attempts: AtomicU64::new(0),
        }
    }

    /// Provider for a real RPC node
    pub fn http(config: ChainClientConfig) -> Self {
        Self::new(HttpConnector::new(config))
    }

    /// Get the connection, opening it on first use
    pub async fn get(&self) -> ChainResult<Arc<dyn ContractQuerier>> {
        let attempt = {
            let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
            match &*slot {
                Slot::Ready(client) => return Ok(Arc::clone(client)),
                Slot::Connecting(attempt) => attempt.clone(),
                Slot::Empty => {
                    let attempt = self.start_attempt();
                    *slot = Slot::Connecting(attempt.clone());
                    attempt
                }
            }
        };

        let result = attempt.clone().await;

        // Only the caller that still finds this attempt in the slot records it
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(&*slot, Slot::Connecting(current) if current.ptr_eq(&attempt)) {
            *slot = match &result {
                Ok(client) => Slot::Ready(Arc::clone(client)),
                Err(_) => Slot::Empty,
            };
        }

        result
    }

    fn start_attempt(&self) -> Attempt {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        let connector = Arc::clone(&self.connector);
        tracing::debug!(attempt, "Opening chain connection");

        async move {
            connector.connect().await.map_err(|e| {
                tracing::warn!(attempt, error = %e, "Chain connection failed");
                e
            })
        }
        .boxed()
        .shared()
    }

    /// Whether a connection has been established
    pub fn is_connected(&self) -> bool {
        matches!(
            &*self.slot.lock().unwrap_or_else(PoisonError::into_inner),
            Slot::Ready(_)
        )
    }

    /// Number of connection attempts made so far
    pub fn connect_attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }
}

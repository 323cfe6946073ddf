//! Chain Access
//!
//! Read-only access to the item-dao contract over Tendermint RPC.
//!
//! ## Layers
//!
//! - **rpc**: JSON-RPC transport (`status`, `abci_query`)
//! - **client**: connect-once [`ClientProvider`] and the [`ContractQuerier`] handle
//! - **query**: query messages, typed query functions and the [`DaoQueries`] seam

mod client;
mod error;
mod query;
mod rpc;

pub use client::{
    ChainClient, ChainClientConfig, ClientProvider, Connector, ContractQuerier, HttpConnector,
    SMART_QUERY_PATH,
};
pub use error::{ChainError, ChainResult};
pub use query::{
    get_proposal, get_proposal_cost, get_quorum, list_items, list_proposals, query_contract,
    ContractAddress, ContractReader, DaoQueries, QueryMsg,
};
pub use rpc::{AbciQueryResponse, NodeInfo, RpcClient, StatusResult};

#[cfg(test)]
pub(crate) use client::tests as testing;

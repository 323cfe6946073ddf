//! Chain client error types
//!
//! Every failure reaching a page controller is one of these three.

use thiserror::Error;

/// Errors that can occur while talking to the chain
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// RPC endpoint unreachable or misconfigured
    #[error("Connection error: {0}")]
    Connection(String),

    /// Contract query rejected by the node, or invalid before it was sent
    #[error("Query error: {0}")]
    Query(String),

    /// Response did not have the expected shape
    #[error("Decode error: {0}")]
    Decode(String),
}

impl ChainError {
    /// Classify a transport failure from reqwest
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ChainError::Decode(err.to_string())
        } else {
            ChainError::Connection(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ChainError {
    fn from(err: serde_json::Error) -> Self {
        ChainError::Decode(err.to_string())
    }
}

/// Result type for chain operations
pub type ChainResult<T> = Result<T, ChainError>;

//! # item-dao
//!
//! Server-rendered front-end for an item-dao CosmWasm contract: a list of
//! the DAO's items and governance proposals, and a detail page per
//! proposal with its votes.
//!
//! ## Modules
//!
//! - [`chain`]: connect-once RPC client and typed contract queries
//! - [`model`]: data shapes returned by the contract
//! - [`pages`]: per-request page controllers with Loading/Loaded/Error sections
//! - [`views`]: Leptos components rendered to HTML
//! - [`api`]: Axum router, health probes and server loop
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use item_dao::chain::{ClientProvider, ContractAddress, ContractReader, DaoQueries};
//! use item_dao::Config;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let provider = Arc::new(ClientProvider::http(config.chain_client_config()));
//!     let contract = ContractAddress::parse(&config.chain.contract_address)?;
//!
//!     let reader = ContractReader::new(provider, contract);
//!     for item in reader.list_items().await? {
//!         println!("{}: {}", item.name, item.contents);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod chain;
pub mod config;
pub mod model;
pub mod pages;
pub mod views;

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use chain::{
    ChainError, ChainResult, ClientProvider, ContractAddress, ContractReader, DaoQueries,
};

pub use config::{generate_default_config, Config, ConfigError, LoggingConfig};

pub use model::{
    GovernanceParams, Item, ProposalDetail, ProposalStatus, ProposalSummary, Tally, TokenAmount,
    Vote, VotePosition,
};

pub use pages::{DetailPage, ListPage, LoadState};

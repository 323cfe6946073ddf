//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and `ITEM_DAO_*` environment overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::ApiConfig;
use crate::chain::{ChainClientConfig, ContractAddress};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub chain: ChainConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Chain connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    #[serde(default = "default_contract_address")]
    pub contract_address: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_rpc_url() -> String {
    "https://rpc.uni.junomint.com:443".to_string()
}

fn default_contract_address() -> String {
    "juno1eu70kcgh0d2rlm0n88dgtry9wpqnerf5n2fdzt5sxm6d3vrqq3xqa5e9x8".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            contract_address: default_contract_address(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_render_deadline")]
    pub render_deadline_ms: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8083
}

fn default_render_deadline() -> u64 {
    1500
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            render_deadline_ms: default_render_deadline(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Default config locations, in search order
    pub fn search_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join("item-dao").join("config.toml")),
            Some(PathBuf::from("/etc/item-dao/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// First default location that exists
    pub fn find_default_path() -> Option<PathBuf> {
        first_existing(&Self::search_paths())
    }

    /// Apply environment variable overrides to an existing config
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Chain overrides
        if let Some(url) = lookup("ITEM_DAO_RPC_URL") {
            self.chain.rpc_url = url;
        }
        if let Some(contract) = lookup("ITEM_DAO_CONTRACT") {
            self.chain.contract_address = contract;
        }

        // Server overrides
        if let Some(host) = lookup("ITEM_DAO_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("ITEM_DAO_PORT") {
            match port.parse() {
                Ok(p) => self.server.port = p,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid ITEM_DAO_PORT"),
            }
        }
        if let Some(deadline) = lookup("ITEM_DAO_RENDER_DEADLINE_MS") {
            match deadline.parse() {
                Ok(ms) => self.server.render_deadline_ms = ms,
                Err(_) => {
                    tracing::warn!(value = %deadline, "Ignoring invalid ITEM_DAO_RENDER_DEADLINE_MS")
                }
            }
        }

        // Logging overrides
        if let Some(level) = lookup("ITEM_DAO_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("ITEM_DAO_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Reject values the server cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.contract_address()?;

        let rpc = self.chain.rpc_url.as_str();
        if !(rpc.starts_with("http://") || rpc.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "chain.rpc_url must be an http(s) URL, got `{}`",
                rpc
            )));
        }
        if self.chain.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "chain.request_timeout_secs must be positive".to_string(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::Invalid(format!(
                "logging.format must be `pretty` or `json`, got `{}`",
                self.logging.format
            )));
        }
        Ok(())
    }

    /// The configured contract address, validated
    pub fn contract_address(&self) -> Result<ContractAddress, ConfigError> {
        ContractAddress::parse(&self.chain.contract_address)
            .map_err(|e| ConfigError::Invalid(format!("chain.contract_address: {}", e)))
    }

    pub fn chain_client_config(&self) -> ChainClientConfig {
        ChainClientConfig {
            rpc_url: self.chain.rpc_url.clone(),
            request_timeout: Duration::from_secs(self.chain.request_timeout_secs),
        }
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            host: self.server.host.clone(),
            port: self.server.port,
            render_deadline: Duration::from_millis(self.server.render_deadline_ms),
        }
    }
}

fn first_existing(paths: &[PathBuf]) -> Option<PathBuf> {
    paths.iter().find(|path| path.exists()).cloned()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# item-dao Configuration
#
# Environment variables override these settings:
# - ITEM_DAO_RPC_URL
# - ITEM_DAO_CONTRACT
# - ITEM_DAO_HOST
# - ITEM_DAO_PORT
# - ITEM_DAO_RENDER_DEADLINE_MS
# - ITEM_DAO_LOG_LEVEL
# - ITEM_DAO_LOG_FORMAT

[chain]
# Tendermint RPC endpoint of the chain
rpc_url = "https://rpc.uni.junomint.com:443"

# Address of the item-dao contract
contract_address = "juno1eu70kcgh0d2rlm0n88dgtry9wpqnerf5n2fdzt5sxm6d3vrqq3xqa5e9x8"

# Per-request timeout in seconds
request_timeout_secs = 10

[server]
# Host to bind to
host = "0.0.0.0"

# Port to listen on
port = 8083

# How long a page waits for chain queries before rendering (ms)
render_deadline_ms = 1500

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

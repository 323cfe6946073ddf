//! item-dao server
//!
//! Run with: cargo run -- --config ./config.toml
//!
//! Configuration is read from `--config`, or else from the first of
//! `$CONFIG_DIR/item-dao/config.toml`, `/etc/item-dao/config.toml` and
//! `./config.toml` that exists. `ITEM_DAO_*` environment variables override
//! file values, and `--host`/`--port` override both. `RUST_LOG` takes
//! precedence over the configured log level.

use clap::Parser;
use item_dao::chain::{ClientProvider, ContractReader};
use item_dao::{generate_default_config, serve, AppState, Config, LoggingConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "item-dao", version, about = "Web front-end for an item-dao contract")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print a default config file and exit
    #[arg(long)]
    print_config: bool,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_config {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let config_path = args.config.clone().or_else(Config::find_default_path);

    // Warnings raised while loading go to stderr before logging is configured
    let bootstrap = tracing_subscriber::fmt().with_writer(std::io::stderr).finish();
    let mut config = tracing::subscriber::with_default(bootstrap, || match &config_path {
        Some(path) => Config::load_with_env(path),
        None => Ok(Config::from_env()),
    })?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate()?;

    init_tracing(&config.logging);

    tracing::info!("Starting item-dao v{}", env!("CARGO_PKG_VERSION"));
    match &config_path {
        Some(path) => tracing::info!("Loaded config from {:?}", path),
        None => tracing::info!("Using default config with environment overrides"),
    }
    tracing::info!(rpc_url = %config.chain.rpc_url, "Chain endpoint");

    let contract = config.contract_address()?;

    // Connection is opened lazily by the first query
    let provider = Arc::new(ClientProvider::http(config.chain_client_config()));
    let reader = ContractReader::new(Arc::clone(&provider), contract.clone());

    let state = AppState::new(Arc::new(reader), provider, contract, config.api_config());
    serve(state).await?;

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("item_dao={},tower_http=info", logging.level))
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

//! `caprank-server`: serves the market-cap API and dashboard page.
//!
//! Reads `caprank.toml` (or the path given with `--config`), opens the SQLite
//! store, and listens on `host:port`. Each request reads committed state, so
//! a concurrent `caprank-seed` run shows up on the next request.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use caprank::{Settings, config::DEFAULT_CONFIG_FILE};
use caprank_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(author, version, about = "Market-cap ranking server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  caprank::init_tracing();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config).context("failed to load configuration")?;

  let store_path = settings.store_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let store = Arc::new(store);

  let app = caprank::router(store.clone());
  let address = settings.address();

  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;
  tracing::info!("Listening on http://{address}");

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  tracing::info!("shutting down");
  caprank::close_store(store).await.context("failed to close store")?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for ctrl-c");
  }
}

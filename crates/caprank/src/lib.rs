//! Application layer for caprank: configuration, the HTTP server router, and
//! the seed pipeline inputs.
//!
//! Two binaries sit on top of this crate:
//!
//! - `caprank-server` serves the JSON API under `/api` and the dashboard page
//!   at `/`.
//! - `caprank-seed` builds an ingest batch from a ticker list, a JSON file, or
//!   the default set, and writes it in one transaction.

pub mod config;
pub mod seed;
pub mod web;

use std::sync::Arc;

use caprank_store_sqlite::SqliteStore;

pub use config::Settings;
pub use web::router;

/// Close `store` if this is the last handle to it.
///
/// Returns `false`, with a warning, when other clones are still alive; the
/// connection then closes when the last one drops.
pub async fn close_store(store: Arc<SqliteStore>) -> caprank_store_sqlite::Result<bool> {
  match Arc::try_unwrap(store) {
    Ok(store) => {
      store.close().await?;
      Ok(true)
    }
    Err(store) => {
      tracing::warn!(
        handles = Arc::strong_count(&store),
        "store still shared after shutdown; leaving it to close on drop"
      );
      Ok(false)
    }
  }
}

/// Install the `tracing` subscriber used by both binaries.
///
/// Defaults to `INFO`; override with `RUST_LOG`.
pub fn init_tracing() {
  use tracing::level_filters::LevelFilter;
  use tracing_subscriber::EnvFilter;

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();
}

#[cfg(test)]
mod tests {
  use super::*;

  use caprank_core::store::MarketCapStore as _;

  #[tokio::test]
  async fn sole_handle_is_closed() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    assert!(close_store(store).await.unwrap());
  }

  #[tokio::test]
  async fn shared_handle_is_left_open() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let other = store.clone();

    assert!(!close_store(store).await.unwrap());
    // The remaining clone still works.
    assert!(other.latest_ranks().await.unwrap().is_empty());
  }
}

//! JSON REST API for caprank.
//!
//! Exposes an axum [`Router`] backed by any [`caprank_core::store::MarketCapStore`].
//! Transport concerns (listening, tracing layers, static pages) are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", caprank_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod market_caps;

use std::sync::Arc;

use axum::{Router, routing::get};
use caprank_core::store::MarketCapStore;

pub use error::ApiError;

/// Build the API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: MarketCapStore + 'static,
{
  Router::new()
    .route("/market-caps", get(market_caps::history::<S>))
    .route("/market-caps/today", get(market_caps::today::<S>))
    .with_state(store)
}

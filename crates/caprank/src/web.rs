//! Top-level HTTP router: the JSON API under `/api` and the dashboard page at
//! `/`.

use std::sync::Arc;

use axum::{Router, response::Html, routing::get};
use caprank_core::store::MarketCapStore;
use tower_http::trace::TraceLayer;

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Build the full application router over `store`.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: MarketCapStore + 'static,
{
  Router::new()
    .route("/", get(index))
    .nest("/api", caprank_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}

async fn index() -> Html<&'static str> { Html(INDEX_HTML) }

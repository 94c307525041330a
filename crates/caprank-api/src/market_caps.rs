//! Handlers for `/market-caps` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/market-caps` | Optional `tickers` (csv), `from`, `to` (`YYYY-MM-DD`) |
//! | `GET`  | `/market-caps/today` | Leaderboard for the most recent stored date |
//!
//! Both respond with `{"data": [...]}`; an empty store yields `{"data": []}`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use caprank_core::{
  market_cap::{HistoryRow, LatestRankRow},
  store::{HistoryQuery, MarketCapStore},
  ticker::Ticker,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Response body shared by both endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
  pub data: Vec<T>,
}

impl<T> From<Vec<T>> for DataEnvelope<T> {
  fn from(data: Vec<T>) -> Self { Self { data } }
}

// ─── History ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct HistoryParams {
  /// Comma-separated tickers, e.g. `aapl,MSFT`. Case-insensitive.
  pub tickers: Option<String>,
  /// Inclusive lower bound, `YYYY-MM-DD`. Empty is treated as absent.
  pub from:    Option<String>,
  /// Inclusive upper bound, `YYYY-MM-DD`. Empty is treated as absent.
  pub to:      Option<String>,
}

impl HistoryParams {
  /// Translate raw query-string values into a [`HistoryQuery`].
  pub fn into_query(self) -> Result<HistoryQuery, ApiError> {
    let tickers = match self.tickers.as_deref() {
      Some(csv) => Ticker::parse_list(csv).map_err(|e| ApiError::BadRequest(e.to_string()))?,
      None => Vec::new(),
    };

    Ok(HistoryQuery {
      tickers,
      from: parse_date("from", self.from.as_deref())?,
      to: parse_date("to", self.to.as_deref())?,
    })
  }
}

fn parse_date(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
  match raw.map(str::trim).filter(|s| !s.is_empty()) {
    None => Ok(None),
    Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
      .map(Some)
      .map_err(|_| ApiError::BadRequest(format!("`{field}` must be YYYY-MM-DD, got {s:?}"))),
  }
}

/// `GET /market-caps[?tickers=...][&from=...][&to=...]`
pub async fn history<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<HistoryParams>,
) -> Result<Json<DataEnvelope<HistoryRow>>, ApiError>
where
  S: MarketCapStore,
{
  let query = params.into_query()?;
  let rows = store.history(&query).await.map_err(ApiError::store)?;
  Ok(Json(rows.into()))
}

// ─── Today ────────────────────────────────────────────────────────────────────

/// `GET /market-caps/today`
pub async fn today<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<DataEnvelope<LatestRankRow>>, ApiError>
where
  S: MarketCapStore,
{
  let rows = store.latest_ranks().await.map_err(ApiError::store)?;
  Ok(Json(rows.into()))
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use caprank_core::market_cap::{IngestBatch, NewStock, Observation};
  use caprank_store_sqlite::SqliteStore;
  use serde_json::Value;
  use tower::ServiceExt as _;

  use crate::api_router;

  fn t(s: &str) -> Ticker { Ticker::parse(s).unwrap() }

  fn d(y: i32, m: u32, day: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, day).unwrap() }

  async fn seeded_store() -> Arc<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let mut observations = Vec::new();
    for day in 1..=9 {
      observations.push(Observation::new(t("AAPL"), d(2024, 1, day), 3000.0));
      observations.push(Observation::new(t("MSFT"), d(2024, 1, day), 2500.0 + f64::from(day) * 100.0));
      observations.push(Observation::new(t("AMZN"), d(2024, 1, day), 1800.0));
    }
    store
      .ingest(IngestBatch {
        stocks: vec![
          NewStock::new(t("AAPL")).with_name("Apple Inc."),
          NewStock::new(t("MSFT")).with_name("Microsoft Corp."),
          NewStock::new(t("AMZN")).with_name("Amazon.com Inc."),
        ],
        observations,
      })
      .await
      .unwrap();
    Arc::new(store)
  }

  async fn get_json(store: Arc<SqliteStore>, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = api_router(store).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  #[test]
  fn params_normalise_tickers_and_drop_empty_dates() {
    let params = HistoryParams {
      tickers: Some(" aapl, ,msft".into()),
      from:    Some("".into()),
      to:      Some("2024-01-05".into()),
    };
    let query = params.into_query().unwrap();
    assert_eq!(query.tickers, vec![t("AAPL"), t("MSFT")]);
    assert_eq!(query.from, None);
    assert_eq!(query.to, Some(d(2024, 1, 5)));
  }

  #[tokio::test]
  async fn history_defaults_to_trailing_week() {
    let (status, body) = get_json(seeded_store().await, "/market-caps").await;
    assert_eq!(status, StatusCode::OK);

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 7 * 3);
    assert_eq!(data[0]["date"], "2024-01-03");
    assert_eq!(data[0]["ticker"], "AAPL");
    assert_eq!(data[0]["name"], "Apple Inc.");
    assert_eq!(data[0]["rank"], 1);
    assert_eq!(data.last().unwrap()["date"], "2024-01-09");
  }

  #[tokio::test]
  async fn history_filters_tickers_and_dates() {
    let (status, body) = get_json(
      seeded_store().await,
      "/market-caps?tickers=amzn,aapl&from=2024-01-01&to=2024-01-02",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 4);
    let got: Vec<_> = data
      .iter()
      .map(|r| (r["date"].as_str().unwrap(), r["ticker"].as_str().unwrap(), r["rank"].as_u64().unwrap()))
      .collect();
    assert_eq!(got, [
      ("2024-01-01", "AAPL", 1),
      ("2024-01-01", "AMZN", 3),
      ("2024-01-02", "AAPL", 1),
      ("2024-01-02", "AMZN", 3),
    ]);
  }

  #[tokio::test]
  async fn bad_date_is_a_client_error() {
    let (status, body) = get_json(seeded_store().await, "/market-caps?from=yesterday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("from"));
  }

  #[tokio::test]
  async fn bad_ticker_is_a_client_error() {
    let (status, _) = get_json(seeded_store().await, "/market-caps?tickers=AAPL,%3B--").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn today_returns_latest_leaderboard() {
    let (status, body) = get_json(seeded_store().await, "/market-caps/today").await;
    assert_eq!(status, StatusCode::OK);

    let data = body["data"].as_array().unwrap();
    let got: Vec<_> = data
      .iter()
      .map(|r| (r["ticker"].as_str().unwrap(), r["rank"].as_u64().unwrap()))
      .collect();
    assert_eq!(got, [("MSFT", 1), ("AAPL", 2), ("AMZN", 3)]);
    assert_eq!(data[0]["market_cap"], 3400.0);
    assert!(data[0].get("date").is_none());
  }

  #[tokio::test]
  async fn empty_store_yields_empty_data() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());

    let (status, body) = get_json(store.clone(), "/market-caps").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "data": [] }));

    let (status, body) = get_json(store, "/market-caps/today").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "data": [] }));
  }
}

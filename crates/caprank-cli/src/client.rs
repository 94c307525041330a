//! Async HTTP client wrapping the caprank JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use caprank_core::market_cap::{HistoryRow, LatestRankRow};
use chrono::NaiveDate;
use reqwest::{Client, Response};
use serde::{Deserialize, de::DeserializeOwned};

/// `{"data": [...]}` as returned by both endpoints.
#[derive(Deserialize)]
struct DataEnvelope<T> {
  data: Vec<T>,
}

/// `{"error": "..."}` as returned on 4xx/5xx.
#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

/// Async HTTP client for the caprank API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client:   Client,
  base_url: String,
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, base_url: base_url.into() })
  }

  pub fn base_url(&self) -> &str { &self.base_url }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.base_url.trim_end_matches('/'), path)
  }

  /// `GET /api/market-caps[?tickers=..][&from=..][&to=..]`
  pub async fn history(
    &self,
    tickers: &str,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
  ) -> Result<Vec<HistoryRow>> {
    let mut query: Vec<(&str, String)> = Vec::new();
    if !tickers.trim().is_empty() {
      query.push(("tickers", tickers.trim().to_owned()));
    }
    if let Some(from) = from {
      query.push(("from", from.to_string()));
    }
    if let Some(to) = to {
      query.push(("to", to.to_string()));
    }
    tracing::debug!(?query, "fetching history");

    let resp = self
      .client
      .get(self.url("/market-caps"))
      .query(&query)
      .send()
      .await
      .context("GET /market-caps failed")?;
    read_data(resp, "GET /market-caps").await
  }

  /// `GET /api/market-caps/today`
  pub async fn today(&self) -> Result<Vec<LatestRankRow>> {
    let resp = self
      .client
      .get(self.url("/market-caps/today"))
      .send()
      .await
      .context("GET /market-caps/today failed")?;
    read_data(resp, "GET /market-caps/today").await
  }
}

/// Unwrap the `data` envelope, or turn a non-success status into an error
/// carrying the server's message when it sent one.
async fn read_data<T: DeserializeOwned>(resp: Response, what: &str) -> Result<Vec<T>> {
  let status = resp.status();
  if !status.is_success() {
    let detail = resp
      .json::<ErrorBody>()
      .await
      .map(|b| b.error)
      .unwrap_or_else(|_| status.canonical_reason().unwrap_or_default().to_owned());
    return Err(anyhow!("{what} → {status}: {detail}"));
  }
  let envelope: DataEnvelope<T> = resp.json().await.with_context(|| format!("deserialising {what}"))?;
  Ok(envelope.data)
}

//! Stock identity, ingest inputs, and the read models served to clients.
//!
//! A stock is a thin identity record. Everything that changes day to day lives
//! in daily market-cap rows, each carrying the rank computed for its date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ticker::Ticker;

// ─── Identity ────────────────────────────────────────────────────────────────

/// A persisted stock. Created once per ticker and never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
  pub id:     i64,
  pub ticker: Ticker,
  pub name:   String,
  pub sector: Option<String>,
}

/// Identity supplied with an ingest batch.
///
/// Inserted only if the ticker is not already stored; an existing name or
/// sector is never overwritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStock {
  pub ticker: Ticker,
  pub name:   Option<String>,
  pub sector: Option<String>,
}

impl NewStock {
  pub fn new(ticker: Ticker) -> Self { Self { ticker, name: None, sector: None } }

  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  /// The display name to store: the given name, or the ticker symbol.
  pub fn display_name(&self) -> String {
    self
      .name
      .clone()
      .unwrap_or_else(|| self.ticker.as_str().to_owned())
  }
}

// ─── Ingest ──────────────────────────────────────────────────────────────────

/// One `(ticker, date, market_cap)` input triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
  pub ticker:     Ticker,
  pub date:       NaiveDate,
  pub market_cap: f64,
}

impl Observation {
  pub fn new(ticker: Ticker, date: NaiveDate, market_cap: f64) -> Self {
    Self { ticker, date, market_cap }
  }
}

/// Everything written by one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct IngestBatch {
  /// Identities to insert if absent. Observations may also reference tickers
  /// that are already stored.
  pub stocks:       Vec<NewStock>,
  pub observations: Vec<Observation>,
}

/// Summary of a committed pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
  /// Stocks that did not exist before this run.
  pub stocks_created: usize,
  /// Distinct dates ranked, ascending.
  pub dates:          Vec<NaiveDate>,
  /// Rows supplied by the batch, inserted or replaced.
  pub rows_written:   usize,
  /// Previously stored rows on touched dates whose rank was recomputed.
  pub rows_reranked:  usize,
}

// ─── Read models ─────────────────────────────────────────────────────────────

/// One row of the history view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
  pub ticker:     Ticker,
  pub name:       String,
  pub date:       NaiveDate,
  pub market_cap: f64,
  pub rank:       u32,
}

/// One row of the latest-date leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestRankRow {
  pub ticker:     Ticker,
  pub name:       String,
  pub market_cap: f64,
  pub rank:       u32,
}

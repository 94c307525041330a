//! Error types for `caprank-core`.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid ticker symbol: {0:?}")]
  InvalidTicker(String),

  #[error("invalid market cap {value} for {ticker} on {date}")]
  InvalidMarketCap {
    ticker: String,
    date:   NaiveDate,
    value:  f64,
  },

  #[error("ingest batch contains no observations")]
  EmptyBatch,

  #[error("duplicate observation for {ticker} on {date}")]
  DuplicateObservation { ticker: String, date: NaiveDate },

  #[error("ticker {0} does not resolve to a stored stock")]
  UnresolvedTicker(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

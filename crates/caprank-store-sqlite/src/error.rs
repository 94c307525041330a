//! Error type for `caprank-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] caprank_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("date parse error: {0}")]
  DateParse(String),

  #[error("stored rank out of range: {0}")]
  InvalidRank(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD` so that lexical comparison in SQL matches
//! chronological order. Tickers are stored in their normalised upper-case form.

use caprank_core::{
  market_cap::{HistoryRow, LatestRankRow, Stock},
  ticker::Ticker,
};
use chrono::NaiveDate;

use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(date: NaiveDate) -> String { date.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Rank ────────────────────────────────────────────────────────────────────

fn decode_rank(raw: i64) -> Result<u32> {
  u32::try_from(raw)
    .ok()
    .filter(|r| *r >= 1)
    .ok_or(Error::InvalidRank(raw))
}

// ─── Raw row types ───────────────────────────────────────────────────────────

/// Raw column values for a `stocks` row.
pub struct RawStock {
  pub id:     i64,
  pub ticker: String,
  pub name:   String,
  pub sector: Option<String>,
}

impl RawStock {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:     row.get(0)?,
      ticker: row.get(1)?,
      name:   row.get(2)?,
      sector: row.get(3)?,
    })
  }

  pub fn into_stock(self) -> Result<Stock> {
    Ok(Stock {
      id:     self.id,
      ticker: Ticker::parse(&self.ticker)?,
      name:   self.name,
      sector: self.sector,
    })
  }
}

/// Raw column values for a joined history row.
pub struct RawHistoryRow {
  pub ticker:     String,
  pub name:       String,
  pub date:       String,
  pub market_cap: f64,
  pub rank:       i64,
}

impl RawHistoryRow {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      ticker:     row.get(0)?,
      name:       row.get(1)?,
      date:       row.get(2)?,
      market_cap: row.get(3)?,
      rank:       row.get(4)?,
    })
  }

  pub fn into_row(self) -> Result<HistoryRow> {
    Ok(HistoryRow {
      ticker:     Ticker::parse(&self.ticker)?,
      name:       self.name,
      date:       decode_date(&self.date)?,
      market_cap: self.market_cap,
      rank:       decode_rank(self.rank)?,
    })
  }
}

/// Raw column values for a leaderboard row.
pub struct RawLatestRankRow {
  pub ticker:     String,
  pub name:       String,
  pub market_cap: f64,
  pub rank:       i64,
}

impl RawLatestRankRow {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      ticker:     row.get(0)?,
      name:       row.get(1)?,
      market_cap: row.get(2)?,
      rank:       row.get(3)?,
    })
  }

  pub fn into_row(self) -> Result<LatestRankRow> {
    Ok(LatestRankRow {
      ticker:     Ticker::parse(&self.ticker)?,
      name:       self.name,
      market_cap: self.market_cap,
      rank:       decode_rank(self.rank)?,
    })
  }
}

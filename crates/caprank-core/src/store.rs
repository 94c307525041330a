//! The `MarketCapStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `caprank-store-sqlite`).
//! Higher layers (`caprank-api`, the seed binary) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use chrono::{Days, NaiveDate};

use crate::{
  market_cap::{HistoryRow, IngestBatch, IngestReport, LatestRankRow, Stock},
  ticker::Ticker,
};

/// Length of the trailing window used when a history query names no bounds.
pub const DEFAULT_WINDOW_DAYS: u64 = 7;

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`MarketCapStore::history`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryQuery {
  /// Restrict to these tickers. Empty means every ticker with data.
  pub tickers: Vec<Ticker>,
  /// Inclusive lower bound.
  pub from:    Option<NaiveDate>,
  /// Inclusive upper bound.
  pub to:      Option<NaiveDate>,
}

impl HistoryQuery {
  /// The inclusive date bounds to apply, given the most recent stored date.
  ///
  /// With neither bound set the window is the [`DEFAULT_WINDOW_DAYS`] days
  /// ending at `latest`. Otherwise the bounds are used as given, so a single
  /// bound leaves the other side open.
  pub fn resolve_window(&self, latest: NaiveDate) -> (Option<NaiveDate>, Option<NaiveDate>) {
    match (self.from, self.to) {
      (None, None) => {
        let start = latest
          .checked_sub_days(Days::new(DEFAULT_WINDOW_DAYS - 1))
          .unwrap_or(NaiveDate::MIN);
        (Some(start), Some(latest))
      }
      bounds => bounds,
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a market-cap store backend.
///
/// Writes happen only through [`ingest`](Self::ingest), one atomic run at a
/// time. Every read sees committed state only and treats "no data" as an
/// empty result rather than an error.
pub trait MarketCapStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Rank every date in `batch` and upsert the results in one transaction.
  ///
  /// Stocks are inserted if absent and never overwritten. For each date in
  /// the batch, the supplied values replace any stored ones and every row on
  /// that date, stored or new, is re-ranked so ranks stay `1..=k`. No row is
  /// deleted. Any failure rolls back the entire run.
  fn ingest(
    &self,
    batch: IngestBatch,
  ) -> impl Future<Output = Result<IngestReport, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Ranked rows ordered by date, then rank. See [`HistoryQuery::resolve_window`]
  /// for how missing bounds are filled in.
  fn history<'a>(
    &'a self,
    query: &'a HistoryQuery,
  ) -> impl Future<Output = Result<Vec<HistoryRow>, Self::Error>> + Send + 'a;

  /// The leaderboard for the most recent stored date, ordered by rank.
  fn latest_ranks(
    &self,
  ) -> impl Future<Output = Result<Vec<LatestRankRow>, Self::Error>> + Send + '_;

  /// The most recent date with any data, or `None` for an empty store.
  fn latest_date(
    &self,
  ) -> impl Future<Output = Result<Option<NaiveDate>, Self::Error>> + Send + '_;

  /// Every stored stock, ordered by ticker.
  fn list_stocks(
    &self,
  ) -> impl Future<Output = Result<Vec<Stock>, Self::Error>> + Send + '_;
}

#[cfg(test)]
mod tests {
  use super::*;

  fn d(y: i32, m: u32, day: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, day).unwrap() }

  #[test]
  fn no_bounds_means_trailing_week() {
    let q = HistoryQuery::default();
    assert_eq!(q.resolve_window(d(2024, 3, 2)), (Some(d(2024, 2, 25)), Some(d(2024, 3, 2))));
  }

  #[test]
  fn explicit_bounds_are_kept() {
    let q = HistoryQuery { from: Some(d(2024, 1, 1)), ..Default::default() };
    assert_eq!(q.resolve_window(d(2024, 3, 2)), (Some(d(2024, 1, 1)), None));

    let q = HistoryQuery { from: Some(d(2024, 1, 1)), to: Some(d(2024, 1, 5)), ..Default::default() };
    assert_eq!(q.resolve_window(d(2024, 3, 2)), (Some(d(2024, 1, 1)), Some(d(2024, 1, 5))));
  }
}

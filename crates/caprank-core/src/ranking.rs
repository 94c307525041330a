//! Per-date dense ranking of market caps.
//!
//! Ranking is pure: storage backends group a batch with [`group_by_date`] and
//! call [`rank_day`] for each date inside their write transaction, so an
//! invalid value on any date aborts the whole run.

use std::{cmp::Ordering, collections::BTreeMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, market_cap::Observation, ticker::Ticker};

/// A ticker's position on one date. `rank` is 1-based, 1 = largest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
  pub ticker:     Ticker,
  pub market_cap: f64,
  pub rank:       u32,
}

/// All ranked entries for one date, ordered by rank.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedDay {
  pub date:    NaiveDate,
  pub entries: Vec<RankedEntry>,
}

/// Observations bucketed by date, in chronological order.
pub type DateGroups = BTreeMap<NaiveDate, Vec<(Ticker, f64)>>;

/// Bucket observations by date, preserving input order within a date.
///
/// Fails on an empty batch or when a `(ticker, date)` pair appears twice.
pub fn group_by_date(observations: &[Observation]) -> Result<DateGroups> {
  if observations.is_empty() {
    return Err(Error::EmptyBatch);
  }

  let mut groups = DateGroups::new();
  for obs in observations {
    let day = groups.entry(obs.date).or_default();
    if day.iter().any(|(t, _)| *t == obs.ticker) {
      return Err(Error::DuplicateObservation {
        ticker: obs.ticker.to_string(),
        date:   obs.date,
      });
    }
    day.push((obs.ticker.clone(), obs.market_cap));
  }
  Ok(groups)
}

/// Rank one date's entries: descending market cap, ties broken by ticker.
///
/// Every value must be finite and non-negative.
pub fn rank_day(date: NaiveDate, mut entries: Vec<(Ticker, f64)>) -> Result<Vec<RankedEntry>> {
  if let Some((ticker, value)) = entries
    .iter()
    .find(|(_, v)| !v.is_finite() || *v < 0.0)
  {
    return Err(Error::InvalidMarketCap {
      ticker: ticker.to_string(),
      date,
      value: *value,
    });
  }

  entries.sort_by(|(ta, va), (tb, vb)| {
    vb.partial_cmp(va)
      .unwrap_or(Ordering::Equal)
      .then_with(|| ta.cmp(tb))
  });

  Ok(
    entries
      .into_iter()
      .zip(1u32..)
      .map(|((ticker, market_cap), rank)| RankedEntry { ticker, market_cap, rank })
      .collect(),
  )
}

/// Group and rank a whole batch.
pub fn rank_all(observations: &[Observation]) -> Result<Vec<RankedDay>> {
  group_by_date(observations)?
    .into_iter()
    .map(|(date, entries)| rank_day(date, entries).map(|entries| RankedDay { date, entries }))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn t(s: &str) -> Ticker { Ticker::parse(s).unwrap() }

  fn d(y: i32, m: u32, day: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, day).unwrap() }

  fn ranks(entries: &[RankedEntry]) -> Vec<(&str, u32)> {
    entries.iter().map(|e| (e.ticker.as_str(), e.rank)).collect()
  }

  #[test]
  fn ranks_descending_by_market_cap() {
    let entries = vec![(t("AMZN"), 1800.0), (t("AAPL"), 3000.0), (t("MSFT"), 2500.0)];
    let ranked = rank_day(d(2024, 1, 1), entries).unwrap();
    assert_eq!(ranks(&ranked), [("AAPL", 1), ("MSFT", 2), ("AMZN", 3)]);
  }

  #[test]
  fn ranks_are_dense_from_one() {
    let entries: Vec<_> = ["A", "B", "C", "D", "E", "F"]
      .iter()
      .zip([5.0, 1.0, 9.0, 3.0, 7.0, 2.0])
      .map(|(s, v)| (t(s), v))
      .collect();
    let ranked = rank_day(d(2024, 1, 1), entries).unwrap();

    let mut got: Vec<u32> = ranked.iter().map(|e| e.rank).collect();
    got.sort_unstable();
    assert_eq!(got, (1..=6).collect::<Vec<_>>());
    assert_eq!(ranked.first().unwrap().ticker.as_str(), "C");
    assert_eq!(ranked.last().unwrap().ticker.as_str(), "B");
  }

  #[test]
  fn ties_break_by_ticker() {
    let entries = vec![(t("MSFT"), 100.0), (t("AAPL"), 100.0), (t("GOOG"), 200.0)];
    let ranked = rank_day(d(2024, 1, 1), entries).unwrap();
    assert_eq!(ranks(&ranked), [("GOOG", 1), ("AAPL", 2), ("MSFT", 3)]);
  }

  #[test]
  fn rejects_non_finite_and_negative() {
    for bad in [f64::NAN, f64::INFINITY, -1.0] {
      let err = rank_day(d(2024, 1, 1), vec![(t("AAPL"), 1.0), (t("MSFT"), bad)]).unwrap_err();
      assert!(matches!(err, Error::InvalidMarketCap { ref ticker, .. } if ticker == "MSFT"));
    }
  }

  #[test]
  fn group_rejects_duplicates_and_empty() {
    assert!(matches!(group_by_date(&[]), Err(Error::EmptyBatch)));

    let obs = vec![
      Observation::new(t("AAPL"), d(2024, 1, 1), 1.0),
      Observation::new(t("AAPL"), d(2024, 1, 1), 2.0),
    ];
    assert!(matches!(group_by_date(&obs), Err(Error::DuplicateObservation { .. })));
  }

  #[test]
  fn rank_all_ranks_each_date_independently() {
    let obs = vec![
      Observation::new(t("AAPL"), d(2024, 1, 2), 1.0),
      Observation::new(t("MSFT"), d(2024, 1, 2), 2.0),
      Observation::new(t("AAPL"), d(2024, 1, 1), 2.0),
      Observation::new(t("MSFT"), d(2024, 1, 1), 1.0),
    ];
    let days = rank_all(&obs).unwrap();
    assert_eq!(days.len(), 2);
    assert_eq!(days[0].date, d(2024, 1, 1));
    assert_eq!(ranks(&days[0].entries), [("AAPL", 1), ("MSFT", 2)]);
    assert_eq!(ranks(&days[1].entries), [("MSFT", 1), ("AAPL", 2)]);
  }
}

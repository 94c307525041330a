//! Inputs for the `caprank-seed` binary.
//!
//! A seed run turns a list of [`TickerSpec`]s into one [`IngestBatch`]:
//! synthetic random-walk values for the trailing window, overlaid with any
//! literal history the specs carry.

pub mod input;
pub mod synth;

use std::collections::BTreeMap;

use caprank_core::{
  market_cap::{IngestBatch, Observation},
  ticker::Ticker,
};
use chrono::NaiveDate;
use rand_core::RngCore;

pub use input::{SeedError, TickerSpec};

/// What a seed run should write.
#[derive(Debug, Clone)]
pub struct SeedPlan {
  pub specs:     Vec<TickerSpec>,
  /// Last day of the synthetic window.
  pub end:       NaiveDate,
  /// Length of the synthetic window in days.
  pub days:      u32,
  /// When false, only literal history is written.
  pub synthetic: bool,
}

impl SeedPlan {
  /// Assemble the ingest batch. Literal history wins over synthetic values
  /// for the same `(ticker, date)`.
  pub fn build_batch<R: RngCore>(&self, rng: &mut R) -> IngestBatch {
    let mut values: BTreeMap<(NaiveDate, Ticker), f64> = BTreeMap::new();

    if self.synthetic {
      let tickers: Vec<Ticker> = self.specs.iter().map(|s| s.stock.ticker.clone()).collect();
      for obs in synth::random_walk(rng, &tickers, self.end, self.days) {
        values.insert((obs.date, obs.ticker), obs.market_cap);
      }
    }

    for spec in &self.specs {
      for point in &spec.history {
        values.insert((point.date, spec.stock.ticker.clone()), point.market_cap);
      }
    }

    IngestBatch {
      stocks:       self.specs.iter().map(|s| s.stock.clone()).collect(),
      observations: values
        .into_iter()
        .map(|((date, ticker), market_cap)| Observation::new(ticker, date, market_cap))
        .collect(),
    }
  }
}

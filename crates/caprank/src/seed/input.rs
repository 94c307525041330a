//! Ticker-list sources: an inline comma-separated list, a JSON file, or the
//! built-in default set.

use std::{collections::HashMap, path::Path};

use caprank_core::{market_cap::NewStock, ticker::Ticker};
use chrono::NaiveDate;
use serde::Deserialize;

/// Used when neither `--tickers` nor `--file` is given.
pub const DEFAULT_TICKERS: [(&str, &str); 4] = [
  ("AAPL", "Apple Inc."),
  ("MSFT", "Microsoft Corp."),
  ("AMZN", "Amazon.com Inc."),
  ("GOOG", "Alphabet Inc. (C)"),
];

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
  #[error("ticker list is empty")]
  NoTickers,

  #[error(transparent)]
  Core(#[from] caprank_core::Error),

  #[error("reading {path}: {source}")]
  Read {
    path:   String,
    #[source]
    source: std::io::Error,
  },

  #[error("seed file is not a JSON array: {0}")]
  NotAnArray(#[source] serde_json::Error),

  #[error("seed entry {index}: {source}")]
  Entry {
    index:  usize,
    #[source]
    source: serde_json::Error,
  },

  #[error("seed entry {index}: {source}")]
  EntryTicker {
    index:  usize,
    #[source]
    source: caprank_core::Error,
  },
}

/// A literal `(date, market_cap)` pair for one ticker.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoryPoint {
  pub date:       NaiveDate,
  pub market_cap: f64,
}

/// One ticker to seed, with optional identity details and literal history.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerSpec {
  pub stock:   NewStock,
  pub history: Vec<HistoryPoint>,
}

impl TickerSpec {
  fn bare(ticker: Ticker) -> Self { Self { stock: NewStock::new(ticker), history: Vec::new() } }
}

#[derive(Deserialize)]
struct DetailedEntry {
  ticker:  String,
  name:    Option<String>,
  sector:  Option<String>,
  #[serde(default)]
  history: Vec<HistoryPoint>,
}

/// The default ticker set, with display names.
pub fn default_specs() -> Vec<TickerSpec> {
  DEFAULT_TICKERS
    .iter()
    .filter_map(|(ticker, name)| Ticker::parse(ticker).ok().map(|t| (t, *name)))
    .map(|(ticker, name)| TickerSpec {
      stock:   NewStock::new(ticker).with_name(name),
      history: Vec::new(),
    })
    .collect()
}

/// Parse `AAPL,msft, GOOG` into bare specs.
pub fn from_csv(csv: &str) -> Result<Vec<TickerSpec>, SeedError> {
  let specs = Ticker::parse_list(csv)?.into_iter().map(TickerSpec::bare).collect();
  dedupe(specs)
}

/// Parse a seed file's JSON text.
///
/// Each array entry is a bare ticker string or an object with `ticker` and
/// optional `name`, `sector` and `history`.
pub fn from_json(text: &str) -> Result<Vec<TickerSpec>, SeedError> {
  let entries: Vec<serde_json::Value> =
    serde_json::from_str(text).map_err(SeedError::NotAnArray)?;

  let mut specs = Vec::with_capacity(entries.len());
  for (index, entry) in entries.into_iter().enumerate() {
    let ticker =
      |raw: &str| Ticker::parse(raw).map_err(|source| SeedError::EntryTicker { index, source });
    let spec = match entry {
      serde_json::Value::String(symbol) => TickerSpec::bare(ticker(&symbol)?),
      other => {
        let detailed: DetailedEntry =
          serde_json::from_value(other).map_err(|source| SeedError::Entry { index, source })?;
        TickerSpec {
          stock:   NewStock {
            ticker: ticker(&detailed.ticker)?,
            name:   detailed.name,
            sector: detailed.sector,
          },
          history: detailed.history,
        }
      }
    };
    specs.push(spec);
  }
  dedupe(specs)
}

/// Read and parse a seed file.
pub fn from_file(path: &Path) -> Result<Vec<TickerSpec>, SeedError> {
  let text = std::fs::read_to_string(path).map_err(|source| SeedError::Read {
    path: path.display().to_string(),
    source,
  })?;
  from_json(&text)
}

/// Merge repeated tickers into their first occurrence, keeping the first
/// identity details and appending later history.
fn dedupe(specs: Vec<TickerSpec>) -> Result<Vec<TickerSpec>, SeedError> {
  let mut merged: Vec<TickerSpec> = Vec::with_capacity(specs.len());
  let mut positions: HashMap<Ticker, usize> = HashMap::new();

  for spec in specs {
    match positions.get(&spec.stock.ticker) {
      Some(&i) => merged[i].history.extend(spec.history),
      None => {
        positions.insert(spec.stock.ticker.clone(), merged.len());
        merged.push(spec);
      }
    }
  }

  if merged.is_empty() {
    return Err(SeedError::NoTickers);
  }
  Ok(merged)
}

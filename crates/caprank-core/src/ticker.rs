//! The normalised symbol that identifies a stock.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// An upper-case ticker symbol such as `AAPL` or `BRK.B`.
///
/// Only constructible through [`Ticker::parse`], so every value in the system
/// is already trimmed and case-normalised.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
  /// Trim and upper-case `raw`, rejecting empty symbols and anything outside
  /// `[A-Z0-9.-]`.
  pub fn parse(raw: &str) -> Result<Self> {
    let symbol = raw.trim().to_ascii_uppercase();
    let valid = !symbol.is_empty()
      && symbol
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    if !valid {
      return Err(Error::InvalidTicker(raw.to_owned()));
    }
    Ok(Self(symbol))
  }

  /// Parse a comma-separated list, skipping empty entries.
  ///
  /// `" aapl, ,msft "` yields `[AAPL, MSFT]`.
  pub fn parse_list(csv: &str) -> Result<Vec<Self>> {
    csv
      .split(',')
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(Self::parse)
      .collect()
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Ticker {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl AsRef<str> for Ticker {
  fn as_ref(&self) -> &str { &self.0 }
}

impl FromStr for Ticker {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::parse(s) }
}

impl TryFrom<String> for Ticker {
  type Error = Error;

  fn try_from(value: String) -> Result<Self> { Self::parse(&value) }
}

impl From<Ticker> for String {
  fn from(value: Ticker) -> Self { value.0 }
}

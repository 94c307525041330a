//! Synthetic market-cap series for demo data.

use caprank_core::{market_cap::Observation, ticker::Ticker};
use chrono::{Days, NaiveDate};
use rand_core::RngCore;

/// Starting value for the first ticker; each later ticker starts lower.
const BASE_START: f64 = 2500.0e9;
const BASE_STEP: f64 = 400.0e9;
const BASE_FLOOR: f64 = 100.0e9;

/// Largest day-to-day move in either direction.
pub const MAX_STEP: f64 = 60.0e6;

/// Starting market cap for the ticker at `index` in the seed list.
pub fn base_market_cap(index: usize) -> f64 {
  (BASE_START - BASE_STEP * index as f64).max(BASE_FLOOR)
}

/// One random-walk series per ticker over the `days` days ending at `end`,
/// returned in date order.
pub fn random_walk<R: RngCore>(
  rng: &mut R,
  tickers: &[Ticker],
  end: NaiveDate,
  days: u32,
) -> Vec<Observation> {
  let dates: Vec<NaiveDate> = (0..days)
    .rev()
    .filter_map(|back| end.checked_sub_days(Days::new(u64::from(back))))
    .collect();

  let mut levels: Vec<f64> = (0..tickers.len()).map(base_market_cap).collect();
  let mut out = Vec::with_capacity(dates.len() * tickers.len());

  for date in dates {
    for (ticker, level) in tickers.iter().zip(levels.iter_mut()) {
      *level = (*level + step(rng)).max(0.0);
      out.push(Observation::new(ticker.clone(), date, level.round()));
    }
  }
  out
}

/// A uniform move in `[-MAX_STEP, MAX_STEP)`.
fn step<R: RngCore>(rng: &mut R) -> f64 {
  let unit = (rng.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
  (unit * 2.0 - 1.0) * MAX_STEP
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;

  /// Deterministic stand-in for `OsRng`.
  #[derive(Default)]
  pub(crate) struct CountingRng(u64);

  impl RngCore for CountingRng {
    fn next_u32(&mut self) -> u32 { self.next_u64() as u32 }

    fn next_u64(&mut self) -> u64 {
      self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
      self.0
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) { rand_core::impls::fill_bytes_via_next(self, dest) }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
      self.fill_bytes(dest);
      Ok(())
    }
  }

  fn t(s: &str) -> Ticker { Ticker::parse(s).unwrap() }

  fn d(y: i32, m: u32, day: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, day).unwrap() }

  #[test]
  fn window_ends_on_end_date() {
    let obs = random_walk(&mut CountingRng::default(), &[t("AAPL"), t("MSFT")], d(2024, 3, 1), 7);
    assert_eq!(obs.len(), 14);
    assert_eq!(obs.first().unwrap().date, d(2024, 2, 24));
    assert_eq!(obs.last().unwrap().date, d(2024, 3, 1));
  }

  #[test]
  fn steps_stay_within_bounds() {
    let tickers = [t("AAPL"), t("MSFT"), t("AMZN")];
    let obs = random_walk(&mut CountingRng::default(), &tickers, d(2024, 3, 1), 30);

    for (i, ticker) in tickers.iter().enumerate() {
      let series: Vec<f64> =
        obs.iter().filter(|o| &o.ticker == ticker).map(|o| o.market_cap).collect();
      assert_eq!(series.len(), 30);
      assert!((series[0] - base_market_cap(i)).abs() <= MAX_STEP + 1.0);
      for pair in series.windows(2) {
        assert!((pair[1] - pair[0]).abs() <= MAX_STEP + 1.0);
      }
    }
  }

  #[test]
  fn later_tickers_start_lower_with_a_floor() {
    assert_eq!(base_market_cap(0), 2500.0e9);
    assert_eq!(base_market_cap(1), 2100.0e9);
    assert_eq!(base_market_cap(9), BASE_FLOOR);
  }

  #[test]
  fn zero_days_is_empty() {
    assert!(random_walk(&mut CountingRng::default(), &[t("AAPL")], d(2024, 3, 1), 0).is_empty());
  }
}

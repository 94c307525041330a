//! Application state machine and event dispatcher.

use caprank_core::market_cap::{HistoryRow, LatestRankRow};
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::client::ApiClient;

// ─── Input mode ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
  Normal,
  /// Typing a comma-separated ticker filter.
  Tickers,
  /// Typing a `FROM..TO` date range.
  Dates,
}

// ─── Date range ───────────────────────────────────────────────────────────────

/// Inclusive bounds passed through to the history endpoint. Both `None` means
/// the server's trailing week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
  pub from: Option<NaiveDate>,
  pub to:   Option<NaiveDate>,
}

impl DateRange {
  /// Parse `2024-01-01..2024-01-31`, `2024-01-01..`, `..2024-01-31`, a single
  /// date (both bounds), or an empty string (no bounds).
  pub fn parse(raw: &str) -> Result<Self, String> {
    let raw = raw.trim();
    let bound = |s: &str| -> Result<Option<NaiveDate>, String> {
      let s = s.trim();
      if s.is_empty() {
        return Ok(None);
      }
      NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| format!("invalid date {s:?}, expected YYYY-MM-DD"))
    };

    match raw.split_once("..") {
      Some((from, to)) => Ok(Self { from: bound(from)?, to: bound(to)? }),
      None => {
        let day = bound(raw)?;
        Ok(Self { from: day, to: day })
      }
    }
  }

  pub fn label(&self) -> String {
    match (self.from, self.to) {
      (None, None) => "last 7 days".into(),
      (Some(f), Some(t)) if f == t => f.to_string(),
      (f, t) => format!(
        "{}..{}",
        f.map(|d| d.to_string()).unwrap_or_default(),
        t.map(|d| d.to_string()).unwrap_or_default()
      ),
    }
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub mode: InputMode,

  /// Text being edited in `Tickers` or `Dates` mode.
  pub input: String,

  /// Applied ticker filter, as typed. Empty means all tickers.
  pub tickers: String,

  /// Applied date bounds.
  pub range: DateRange,

  /// Rows behind the rank chart.
  pub history: Vec<HistoryRow>,

  /// Rows behind the leaderboard.
  pub leaderboard: Vec<LatestRankRow>,

  /// Selected leaderboard row.
  pub cursor: usize,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  pub client: ApiClient,
}

impl App {
  pub fn new(client: ApiClient) -> Self {
    Self {
      mode: InputMode::Normal,
      input: String::new(),
      tickers: String::new(),
      range: DateRange::default(),
      history: Vec::new(),
      leaderboard: Vec::new(),
      cursor: 0,
      status_msg: String::new(),
      client,
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Refetch both views. Failures land in `status_msg`; the previous data is
  /// kept on screen.
  pub async fn reload(&mut self) {
    self.status_msg = "Loading…".into();

    let history = self.client.history(&self.tickers, self.range.from, self.range.to);
    let today = self.client.today();
    match tokio::try_join!(history, today) {
      Ok((history, leaderboard)) => {
        self.history = history;
        self.leaderboard = leaderboard;
        self.cursor = self.cursor.min(self.leaderboard.len().saturating_sub(1));
        self.status_msg = if self.history.is_empty() && self.leaderboard.is_empty() {
          "No data. Run caprank-seed to populate the store.".into()
        } else {
          String::new()
        };
      }
      Err(e) => self.status_msg = format!("Error: {e:#}"),
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    match self.mode {
      InputMode::Normal => self.handle_normal_key(key).await,
      InputMode::Tickers | InputMode::Dates => {
        self.handle_input_key(key).await;
        true
      }
    }
  }

  async fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => return false,

      KeyCode::Char('r') => self.reload().await,

      KeyCode::Char('/') => {
        self.mode = InputMode::Tickers;
        self.input = self.tickers.clone();
      }
      KeyCode::Char('d') => {
        self.mode = InputMode::Dates;
        self.input.clear();
      }

      KeyCode::Down | KeyCode::Char('j') => {
        if self.cursor + 1 < self.leaderboard.len() {
          self.cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.cursor = self.cursor.saturating_sub(1);
      }

      _ => {}
    }
    true
  }

  async fn handle_input_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.mode = InputMode::Normal;
        self.input.clear();
      }
      KeyCode::Enter => {
        let input = std::mem::take(&mut self.input);
        let mode = std::mem::replace(&mut self.mode, InputMode::Normal);
        if self.apply_input(mode, &input) {
          self.reload().await;
        }
      }
      KeyCode::Backspace => {
        self.input.pop();
      }
      KeyCode::Char(c) => self.input.push(c),
      _ => {}
    }
  }

  /// Commit typed input to the filter state. Returns whether a reload is due.
  fn apply_input(&mut self, mode: InputMode, input: &str) -> bool {
    match mode {
      InputMode::Tickers => {
        self.tickers = input.trim().to_owned();
        true
      }
      InputMode::Dates => match DateRange::parse(input) {
        Ok(range) => {
          self.range = range;
          true
        }
        Err(e) => {
          self.status_msg = format!("Error: {e}");
          false
        }
      },
      InputMode::Normal => false,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn d(y: i32, m: u32, day: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, day).unwrap() }

  #[test]
  fn range_parses_open_and_closed_forms() {
    assert_eq!(DateRange::parse("").unwrap(), DateRange::default());
    assert_eq!(DateRange::parse("2024-01-01..2024-01-31").unwrap(), DateRange {
      from: Some(d(2024, 1, 1)),
      to:   Some(d(2024, 1, 31)),
    });
    assert_eq!(DateRange::parse(" 2024-01-01.. ").unwrap(), DateRange {
      from: Some(d(2024, 1, 1)),
      to:   None,
    });
    assert_eq!(DateRange::parse("..2024-01-31").unwrap(), DateRange {
      from: None,
      to:   Some(d(2024, 1, 31)),
    });
  }

  #[test]
  fn single_date_sets_both_bounds() {
    let range = DateRange::parse("2024-02-29").unwrap();
    assert_eq!(range.from, Some(d(2024, 2, 29)));
    assert_eq!(range.to, Some(d(2024, 2, 29)));
    assert_eq!(range.label(), "2024-02-29");
  }

  #[test]
  fn bad_range_is_reported_not_applied() {
    let mut app = App::new(ApiClient::new("http://127.0.0.1:1").unwrap());
    app.range = DateRange::parse("2024-01-01..").unwrap();

    assert!(!app.apply_input(InputMode::Dates, "2024-13-01"));
    assert_eq!(app.range.from, Some(d(2024, 1, 1)));
    assert!(app.status_msg.contains("2024-13-01"));
  }

  #[test]
  fn ticker_input_is_applied_verbatim() {
    let mut app = App::new(ApiClient::new("http://127.0.0.1:1").unwrap());
    assert!(app.apply_input(InputMode::Tickers, " aapl,msft "));
    assert_eq!(app.tickers, "aapl,msft");
  }

  #[test]
  fn labels_describe_the_window() {
    assert_eq!(DateRange::default().label(), "last 7 days");
    assert_eq!(DateRange::parse("..2024-01-31").unwrap().label(), "..2024-01-31");
  }
}

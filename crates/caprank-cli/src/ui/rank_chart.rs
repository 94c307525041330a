//! Rank-over-time chart, left pane.
//!
//! Ranks are plotted on an inverted axis so rank 1 sits at the top: a row
//! with rank `r` is drawn at `y = max_rank + 1 - r`.

use std::collections::BTreeSet;

use caprank_core::market_cap::HistoryRow;
use chrono::NaiveDate;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Style},
  symbols::Marker,
  text::Span,
  widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};

use super::PALETTE;
use crate::app::App;

/// One ticker's points, in date order.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
  pub ticker: String,
  pub points: Vec<(f64, f64)>,
}

/// History rows reshaped for plotting.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RankSeries {
  /// Distinct dates on the x axis; point `x` values index into this.
  pub dates:    Vec<NaiveDate>,
  pub max_rank: u32,
  /// Series in first-seen ticker order.
  pub series:   Vec<Series>,
}

impl RankSeries {
  pub fn from_rows(rows: &[HistoryRow]) -> Self {
    let dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect::<BTreeSet<_>>().into_iter().collect();
    let max_rank = rows.iter().map(|r| r.rank).max().unwrap_or(0);

    let mut series: Vec<Series> = Vec::new();
    for row in rows {
      let Ok(x) = dates.binary_search(&row.date) else { continue };
      let point = (x as f64, f64::from(max_rank + 1 - row.rank));
      match series.iter_mut().find(|s| s.ticker == row.ticker.as_str()) {
        Some(s) => s.points.push(point),
        None => series.push(Series { ticker: row.ticker.to_string(), points: vec![point] }),
      }
    }

    Self { dates, max_rank, series }
  }

  /// Y axis bounds. With two or more ranks the ends sit exactly on `#max_rank`
  /// and `#1`, so evenly spread labels line up with the plotted points.
  pub fn y_bounds(&self) -> [f64; 2] {
    if self.max_rank < 2 { [0.0, 1.0] } else { [1.0, f64::from(self.max_rank)] }
  }

  /// `#1` at the top down to `#max_rank` at the bottom, listed bottom-up.
  ///
  /// Always at least two entries: ratatui spaces axis labels by
  /// `len - 1`.
  pub fn y_labels(&self) -> Vec<String> {
    if self.max_rank < 2 {
      return vec![String::new(), "#1".to_owned()];
    }
    (1..=self.max_rank).rev().map(|r| format!("#{r}")).collect()
  }

  /// First, middle and last dates as `MM-DD`. Never a single entry.
  pub fn x_labels(&self) -> Vec<String> {
    let fmt = |d: &NaiveDate| d.format("%m-%d").to_string();
    match self.dates.as_slice() {
      [] => Vec::new(),
      [only] => vec![fmt(only), String::new()],
      [first, last] => vec![fmt(first), fmt(last)],
      all => vec![fmt(&all[0]), fmt(&all[all.len() / 2]), fmt(&all[all.len() - 1])],
    }
  }
}

/// Render the chart into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(format!(" Rank over time ({}) ", app.range.label()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let data = RankSeries::from_rows(&app.history);
  if data.series.is_empty() {
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
      Paragraph::new("No data for this selection.").style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }

  let datasets: Vec<Dataset> = data
    .series
    .iter()
    .enumerate()
    .map(|(i, s)| {
      Dataset::default()
        .name(s.ticker.clone())
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(PALETTE[i % PALETTE.len()]))
        .data(&s.points)
    })
    .collect();

  let x_max = data.dates.len().saturating_sub(1).max(1) as f64;
  let chart = Chart::new(datasets)
    .block(block)
    .x_axis(
      Axis::default()
        .style(Style::default().fg(Color::DarkGray))
        .bounds([0.0, x_max])
        .labels(data.x_labels().into_iter().map(Span::raw)),
    )
    .y_axis(
      Axis::default()
        .style(Style::default().fg(Color::DarkGray))
        .bounds(data.y_bounds())
        .labels(data.y_labels().into_iter().map(Span::raw)),
    );
  f.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
  use super::*;

  use caprank_core::ticker::Ticker;
  use ratatui::{Terminal, backend::TestBackend};

  use crate::client::ApiClient;

  fn row(ticker: &str, day: u32, rank: u32) -> HistoryRow {
    HistoryRow {
      ticker:     Ticker::parse(ticker).unwrap(),
      name:       ticker.to_owned(),
      date:       NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
      market_cap: 1.0,
      rank,
    }
  }

  #[test]
  fn rank_one_plots_highest() {
    let data = RankSeries::from_rows(&[
      row("AAPL", 1, 1),
      row("MSFT", 1, 2),
      row("AAPL", 2, 2),
      row("MSFT", 2, 1),
    ]);

    assert_eq!(data.max_rank, 2);
    assert_eq!(data.series, vec![
      Series { ticker: "AAPL".into(), points: vec![(0.0, 2.0), (1.0, 1.0)] },
      Series { ticker: "MSFT".into(), points: vec![(0.0, 1.0), (1.0, 2.0)] },
    ]);
  }

  #[test]
  fn gaps_skip_missing_dates() {
    let data = RankSeries::from_rows(&[row("AAPL", 1, 1), row("MSFT", 1, 2), row("AAPL", 3, 1)]);
    assert_eq!(data.dates.len(), 2);
    assert_eq!(data.series[1].points, vec![(0.0, 1.0)]);
    assert_eq!(data.series[0].points, vec![(0.0, 2.0), (1.0, 2.0)]);
  }

  #[test]
  fn labels_run_from_bottom_rank_to_top() {
    let data = RankSeries::from_rows(&[row("AAPL", 1, 1), row("MSFT", 1, 2), row("AMZN", 5, 3)]);
    assert_eq!(data.y_labels(), ["#3", "#2", "#1"]);
    assert_eq!(data.x_labels(), ["01-01", "01-05"]);
  }

  #[test]
  fn single_rank_still_has_two_labels() {
    let data = RankSeries::from_rows(&[row("AAPL", 1, 1)]);
    assert_eq!(data.y_labels(), ["", "#1"]);
    assert_eq!(data.x_labels(), ["01-01", ""]);
    assert_eq!(data.y_bounds(), [0.0, 1.0]);
    assert_eq!(data.series[0].points, vec![(0.0, 1.0)]);
  }

  #[test]
  fn bounds_end_on_first_and_last_rank() {
    let data = RankSeries::from_rows(&[
      row("AAPL", 1, 1),
      row("MSFT", 1, 2),
      row("AMZN", 1, 3),
      row("GOOG", 1, 4),
    ]);
    assert_eq!(data.y_bounds(), [1.0, 4.0]);
    let ys: Vec<f64> = data.series.iter().map(|s| s.points[0].1).collect();
    assert_eq!(ys, [4.0, 3.0, 2.0, 1.0]);
  }

  fn render(history: Vec<HistoryRow>) -> String {
    let mut app = App::new(ApiClient::new("http://127.0.0.1:1").unwrap());
    app.history = history;

    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal.draw(|f| crate::ui::draw(f, &app)).unwrap();
    terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
  }

  #[test]
  fn one_ticker_history_renders() {
    let screen = render(vec![row("AAPL", 1, 1), row("AAPL", 2, 1), row("AAPL", 3, 1)]);
    assert!(screen.contains("Rank over time"));
    assert!(screen.contains("#1"));
  }

  #[test]
  fn one_row_history_renders() {
    let screen = render(vec![row("AAPL", 1, 1)]);
    assert!(screen.contains("#1"));
  }

  #[test]
  fn multi_rank_history_renders_every_label() {
    let screen = render(vec![
      row("AAPL", 1, 1),
      row("MSFT", 1, 2),
      row("AMZN", 1, 3),
      row("AAPL", 2, 2),
      row("MSFT", 2, 1),
      row("AMZN", 2, 3),
    ]);
    for label in ["#1", "#2", "#3"] {
      assert!(screen.contains(label), "missing {label}");
    }
  }

  #[test]
  fn empty_history_has_no_series() {
    let data = RankSeries::from_rows(&[]);
    assert_eq!(data, RankSeries::default());
    assert!(data.x_labels().is_empty());
  }
}

//! Latest-date leaderboard, right pane.

use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::app::App;

/// Format a dollar amount with a magnitude suffix, e.g. `$2.9T`, `$512.0B`.
pub fn compact_currency(value: f64) -> String {
  const UNITS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

  let sign = if value < 0.0 { "-" } else { "" };
  let abs = value.abs();
  for (scale, suffix) in UNITS {
    if abs >= scale {
      return format!("{sign}${:.1}{suffix}", abs / scale);
    }
  }
  format!("{sign}${abs:.0}")
}

/// Render the leaderboard into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(format!(" Latest ({}) ", app.leaderboard.len()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  if app.leaderboard.is_empty() {
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
      Paragraph::new("No data yet.").style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }

  let header = Row::new(["#", "Ticker", "Name", "Market cap"])
    .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));

  let rows: Vec<Row> = app
    .leaderboard
    .iter()
    .map(|r| {
      Row::new([
        Cell::from(r.rank.to_string()),
        Cell::from(r.ticker.to_string()),
        Cell::from(r.name.clone()),
        Cell::from(compact_currency(r.market_cap)),
      ])
    })
    .collect();

  let widths = [
    Constraint::Length(3),
    Constraint::Length(7),
    Constraint::Min(10),
    Constraint::Length(10),
  ];

  let mut state = TableState::default();
  state.select(Some(app.cursor));

  f.render_stateful_widget(
    Table::new(rows, widths)
      .header(header)
      .block(block)
      .row_highlight_style(
        Style::default().bg(Color::Blue).fg(Color::White).add_modifier(Modifier::BOLD),
      ),
    area,
    &mut state,
  );
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn suffix_tracks_magnitude() {
    assert_eq!(compact_currency(2.94e12), "$2.9T");
    assert_eq!(compact_currency(512.0e9), "$512.0B");
    assert_eq!(compact_currency(60.0e6), "$60.0M");
    assert_eq!(compact_currency(1500.0), "$1.5K");
    assert_eq!(compact_currency(999.0), "$999");
  }

  #[test]
  fn negative_values_keep_sign() {
    assert_eq!(compact_currency(-2.5e9), "-$2.5B");
  }
}

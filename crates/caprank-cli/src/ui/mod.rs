//! TUI rendering entry point.

pub mod leaderboard;
pub mod rank_chart;

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::{App, InputMode};

/// Series colours, assigned in first-seen order.
pub const PALETTE: [Color; 8] = [
  Color::Cyan,
  Color::LightRed,
  Color::LightGreen,
  Color::Yellow,
  Color::LightMagenta,
  Color::LightBlue,
  Color::Red,
  Color::Green,
];

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(f.area());

  draw_header(f, rows[0], app);
  draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let filter = if app.tickers.is_empty() { "all tickers" } else { app.tickers.as_str() };
  let left = Span::styled(
    " caprank  [/] tickers  [d] dates  [r] reload  [q] quit",
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{filter} · {} · {} ", app.range.label(), app.client.base_url()),
    Style::default().fg(Color::Gray),
  );

  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);
  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
    .split(area);

  rank_chart::draw(f, cols[0], app);
  leaderboard::draw(f, cols[1], app);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, text, text_style) = match app.mode {
    InputMode::Tickers => (
      "TICKERS",
      format!("{}_   (comma-separated, Enter apply, Esc cancel)", app.input),
      Style::default().fg(Color::Yellow),
    ),
    InputMode::Dates => (
      "DATES",
      format!("{}_   (YYYY-MM-DD..YYYY-MM-DD, one date, or empty)", app.input),
      Style::default().fg(Color::Yellow),
    ),
    InputMode::Normal if app.status_msg.starts_with("Error") => (
      "NORMAL",
      app.status_msg.clone(),
      Style::default().fg(Color::LightRed),
    ),
    InputMode::Normal if !app.status_msg.is_empty() => (
      "NORMAL",
      app.status_msg.clone(),
      Style::default().fg(Color::Gray),
    ),
    InputMode::Normal => (
      "NORMAL",
      "↑↓/jk select  / tickers  d dates  r reload  q quit".to_owned(),
      Style::default().fg(Color::DarkGray),
    ),
  };

  let line = Line::from(vec![
    Span::styled(
      format!(" {mode_label} "),
      Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
    ),
    Span::styled(format!("  {text}"), text_style),
  ]);
  f.render_widget(Paragraph::new(line).style(Style::default().bg(Color::Black)), area);
}

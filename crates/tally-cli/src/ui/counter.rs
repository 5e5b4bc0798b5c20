//! Counter pane — the current count and the database status indicator.

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, Connection};

/// Render the counter pane into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(" Counter ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // db status
      Constraint::Min(0),    // count
      Constraint::Length(1), // set input
    ])
    .split(inner);

  draw_connection(f, rows[0], app);

  let dim = Style::default().fg(Color::DarkGray);
  let count_line = match (app.count, app.loading) {
    (Some(c), _) => Line::from(vec![
      Span::raw("Current count: "),
      Span::styled(
        c.to_string(),
        Style::default()
          .fg(Color::Yellow)
          .add_modifier(Modifier::BOLD),
      ),
    ]),
    (None, true) => Line::from(Span::styled("Loading…", dim)),
    (None, false) => Line::from(Span::styled("Count unavailable", dim)),
  };
  let centred = Rect {
    y: rows[1].y + rows[1].height / 2,
    height: rows[1].height.min(1),
    ..rows[1]
  };
  f.render_widget(Paragraph::new(count_line).alignment(Alignment::Center), centred);

  if let Some(input) = &app.input {
    f.render_widget(
      Paragraph::new(format!("= {input}_")).style(Style::default().fg(Color::Yellow)),
      rows[2],
    );
  }
}

fn draw_connection(f: &mut Frame, area: Rect, app: &App) {
  let (label, colour) = match app.connection {
    Connection::Unknown => ("Database: checking…", Color::DarkGray),
    Connection::Connected => ("Database: ✓ Connected", Color::Green),
    Connection::Disconnected => ("Database: ✗ Disconnected", Color::Red),
  };
  let mut spans = vec![Span::styled(
    label,
    Style::default().fg(colour).add_modifier(Modifier::BOLD),
  )];
  if let Some(report) = &app.health {
    let checked = report.timestamp.with_timezone(&Local).format("%H:%M:%S");
    spans.push(Span::styled(
      format!("  (checked {checked})"),
      Style::default().fg(Color::DarkGray),
    ));
  }
  f.render_widget(Paragraph::new(Line::from(spans)), area);
}

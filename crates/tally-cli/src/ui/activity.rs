//! Activity pane — the session's recent counter mutations, newest first.

use chrono::Local;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, Paragraph},
};
use tally_core::activity::{ACTIVITY_LIMIT, Action};

use crate::app::App;

/// Render the activity log into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(format!(" Activity ({}/{ACTIVITY_LIMIT}) ", app.activity.len()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  if app.activity.is_empty() {
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
      Paragraph::new(Span::styled(
        "No activity yet.",
        Style::default().fg(Color::DarkGray),
      )),
      inner,
    );
    return;
  }

  let items: Vec<ListItem> = app
    .activity
    .iter()
    .map(|entry| {
      let time = entry.timestamp.with_timezone(&Local).format("%H:%M:%S");
      let colour = match entry.action {
        Action::Increment => Color::Green,
        Action::Decrement => Color::Red,
        Action::Reset => Color::Magenta,
        Action::Update => Color::Cyan,
      };
      ListItem::new(Line::from(vec![
        Span::styled(format!("{time}  "), Style::default().fg(Color::DarkGray)),
        Span::styled(format!("{:<10}", entry.action), Style::default().fg(colour)),
        Span::raw(format!("→ {}", entry.value)),
      ]))
    })
    .collect();

  f.render_widget(List::new(items).block(block), area);
}

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the bottom bar: key hints, or editing hints while the field is focused
pub fn draw_status_bar(frame: &mut Frame, area: Rect, editing: bool) {
  let hints: &[(&str, &str)] = if editing {
    &[("Enter", "search"), ("Esc", "cancel")]
  } else {
    &[
      ("/", "city"),
      ("Enter", "search"),
      ("l", "my location"),
      ("r", "refresh"),
      ("q", "quit"),
    ]
  };

  let mut spans = vec![Span::raw(" ")];
  for (i, (key, label)) in hints.iter().enumerate() {
    if i > 0 {
      spans.push(Span::raw("   "));
    }
    spans.push(Span::styled(
      format!("<{}>", key),
      Style::default().fg(Color::Cyan),
    ));
    spans.push(Span::styled(
      format!(" {}", label),
      Style::default().fg(Color::DarkGray),
    ));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}

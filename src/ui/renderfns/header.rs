use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the header bar with app name, provider host, and lookup state
pub fn draw_header(frame: &mut Frame, area: Rect, base_url: &str, units: &str, loading: bool) {
  let host = extract_host(base_url);

  let mut spans = vec![
    Span::styled(" monsoon ", Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", host), Style::default().fg(Color::White)),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", units), Style::default().fg(Color::Yellow)),
  ];
  if loading {
    spans.push(Span::styled(
      " loading...",
      Style::default().fg(Color::Yellow).italic(),
    ));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}

/// Extract host from the provider base URL
fn extract_host(url: &str) -> &str {
  url
    .strip_prefix("https://")
    .or_else(|| url.strip_prefix("http://"))
    .unwrap_or(url)
    .split('/')
    .next()
    .unwrap_or(url)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_extract_host() {
    assert_eq!(
      extract_host("https://api.openweathermap.org/data/2.5"),
      "api.openweathermap.org"
    );
    assert_eq!(extract_host("http://127.0.0.1:8080"), "127.0.0.1:8080");
  }
}

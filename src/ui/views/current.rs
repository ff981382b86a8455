use crate::display::CurrentPanel;
use crate::ui::renderfns::{icon_glyph, temperature_color};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

/// Draw the current-conditions region
pub fn draw_current(frame: &mut Frame, area: Rect, panel: &CurrentPanel) {
  let block = Block::default()
    .title(format!(" {} ", panel.location))
    .title_alignment(Alignment::Center)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  let inner = block.inner(area);
  frame.render_widget(block, area);

  let chunks = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
    .split(inner);

  let summary = vec![
    Line::from(vec![
      Span::styled(
        format!("{} ", icon_glyph(panel.icon.as_deref())),
        Style::default().fg(Color::Yellow),
      ),
      Span::styled(
        panel.temperature.clone(),
        Style::default()
          .fg(temperature_color(&panel.temperature))
          .bold(),
      ),
    ]),
    Line::from(Span::raw(panel.description.clone())),
    Line::from(Span::styled(
      panel.icon_url.clone().unwrap_or_default(),
      Style::default().fg(Color::DarkGray),
    )),
  ];
  frame.render_widget(Paragraph::new(summary), chunks[0]);

  let details = vec![
    detail_line("Feels like", &panel.feels_like),
    detail_line("Humidity", &panel.humidity),
    detail_line("Wind", &panel.wind),
    detail_line("Pressure", &panel.pressure),
  ];
  frame.render_widget(Paragraph::new(details), chunks[1]);
}

fn detail_line<'a>(label: &'a str, value: &'a str) -> Line<'a> {
  Line::from(vec![
    Span::styled(format!("{:<12}", label), Style::default().fg(Color::DarkGray)),
    Span::raw(value),
  ])
}

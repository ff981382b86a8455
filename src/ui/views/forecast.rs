use crate::display::ForecastCard;
use crate::ui::renderfns::{icon_glyph, temperature_color, truncate};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

/// Draw the forecast region: one column per day, or a note
pub fn draw_forecast(frame: &mut Frame, area: Rect, cards: &[ForecastCard], note: Option<&str>) {
  let block = Block::default()
    .title(" 5-day forecast ")
    .title_alignment(Alignment::Center)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if cards.is_empty() {
    let paragraph = Paragraph::new(note.unwrap_or("No forecast yet."))
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let inner = block.inner(area);
  frame.render_widget(block, area);

  let constraints = vec![Constraint::Ratio(1, cards.len() as u32); cards.len()];
  let columns = Layout::default()
    .direction(Direction::Horizontal)
    .constraints(constraints)
    .split(inner);

  for (card, column) in cards.iter().zip(columns.iter()) {
    draw_card(frame, *column, card);
  }
}

fn draw_card(frame: &mut Frame, area: Rect, card: &ForecastCard) {
  let width = area.width.saturating_sub(1) as usize;
  let lines = vec![
    Line::from(Span::styled(
      card.heading.clone(),
      Style::default().fg(Color::Cyan).bold(),
    )),
    Line::from(Span::styled(
      icon_glyph(card.icon.as_deref()),
      Style::default().fg(Color::Yellow),
    )),
    Line::from(Span::raw(truncate(&card.description, width))),
    Line::from(vec![
      Span::styled(
        card.max.clone(),
        Style::default().fg(temperature_color(&card.max)).bold(),
      ),
      Span::raw(" "),
      Span::styled(card.min.clone(), Style::default().fg(Color::DarkGray)),
    ]),
  ];

  frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

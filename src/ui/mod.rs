pub mod components;
pub mod renderfns;
mod views;

use crate::app::{App, Phase};
use ratatui::prelude::*;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Length(3), // City field
      Constraint::Length(7), // Current conditions
      Constraint::Min(6),    // Forecast
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  let provider = &app.config().provider;
  renderfns::draw_header(
    frame,
    chunks[0],
    &provider.base_url,
    &provider.units,
    app.phase() == Phase::Loading,
  );

  app.search().render(frame, chunks[1]);

  let display = app.display();
  views::draw_current(frame, chunks[2], &display.current);
  views::draw_forecast(
    frame,
    chunks[3],
    &display.forecast,
    display.forecast_note.as_deref(),
  );

  // Banner floats over the weather content
  app.banner().render(frame, chunks[2].union(chunks[3]));

  renderfns::draw_status_bar(frame, chunks[4], app.search().is_focused());
}

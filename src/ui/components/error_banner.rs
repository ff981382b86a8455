use ratatui::prelude::*;
use ratatui::widgets::{Clear, Paragraph, Wrap};
use std::time::{Duration, Instant};

/// Transient error notice that hides itself after a fixed delay.
///
/// Showing a new message replaces the text and restarts the delay, so a newer
/// error always stays up for the full duration.
#[derive(Debug, Clone)]
pub struct ErrorBanner {
  message: Option<String>,
  hide_at: Option<Instant>,
  display_for: Duration,
}

impl ErrorBanner {
  pub fn new(display_for: Duration) -> Self {
    Self {
      message: None,
      hide_at: None,
      display_for,
    }
  }

  pub fn show(&mut self, message: impl Into<String>, now: Instant) {
    self.message = Some(message.into());
    self.hide_at = Some(now + self.display_for);
  }

  pub fn clear(&mut self) {
    self.message = None;
    self.hide_at = None;
  }

  /// Hide the banner once its delay has passed.
  pub fn tick(&mut self, now: Instant) {
    if self.hide_at.is_some_and(|at| now >= at) {
      self.clear();
    }
  }

  /// Currently visible message
  pub fn message(&self) -> Option<&str> {
    self.message.as_deref()
  }

  pub fn render(&self, frame: &mut Frame, area: Rect) {
    let Some(message) = self.message() else {
      return;
    };

    let width = area.width.saturating_sub(4).min(72).max(area.width.min(20));
    let banner = Rect::new(
      area.x + (area.width.saturating_sub(width)) / 2,
      area.y + area.height.saturating_sub(2),
      width,
      1.min(area.height),
    );

    frame.render_widget(Clear, banner);
    let paragraph = Paragraph::new(format!(" {} ", message))
      .style(Style::default().fg(Color::White).bg(Color::Red).bold())
      .alignment(Alignment::Center)
      .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, banner);
  }
}

use super::input::{InputResult, TextInput};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

/// What the search field did with a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKey {
  /// Not for the field; try the app shortcuts
  Ignored,
  Consumed,
  /// Search submitted with the raw (untrimmed) field value
  Submitted(String),
}

/// City search field.
///
/// Always visible; keys only reach it while it is focused. The value is kept
/// after submitting so the activation key can resubmit it.
#[derive(Debug, Clone, Default)]
pub struct SearchField {
  input: TextInput,
  focused: bool,
}

impl SearchField {
  pub fn new() -> Self {
    Self {
      input: TextInput::new(),
      focused: false,
    }
  }

  pub fn is_focused(&self) -> bool {
    self.focused
  }

  pub fn value(&self) -> &str {
    self.input.value()
  }

  pub fn focus(&mut self) {
    self.focused = true;
  }

  /// Handle a key event
  /// Call this regardless of focus - it handles focusing too
  pub fn handle_key(&mut self, key: KeyEvent) -> FieldKey {
    if !self.focused {
      if matches!(key.code, KeyCode::Char('/') | KeyCode::Char('s')) {
        self.focus();
        return FieldKey::Consumed;
      }
      return FieldKey::Ignored;
    }

    match self.input.handle_key(key) {
      InputResult::Submitted(value) => {
        self.focused = false;
        FieldKey::Submitted(value)
      }
      InputResult::Cancelled => {
        self.focused = false;
        FieldKey::Consumed
      }
      InputResult::Consumed => FieldKey::Consumed,
      // Focused field swallows everything so shortcuts don't fire mid-typing
      InputResult::NotHandled => FieldKey::Consumed,
    }
  }

  pub fn render(&self, frame: &mut Frame, area: Rect) {
    let border = if self.focused {
      Color::Yellow
    } else {
      Color::DarkGray
    };
    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(border))
      .title(" City ");

    let line = if self.focused {
      let (before, after) = self.input.split_at_cursor();
      Line::from(vec![
        Span::raw(before.to_string()),
        Span::styled("_", Style::default().fg(Color::Yellow)), // Cursor
        Span::raw(after.to_string()),
      ])
    } else if self.input.value().is_empty() {
      Line::from(Span::styled(
        "press / to search a city",
        Style::default().fg(Color::DarkGray),
      ))
    } else {
      Line::from(Span::raw(self.input.value().to_string()))
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
  }
}

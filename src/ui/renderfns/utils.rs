use ratatui::prelude::Color;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Terminal stand-in for a provider icon id such as "10d"
pub fn icon_glyph(icon: Option<&str>) -> &'static str {
  let Some(icon) = icon else {
    return " ";
  };
  match icon.get(..2) {
    Some("01") => "☀",
    Some("02") => "⛅",
    Some("03") | Some("04") => "☁",
    Some("09") | Some("10") => "☂",
    Some("11") => "⚡",
    Some("13") => "❄",
    Some("50") => "≋",
    _ => "?",
  }
}

/// Display color for a rendered temperature like "31°C" or "-4°"
pub fn temperature_color(text: &str) -> Color {
  let value: Option<i64> = text
    .trim_end_matches('C')
    .trim_end_matches('°')
    .parse()
    .ok();
  match value {
    Some(t) if t >= 35 => Color::Red,
    Some(t) if t >= 25 => Color::Yellow,
    Some(t) if t >= 10 => Color::Green,
    Some(_) => Color::Cyan,
    None => Color::DarkGray,
  }
}

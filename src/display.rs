//! The display surface: named regions the lookups write into and the
//! views draw from.

use chrono::TimeZone;

use crate::weather::api_types::CurrentConditions;
use crate::weather::forecast::daily_buckets;
use crate::weather::WeatherReport;

const PLACEHOLDER: &str = "--";

/// Round half up, so -2.5 becomes -2 and 2.5 becomes 3.
pub fn round_temp(value: f64) -> i64 {
  (value + 0.5).floor() as i64
}

/// Current-conditions region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentPanel {
  pub location: String,
  pub temperature: String,
  pub description: String,
  pub icon: Option<String>,
  pub icon_url: Option<String>,
  pub feels_like: String,
  pub humidity: String,
  pub wind: String,
  pub pressure: String,
}

impl CurrentPanel {
  fn placeholder(location: &str) -> Self {
    Self {
      location: location.to_string(),
      temperature: PLACEHOLDER.to_string(),
      description: PLACEHOLDER.to_string(),
      icon: None,
      icon_url: None,
      feels_like: PLACEHOLDER.to_string(),
      humidity: PLACEHOLDER.to_string(),
      wind: PLACEHOLDER.to_string(),
      pressure: PLACEHOLDER.to_string(),
    }
  }
}

/// One day in the forecast region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastCard {
  /// e.g. "Tue, 15 Oct"
  pub heading: String,
  pub icon: Option<String>,
  pub icon_url: Option<String>,
  pub description: String,
  pub max: String,
  pub min: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherDisplay {
  pub current: CurrentPanel,
  pub forecast: Vec<ForecastCard>,
  /// Shown in the forecast region instead of cards
  pub forecast_note: Option<String>,
  pub loading: bool,
  icon_host: String,
  rendered: bool,
}

impl WeatherDisplay {
  pub fn new(icon_host: &str) -> Self {
    Self {
      current: CurrentPanel::placeholder(PLACEHOLDER),
      forecast: Vec::new(),
      forecast_note: None,
      loading: false,
      icon_host: icon_host.trim_end_matches('/').to_string(),
      rendered: false,
    }
  }

  /// Mark a lookup in flight. Previously rendered content stays visible.
  pub fn show_loading(&mut self) {
    self.loading = true;
    if !self.rendered {
      self.current = CurrentPanel::placeholder("Loading...");
      self.forecast.clear();
      self.forecast_note = Some("Loading forecast...".to_string());
    }
  }

  /// Lookup ended without a render.
  pub fn finish_loading(&mut self) {
    self.loading = false;
    if !self.rendered {
      self.current = CurrentPanel::placeholder(PLACEHOLDER);
      self.forecast_note = None;
    }
  }

  /// Write a lookup's results into the surface, replacing earlier content.
  pub fn render<Tz: TimeZone>(&mut self, report: &WeatherReport, tz: &Tz) {
    self.current = match &report.current {
      Some(current) => self.current_panel(current),
      None => {
        let location = report
          .forecast
          .as_ref()
          .and_then(|f| f.city.as_ref())
          .map(|c| format!("{}, {}", c.name, c.country))
          .unwrap_or_else(|| PLACEHOLDER.to_string());
        let mut panel = CurrentPanel::placeholder(&location);
        panel.description = "Current conditions unavailable".to_string();
        panel
      }
    };

    self.forecast.clear();
    self.forecast_note = None;
    match &report.forecast {
      Some(forecast) => {
        for bucket in daily_buckets(&forecast.list, tz) {
          let (icon, description) = match &bucket.weather {
            Some(w) => (Some(w.icon.clone()), w.description.clone()),
            None => (None, PLACEHOLDER.to_string()),
          };
          self.forecast.push(ForecastCard {
            heading: bucket.date.format("%a, %-d %b").to_string(),
            icon_url: icon.as_ref().map(|i| format!("{}/{}.png", self.icon_host, i)),
            icon,
            description,
            max: degrees(bucket.max_temp()),
            min: degrees(bucket.min_temp()),
          });
        }
        if self.forecast.is_empty() {
          self.forecast_note = Some("No forecast data".to_string());
        }
      }
      None => self.forecast_note = Some("Forecast unavailable".to_string()),
    }

    self.loading = false;
    self.rendered = true;
  }

  fn current_panel(&self, current: &CurrentConditions) -> CurrentPanel {
    let condition = current.condition();
    CurrentPanel {
      location: format!("{}, {}", current.name, current.sys.country),
      temperature: format!("{}°C", round_temp(current.main.temp)),
      description: condition
        .map(|c| c.description.clone())
        .unwrap_or_else(|| PLACEHOLDER.to_string()),
      icon: condition.map(|c| c.icon.clone()),
      icon_url: condition.map(|c| format!("{}/{}@2x.png", self.icon_host, c.icon)),
      feels_like: format!("{}°C", round_temp(current.main.feels_like)),
      humidity: format!("{}%", current.main.humidity),
      wind: format!("{} m/s", current.wind.speed),
      pressure: format!("{} hPa", current.main.pressure),
    }
  }
}

fn degrees(value: Option<f64>) -> String {
  value
    .map(|v| format!("{}°", round_temp(v)))
    .unwrap_or_else(|| PLACEHOLDER.to_string())
}

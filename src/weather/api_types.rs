//! Serde-deserializable types matching OpenWeatherMap responses.
//!
//! Only the fields the display uses are modelled; everything else in the
//! payload is ignored.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::error::WeatherError;

/// Convert a cached JSON body into a typed response.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, WeatherError> {
  serde_json::from_value(value)
    .map_err(|e| WeatherError::Network(format!("unexpected response shape: {}", e)))
}

// ============================================================================
// Shared nested types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Condition {
  pub id: u32,
  #[serde(default)]
  pub main: String,
  pub description: String,
  pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MainReadings {
  pub temp: f64,
  #[serde(default)]
  pub feels_like: f64,
  #[serde(default)]
  pub humidity: u32,
  #[serde(default)]
  pub pressure: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Wind {
  pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Sys {
  #[serde(default)]
  pub country: String,
}

// ============================================================================
// /weather
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentConditions {
  pub name: String,
  pub sys: Sys,
  pub main: MainReadings,
  pub wind: Wind,
  pub weather: Vec<Condition>,
}

impl CurrentConditions {
  /// The provider lists conditions most-significant first.
  pub fn condition(&self) -> Option<&Condition> {
    self.weather.first()
  }
}

// ============================================================================
// /forecast
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastEntry {
  /// Unix seconds
  pub dt: i64,
  pub main: MainReadings,
  pub weather: Vec<Condition>,
  #[serde(default)]
  pub dt_txt: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastCity {
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub country: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Forecast {
  pub list: Vec<ForecastEntry>,
  /// Names the place when current conditions are missing
  pub city: Option<ForecastCity>,
}

/// Error body returned with non-success statuses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
  pub message: Option<String>,
}

use thiserror::Error;

/// Every way a weather lookup can fail.
///
/// The `Display` text is what the error banner shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
  /// Rejected before or after the network round trip (bad input, geolocation, region)
  #[error("{0}")]
  Validation(String),

  /// Non-success status with a JSON error body
  #[error("{message}")]
  Provider { status: u16, message: String },

  /// Transport failure or malformed body
  #[error("Weather data unavailable: {0}")]
  Network(String),
}

impl From<reqwest::Error> for WeatherError {
  fn from(e: reqwest::Error) -> Self {
    WeatherError::Network(e.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_provider_error_shows_message_verbatim() {
    let err = WeatherError::Provider {
      status: 404,
      message: "city not found".to_string(),
    };
    assert_eq!(err.to_string(), "city not found");
  }

  #[test]
  fn test_network_error_is_wrapped() {
    let err = WeatherError::Network("connection refused".to_string());
    assert_eq!(err.to_string(), "Weather data unavailable: connection refused");
  }
}

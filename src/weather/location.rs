//! Device location lookup.

use serde::Deserialize;
use tracing::{debug, warn};

use super::error::WeatherError;
use crate::config::{LocationConfig, LocationSource};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
  pub latitude: f64,
  pub longitude: f64,
}

/// Where device coordinates come from.
#[derive(Debug, Clone, PartialEq)]
pub enum Geolocator {
  /// IP geolocation endpoint answering `{status, lat, lon, message}`
  Ip { url: String },
  /// Coordinates supplied by config or command line
  Fixed(Coordinates),
  /// No location capability on this system
  Unsupported,
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
  status: String,
  lat: Option<f64>,
  lon: Option<f64>,
  message: Option<String>,
}

impl Geolocator {
  pub fn from_config(config: &LocationConfig) -> Self {
    match (config.source, config.latitude, config.longitude) {
      (LocationSource::Fixed, Some(latitude), Some(longitude)) => Geolocator::Fixed(Coordinates {
        latitude,
        longitude,
      }),
      (LocationSource::Ip, _, _) => Geolocator::Ip {
        url: config.ip_lookup_url.clone(),
      },
      _ => Geolocator::Unsupported,
    }
  }

  /// Resolve the current coordinates.
  ///
  /// Failures are validation errors: they are reported to the user without
  /// starting a weather lookup.
  pub async fn locate(&self, http: &reqwest::Client) -> Result<Coordinates, WeatherError> {
    match self {
      Geolocator::Fixed(coords) => Ok(*coords),
      Geolocator::Unsupported => Err(WeatherError::Validation(
        "Geolocation is not supported on this system".to_string(),
      )),
      Geolocator::Ip { url } => {
        debug!(%url, "resolving location from IP");
        Self::locate_by_ip(http, url).await.map_err(|reason| {
          warn!(%reason, "geolocation failed");
          WeatherError::Validation(format!("Geolocation error: {}", reason))
        })
      }
    }
  }

  async fn locate_by_ip(http: &reqwest::Client, url: &str) -> Result<Coordinates, String> {
    let response = http.get(url).send().await.map_err(|e| e.to_string())?;
    let body = response.bytes().await.map_err(|e| e.to_string())?;
    let parsed: IpLookupResponse = serde_json::from_slice(&body).map_err(|e| e.to_string())?;

    match (parsed.status.as_str(), parsed.lat, parsed.lon) {
      ("success", Some(latitude), Some(longitude)) => Ok(Coordinates {
        latitude,
        longitude,
      }),
      _ => Err(
        parsed
          .message
          .unwrap_or_else(|| "location unavailable".to_string()),
      ),
    }
  }
}

//! OpenWeatherMap client with response caching and request spacing.

use color_eyre::{eyre::eyre, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::api_types::{decode, ApiErrorBody, CurrentConditions, Forecast};
use super::cache::ResponseCache;
use super::error::WeatherError;
use super::location::Coordinates;
use super::throttle::Throttle;
use crate::config::Config;

const GENERIC_PROVIDER_MESSAGE: &str = "API request failed";

/// Provider endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
  Current,
  Forecast,
}

impl Endpoint {
  fn path(self) -> &'static str {
    match self {
      Endpoint::Current => "weather",
      Endpoint::Forecast => "forecast",
    }
  }
}

/// What a lookup is for
#[derive(Debug, Clone, PartialEq)]
pub enum Place {
  City { city: String, country: String },
  Coords(Coordinates),
}

/// Everything one lookup produced.
///
/// City searches may come back partial; coordinate lookups always fill both.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
  pub current: Option<CurrentConditions>,
  pub forecast: Option<Forecast>,
}

/// Weather API client.
///
/// Owns the response cache and the request throttle; clones share both, so
/// construct it once and hand clones to lookup tasks.
#[derive(Clone)]
pub struct WeatherClient {
  http: reqwest::Client,
  base_url: String,
  api_key: String,
  units: String,
  expected_country: String,
  cache: Arc<Mutex<ResponseCache>>,
  throttle: Arc<Throttle>,
  /// One lock per URL with a fetch in progress
  in_flight: Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>,
}

impl WeatherClient {
  pub fn new(config: &Config, api_key: String) -> Result<Self> {
    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.provider.request_timeout_secs))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    let cache = ResponseCache::new(
      config.cache.ttl(),
      config.cache.max_entries,
      config.cache.evict_after_multiple,
    );

    Ok(Self {
      http,
      base_url: config.provider.base_url.trim_end_matches('/').to_string(),
      api_key,
      units: config.provider.units.clone(),
      expected_country: config.expected_country.clone(),
      cache: Arc::new(Mutex::new(cache)),
      throttle: Arc::new(Throttle::new(config.cache.min_interval())),
      in_flight: Arc::new(Mutex::new(HashMap::new())),
    })
  }

  /// Shared HTTP client, also used for geolocation
  pub fn http(&self) -> &reqwest::Client {
    &self.http
  }

  /// Build the fully-qualified request URL for an endpoint and place.
  pub fn url(&self, endpoint: Endpoint, place: &Place) -> String {
    let selector = match place {
      Place::City { city, country } => format!("q={},{}", urlencoding::encode(city), country),
      Place::Coords(c) => format!("lat={}&lon={}", c.latitude, c.longitude),
    };
    format!(
      "{}/{}?{}&units={}&appid={}",
      self.base_url,
      endpoint.path(),
      selector,
      self.units,
      self.api_key
    )
  }

  fn cached(&self, url: &str) -> Option<Value> {
    let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
    cache.get_fresh(url, Instant::now())
  }

  fn store(&self, url: &str, body: Value) {
    let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
    cache.insert(url, body, Instant::now());
  }

  fn url_lock(&self, url: &str) -> Arc<tokio::sync::Mutex<()>> {
    let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
    in_flight.entry(url.to_string()).or_default().clone()
  }

  fn release_url_lock(&self, url: &str, lock: Arc<tokio::sync::Mutex<()>>) {
    let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
    // Map and caller hold the only references: nobody else is waiting
    if Arc::strong_count(&lock) == 2 {
      in_flight.remove(url);
    }
  }

  /// Resolve a provider URL to its JSON body.
  ///
  /// Fresh cache entries are returned without touching the network or the
  /// throttle. Misses wait for the throttle, then fetch and cache. Overlapping
  /// resolves of one URL share a single fetch.
  pub async fn resolve(&self, url: &str) -> Result<Value, WeatherError> {
    let target = loggable(url);

    if let Some(body) = self.cached(url) {
      debug!(url = %target, "cache hit");
      return Ok(body);
    }

    let lock = self.url_lock(url);
    let result = {
      let _guard = lock.lock().await;
      match self.cached(url) {
        Some(body) => {
          debug!(url = %target, "cache hit after waiting on in-flight fetch");
          Ok(body)
        }
        None => self.fetch_and_store(url, target).await,
      }
    };
    self.release_url_lock(url, lock);
    result
  }

  async fn fetch_and_store(&self, url: &str, target: &str) -> Result<Value, WeatherError> {
    debug!(url = %target, "cache miss");
    self.throttle.acquire().await;

    let response = self.http.get(url).send().await.map_err(|e| {
      error!(url = %target, error = %e, "request failed");
      WeatherError::from(e)
    })?;
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
      let parsed: ApiErrorBody = serde_json::from_slice(&body).map_err(|e| {
        error!(url = %target, %status, error = %e, "unreadable error body");
        WeatherError::Network(e.to_string())
      })?;
      let message = parsed
        .message
        .unwrap_or_else(|| GENERIC_PROVIDER_MESSAGE.to_string());
      error!(url = %target, %status, %message, "provider error");
      return Err(WeatherError::Provider {
        status: status.as_u16(),
        message,
      });
    }

    let value: Value = serde_json::from_slice(&body).map_err(|e| {
      error!(url = %target, error = %e, "malformed response body");
      WeatherError::Network(e.to_string())
    })?;

    self.store(url, value.clone());
    Ok(value)
  }

  async fn resolve_as<T: DeserializeOwned>(&self, url: &str) -> Result<T, WeatherError> {
    decode(self.resolve(url).await?)
  }

  /// Current conditions and forecast for a city.
  ///
  /// Each half fails softly; the lookup only fails when both do, and then
  /// reports the current-conditions error.
  pub async fn fetch_weather(&self, city: &str, country: &str) -> Result<WeatherReport, WeatherError> {
    let place = Place::City {
      city: city.to_string(),
      country: country.to_string(),
    };
    info!(city, country, "looking up weather");

    let current_url = self.url(Endpoint::Current, &place);
    let forecast_url = self.url(Endpoint::Forecast, &place);

    let (current, forecast) = futures::join!(
      self.resolve_as::<CurrentConditions>(&current_url),
      self.resolve_as::<Forecast>(&forecast_url)
    );

    match (current, forecast) {
      (Err(e), Err(forecast_err)) => {
        warn!(error = %forecast_err, "forecast unavailable");
        Err(e)
      }
      (current, forecast) => Ok(WeatherReport {
        current: current
          .map_err(|e| warn!(error = %e, "current conditions unavailable"))
          .ok(),
        forecast: forecast
          .map_err(|e| warn!(error = %e, "forecast unavailable"))
          .ok(),
      }),
    }
  }

  /// Current conditions and forecast for coordinates.
  ///
  /// Either failure fails the lookup, and the location must resolve to the
  /// expected country.
  pub async fn fetch_weather_by_coords(
    &self,
    coords: Coordinates,
  ) -> Result<WeatherReport, WeatherError> {
    let place = Place::Coords(coords);
    info!(lat = coords.latitude, lon = coords.longitude, "looking up weather");

    let current_url = self.url(Endpoint::Current, &place);
    let forecast_url = self.url(Endpoint::Forecast, &place);

    let (current, forecast) = futures::try_join!(
      self.resolve_as::<CurrentConditions>(&current_url),
      self.resolve_as::<Forecast>(&forecast_url)
    )?;

    if current.sys.country != self.expected_country {
      warn!(country = %current.sys.country, "location outside supported country");
      return Err(WeatherError::Validation(format!(
        "Please use this feature within {}",
        self.expected_country
      )));
    }

    Ok(WeatherReport {
      current: Some(current),
      forecast: Some(forecast),
    })
  }

  /// Run a lookup for either kind of place.
  pub async fn fetch(&self, place: &Place) -> Result<WeatherReport, WeatherError> {
    match place {
      Place::City { city, country } => self.fetch_weather(city, country).await,
      Place::Coords(coords) => self.fetch_weather_by_coords(*coords).await,
    }
  }
}

/// URL without the credential, for logs.
fn loggable(url: &str) -> &str {
  url.split("&appid=").next().unwrap_or(url)
}

use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
  pub provider: ProviderConfig,
  /// City looked up on start
  pub default_city: String,
  /// Country code appended to every city search
  pub default_country: String,
  /// Country that coordinate lookups must resolve to
  pub expected_country: String,
  pub cache: CacheConfig,
  /// How long the error banner stays visible
  pub error_display_ms: u64,
  pub location: LocationConfig,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      provider: ProviderConfig::default(),
      default_city: "Delhi".to_string(),
      default_country: "IN".to_string(),
      expected_country: "IN".to_string(),
      cache: CacheConfig::default(),
      error_display_ms: 5000,
      location: LocationConfig::default(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
  pub base_url: String,
  /// Units selector passed to the provider (metric, imperial, standard)
  pub units: String,
  /// Image host used to build icon references
  pub icon_host: String,
  pub request_timeout_secs: u64,
  /// Fallback when no API key is set in the environment
  pub api_key: Option<String>,
}

impl Default for ProviderConfig {
  fn default() -> Self {
    Self {
      base_url: "https://api.openweathermap.org/data/2.5".to_string(),
      units: "metric".to_string(),
      icon_host: "https://openweathermap.org/img/wn".to_string(),
      request_timeout_secs: 10,
      api_key: None,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
  /// How long a cached response is served without refetching
  pub ttl_secs: u64,
  /// Minimum spacing between any two dispatched requests
  pub min_interval_ms: u64,
  /// Upper bound on cached responses
  pub max_entries: usize,
  /// Entries older than ttl * this are dropped on every write
  pub evict_after_multiple: u32,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      ttl_secs: 600,
      min_interval_ms: 1000,
      max_entries: 64,
      evict_after_multiple: 6,
    }
  }
}

impl CacheConfig {
  pub fn ttl(&self) -> Duration {
    Duration::from_secs(self.ttl_secs)
  }

  pub fn min_interval(&self) -> Duration {
    Duration::from_millis(self.min_interval_ms)
  }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LocationSource {
  /// Resolve coordinates from the public IP address
  #[default]
  Ip,
  /// Use the configured latitude/longitude
  Fixed,
  /// Geolocation disabled
  None,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
  pub source: LocationSource,
  pub latitude: Option<f64>,
  pub longitude: Option<f64>,
  pub ip_lookup_url: String,
}

impl Default for LocationConfig {
  fn default() -> Self {
    Self {
      source: LocationSource::Ip,
      latitude: None,
      longitude: None,
      ip_lookup_url: "http://ip-api.com/json".to_string(),
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./monsoon.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/monsoon/config.yaml
  ///
  /// Falls back to defaults when no file is found.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Self::default(),
    };
    config.validate()?;
    Ok(config)
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("monsoon.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("monsoon").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
    serde_yaml::from_str(contents)
  }

  fn validate(&self) -> Result<()> {
    url::Url::parse(&self.provider.base_url)
      .map_err(|e| eyre!("Invalid provider.base_url {}: {}", self.provider.base_url, e))?;
    url::Url::parse(&self.provider.icon_host)
      .map_err(|e| eyre!("Invalid provider.icon_host {}: {}", self.provider.icon_host, e))?;

    if self.location.source == LocationSource::Fixed
      && (self.location.latitude.is_none() || self.location.longitude.is_none())
    {
      return Err(eyre!(
        "location.source is fixed but latitude/longitude are not both set"
      ));
    }
    Ok(())
  }

  /// Get the provider API key.
  ///
  /// Checks MONSOON_API_KEY, then OPENWEATHER_API_KEY, then provider.api_key.
  pub fn api_key(&self) -> Result<String> {
    self.api_key_from(|name| std::env::var(name).ok())
  }

  /// Empty values at any source fall through to the next one.
  fn api_key_from(&self, env: impl Fn(&str) -> Option<String>) -> Result<String> {
    ["MONSOON_API_KEY", "OPENWEATHER_API_KEY"]
      .into_iter()
      .map(|name| env(name))
      .chain(std::iter::once(self.provider.api_key.clone()))
      .flatten()
      .find(|k| !k.trim().is_empty())
      .ok_or_else(|| {
        eyre!(
          "Weather API key not found. Set MONSOON_API_KEY or OPENWEATHER_API_KEY, \
           or provider.api_key in the config file."
        )
      })
  }
}

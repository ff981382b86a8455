mod app;
mod config;
mod display;
mod event;
mod logging;
mod lookup;
mod ui;
mod weather;

use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "monsoon")]
#[command(about = "Current weather and a 5-day forecast in your terminal")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/monsoon/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// City looked up on start
  #[arg(long)]
  city: Option<String>,

  /// Latitude used by the location lookup
  #[arg(long, requires = "lon", allow_negative_numbers = true)]
  lat: Option<f64>,

  /// Longitude used by the location lookup
  #[arg(long, requires = "lat", allow_negative_numbers = true)]
  lon: Option<f64>,

  /// Log file (default: $XDG_DATA_HOME/monsoon/monsoon.log)
  #[arg(long)]
  log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let log_path = args
    .log_file
    .clone()
    .or_else(logging::default_log_path)
    .ok_or_else(|| eyre!("No data directory for the log file; pass --log-file"))?;
  let _guard = logging::init(&log_path)?;

  // Load configuration
  let mut config = config::Config::load(args.config.as_deref())?;

  // Command line overrides
  if let Some(city) = args.city {
    config.default_city = city;
  }
  if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
    config.location.source = config::LocationSource::Fixed;
    config.location.latitude = Some(lat);
    config.location.longitude = Some(lon);
  }

  info!(city = %config.default_city, "starting monsoon");

  // Initialize and run the app
  let mut app = app::App::new(config)?;
  app.run().await?;

  Ok(())
}

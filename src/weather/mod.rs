//! Weather provider access: URL building, caching, throttling, and the
//! shapes the provider returns.

pub mod api_types;
mod cache;
pub mod client;
mod error;
pub mod forecast;
pub mod location;
mod throttle;

pub use client::{Place, WeatherClient, WeatherReport};
pub use error::WeatherError;
pub use location::{Coordinates, Geolocator};

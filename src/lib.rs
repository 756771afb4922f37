//! `skycast` - weather forecasts from MET Norway
//!
//! Fetches raw forecast time series, reduces them into current-weather,
//! hourly, daily-summary and multi-day views, and memoizes the views in a
//! file-backed TTL cache.

pub mod aggregate;
pub mod apparent;
pub mod cache;
pub mod cached;
pub mod config;
pub mod error;
pub mod forecaster;
pub mod logging;
pub mod models;
pub mod weather;

// Re-export core types for public API
pub use cache::{CacheBackend, CacheLookup, FileCache, NoOpCache, TtlCache};
pub use cached::CachedForecaster;
pub use crate::config::SkycastConfig;
pub use error::{ErrorKind, SkycastError};
pub use forecaster::Forecaster;
pub use models::{
    CurrentWeather, DailyForecast, DailySummary, ForecastFeed, HourlyEntry, HourlyForecast,
    Location, ObservationPoint,
};
pub use weather::{MetNorwayClient, WeatherProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SkycastError>;

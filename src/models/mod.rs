//! Data models for skycast
//!
//! This module contains the core domain models organized by concern:
//! - Location: validated geographic coordinates
//! - Weather: observation points and current conditions
//! - Forecast: hourly and daily views derived from the feed

pub mod forecast;
pub mod location;
pub mod weather;

use std::sync::Arc;

// Re-export all public types for convenient access
pub use forecast::{DailyForecast, DailySummary, HourlyEntry, HourlyForecast};
pub use location::Location;
pub use weather::{CurrentWeather, ForecastFeed, Horizon, ObservationPoint, ShortHorizon};

/// Views that carry a location. Cached views get the caller's location put back after decoding.
pub trait Relocate {
    fn relocate(&mut self, location: Arc<Location>);
}

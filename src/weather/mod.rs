//! Upstream weather providers

use crate::Result;
use crate::models::ForecastFeed;

pub mod met_norway;

pub use met_norway::MetNorwayClient;

/// Source of raw forecast time series.
///
/// Implementations return points in upstream order and never retry; the
/// caller bounds every call with its own deadline.
pub trait WeatherProvider {
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<ForecastFeed>;
}

//! Hourly and daily forecast views

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{Location, ObservationPoint, Relocate};

/// One hour of an hourly forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyEntry {
    pub time: DateTime<Utc>,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub precipitation: f64,
    pub symbol: String,
}

impl From<&ObservationPoint> for HourlyEntry {
    fn from(point: &ObservationPoint) -> Self {
        Self {
            time: point.timestamp,
            temperature: point.temperature,
            feels_like: point.feels_like(),
            humidity: point.humidity,
            wind_speed: point.wind_speed,
            wind_direction: point.wind_direction,
            precipitation: point.precipitation(),
            symbol: point.symbol().to_string(),
        }
    }
}

/// Hourly forecast, ascending by time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyForecast {
    pub location: Arc<Location>,
    pub hours: Vec<HourlyEntry>,
}

impl Relocate for HourlyForecast {
    fn relocate(&mut self, location: Arc<Location>) {
        self.location = location;
    }
}

/// Aggregated statistics for one calendar day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySummary {
    pub location: Arc<Location>,
    pub date: NaiveDate,
    pub temperature_min: f64,
    pub temperature_max: f64,
    pub temperature_mean: f64,
    /// Sum of the short-horizon precipitation of every point, in mm
    pub precipitation_total: f64,
    pub wind_speed_max: f64,
    /// Most frequent symbol of the day
    pub symbol: Option<String>,
    /// Number of points the statistics were computed from
    pub sample_count: usize,
}

impl DailySummary {
    /// Summary with zeroed statistics, used when a day has no points
    #[must_use]
    pub fn empty(location: Arc<Location>, date: NaiveDate) -> Self {
        Self {
            location,
            date,
            temperature_min: 0.0,
            temperature_max: 0.0,
            temperature_mean: 0.0,
            precipitation_total: 0.0,
            wind_speed_max: 0.0,
            symbol: None,
            sample_count: 0,
        }
    }
}

impl Relocate for DailySummary {
    fn relocate(&mut self, location: Arc<Location>) {
        self.location = location;
    }
}

/// Multi-day forecast, one summary per calendar day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyForecast {
    pub location: Arc<Location>,
    pub days: Vec<DailySummary>,
}

impl Relocate for DailyForecast {
    fn relocate(&mut self, location: Arc<Location>) {
        for day in &mut self.days {
            day.relocate(Arc::clone(&location));
        }
        self.location = location;
    }
}

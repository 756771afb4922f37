//! Observation points and the current-conditions view

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{Location, Relocate};
use crate::apparent;

/// Which upstream block a short-horizon summary came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Horizon {
    OneHour,
    SixHours,
}

/// Symbol and precipitation for the period following a point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortHorizon {
    pub horizon: Horizon,
    /// Upstream symbol code, e.g. `partlycloudy_day`
    pub symbol_code: String,
    /// Precipitation amount in mm over the horizon
    pub precipitation: f64,
    /// Probability of precipitation in percent, when the feed provides it
    pub probability_of_precipitation: Option<f64>,
}

/// One time step of the upstream feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationPoint {
    pub timestamp: DateTime<Utc>,
    /// Air temperature in Celsius
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Air pressure at sea level in hPa
    pub pressure: f64,
    /// Cloud area fraction in percent
    pub cloud_cover: f64,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Wind direction in degrees (0-360, where 0/360 is North)
    pub wind_direction: f64,
    pub short_horizon: Option<ShortHorizon>,
}

impl ObservationPoint {
    /// Symbol code of the short-horizon block, empty when there is none
    #[must_use]
    pub fn symbol(&self) -> &str {
        self.short_horizon
            .as_ref()
            .map_or("", |block| block.symbol_code.as_str())
    }

    /// Precipitation of the short-horizon block, zero when there is none
    #[must_use]
    pub fn precipitation(&self) -> f64 {
        self.short_horizon
            .as_ref()
            .map_or(0.0, |block| block.precipitation)
    }

    #[must_use]
    pub fn feels_like(&self) -> f64 {
        apparent::feels_like(self.temperature, self.humidity, self.wind_speed)
    }

    /// UTC calendar day this point falls on
    #[must_use]
    pub fn calendar_day(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// Normalized upstream response
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastFeed {
    /// When the upstream last refreshed the forecast
    pub updated_at: DateTime<Utc>,
    /// Points in upstream order (ascending by time)
    pub points: Vec<ObservationPoint>,
}

/// Current conditions at a location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub location: Arc<Location>,
    pub timestamp: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub cloud_cover: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    /// Precipitation in mm for the next hour (or six hours when that is all the feed has)
    pub precipitation: f64,
    pub symbol: String,
}

impl CurrentWeather {
    #[must_use]
    pub fn from_point(
        location: Arc<Location>,
        point: &ObservationPoint,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            location,
            timestamp: point.timestamp,
            updated_at,
            temperature: point.temperature,
            feels_like: point.feels_like(),
            humidity: point.humidity,
            pressure: point.pressure,
            cloud_cover: point.cloud_cover,
            wind_speed: point.wind_speed,
            wind_direction: point.wind_direction,
            precipitation: point.precipitation(),
            symbol: point.symbol().to_string(),
        }
    }

    /// Eight-point compass label for the wind direction
    #[must_use]
    pub fn wind_direction_label(&self) -> &'static str {
        // whole degrees, so 22.9 still counts as north
        let degrees = self.wind_direction.rem_euclid(360.0).floor() as u16;
        match degrees {
            23..=67 => "NE (Northeast)",
            68..=112 => "E (East)",
            113..=157 => "SE (Southeast)",
            158..=202 => "S (South)",
            203..=247 => "SW (Southwest)",
            248..=292 => "W (West)",
            293..=337 => "NW (Northwest)",
            _ => "N (North)",
        }
    }

    /// Rough wind strength description
    #[must_use]
    pub fn wind_description(&self) -> &'static str {
        match self.wind_speed {
            s if s < 2.0 => "Calm",
            s if s < 6.0 => "Light breeze",
            s if s < 12.0 => "Moderate breeze",
            s if s < 20.0 => "Strong breeze",
            s if s < 29.0 => "Gale",
            _ => "Storm",
        }
    }
}

impl Relocate for CurrentWeather {
    fn relocate(&mut self, location: Arc<Location>) {
        self.location = location;
    }
}

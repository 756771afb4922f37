//! MET Norway Locationforecast 2.0 client

use reqwest::Client;
use reqwest::header::ACCEPT;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use super::WeatherProvider;
use crate::config::ProviderConfig;
use crate::models::ForecastFeed;
use crate::{Result, SkycastError};

/// HTTP client for the MET Norway forecast API
#[derive(Debug, Clone)]
pub struct MetNorwayClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl MetNorwayClient {
    /// Create a new client from provider settings
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| SkycastError::network("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn transport_error(&self, error: reqwest::Error) -> SkycastError {
        if error.is_timeout() {
            SkycastError::Timeout {
                after: self.timeout,
            }
        } else {
            SkycastError::network("Failed to fetch weather data", error)
        }
    }
}

impl WeatherProvider for MetNorwayClient {
    #[instrument(skip(self))]
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<ForecastFeed> {
        let url = format!("{}?lat={:.4}&lon={:.4}", self.base_url, latitude, longitude);
        debug!("MET Norway request URL: {}", url);
        let start_time = Instant::now();

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("MET Norway returned status {}", status);
            return Err(SkycastError::UpstreamStatus {
                code: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        let payload: api::Response = serde_json::from_slice(&bytes)
            .map_err(|e| SkycastError::decode(format!("Failed to decode MET Norway response: {e}")))?;
        let feed = payload.into_feed();

        let elapsed = start_time.elapsed();
        info!(
            "Fetched {} forecast points in {:.3}s",
            feed.points.len(),
            elapsed.as_secs_f64()
        );
        if elapsed.as_secs() > 5 {
            warn!("Slow API response detected: {:.3}s", elapsed.as_secs_f64());
        }

        Ok(feed)
    }
}

/// Locationforecast response structures and conversion into the internal feed
mod api {
    use chrono::{DateTime, Utc};
    use serde::Deserialize;

    use crate::models::{ForecastFeed, Horizon, ObservationPoint, ShortHorizon};

    #[derive(Debug, Deserialize)]
    pub struct Response {
        pub properties: Properties,
    }

    #[derive(Debug, Deserialize)]
    pub struct Properties {
        pub meta: Meta,
        #[serde(default)]
        pub timeseries: Vec<Timeseries>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Meta {
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Timeseries {
        pub time: DateTime<Utc>,
        pub data: Data,
    }

    #[derive(Debug, Deserialize)]
    pub struct Data {
        pub instant: Instant,
        pub next_1_hours: Option<Period>,
        pub next_6_hours: Option<Period>,
        // next_12_hours is ignored, it is never a symbol source
    }

    #[derive(Debug, Deserialize)]
    pub struct Instant {
        pub details: InstantDetails,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    pub struct InstantDetails {
        pub air_pressure_at_sea_level: f64,
        pub air_temperature: f64,
        pub cloud_area_fraction: f64,
        pub relative_humidity: f64,
        pub wind_from_direction: f64,
        pub wind_speed: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct Period {
        pub summary: Summary,
        #[serde(default)]
        pub details: PeriodDetails,
    }

    #[derive(Debug, Deserialize)]
    pub struct Summary {
        pub symbol_code: String,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    pub struct PeriodDetails {
        pub precipitation_amount: Option<f64>,
        pub probability_of_precipitation: Option<f64>,
    }

    impl Period {
        fn to_short_horizon(&self, horizon: Horizon) -> ShortHorizon {
            ShortHorizon {
                horizon,
                symbol_code: self.summary.symbol_code.clone(),
                precipitation: self.details.precipitation_amount.unwrap_or(0.0),
                probability_of_precipitation: self.details.probability_of_precipitation,
            }
        }
    }

    impl Data {
        /// Finest available block: next hour, else next six hours
        fn short_horizon(&self) -> Option<ShortHorizon> {
            self.next_1_hours
                .as_ref()
                .map(|p| p.to_short_horizon(Horizon::OneHour))
                .or_else(|| {
                    self.next_6_hours
                        .as_ref()
                        .map(|p| p.to_short_horizon(Horizon::SixHours))
                })
        }
    }

    impl Response {
        pub fn into_feed(self) -> ForecastFeed {
            let points = self
                .properties
                .timeseries
                .into_iter()
                .map(|ts| {
                    let details = &ts.data.instant.details;
                    ObservationPoint {
                        timestamp: ts.time,
                        temperature: details.air_temperature,
                        humidity: details.relative_humidity,
                        pressure: details.air_pressure_at_sea_level,
                        cloud_cover: details.cloud_area_fraction,
                        wind_speed: details.wind_speed,
                        wind_direction: details.wind_from_direction,
                        short_horizon: ts.data.short_horizon(),
                    }
                })
                .collect();

            ForecastFeed {
                updated_at: self.properties.meta.updated_at,
                points,
            }
        }
    }

}

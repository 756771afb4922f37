//! Live forecast service
//!
//! Fetches a feed from the injected provider under a deadline and reduces it
//! with the aggregation functions. Nothing is cached at this layer.

use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use tracing::{debug, instrument};

use crate::aggregate::{self, HOURS_PER_DAY};
use crate::models::{
    CurrentWeather, DailyForecast, DailySummary, ForecastFeed, HourlyForecast, Location,
};
use crate::weather::WeatherProvider;
use crate::{Result, SkycastError};

/// Forecast views computed from a fresh upstream feed on every call
#[derive(Debug, Clone)]
pub struct Forecaster<P> {
    provider: P,
    deadline: Duration,
}

impl<P: WeatherProvider> Forecaster<P> {
    pub fn new(provider: P, deadline: Duration) -> Self {
        Self { provider, deadline }
    }

    #[must_use]
    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    async fn fetch_feed(&self, location: &Location) -> Result<ForecastFeed> {
        let fetch = self
            .provider
            .fetch(location.latitude(), location.longitude());

        let feed = time::timeout(self.deadline, fetch)
            .await
            .map_err(|_| SkycastError::Timeout {
                after: self.deadline,
            })??;

        debug!(
            "Feed for {} has {} points, updated {}",
            location,
            feed.points.len(),
            feed.updated_at
        );
        Ok(feed)
    }

    #[instrument(skip(self), fields(location = %location))]
    pub async fn current_weather(&self, location: &Arc<Location>) -> Result<CurrentWeather> {
        let feed = self.fetch_feed(location).await?;
        aggregate::current_weather(Arc::clone(location), &feed)
    }

    /// Next `hours` hourly entries, fewer if the feed is shorter
    #[instrument(skip(self), fields(location = %location))]
    pub async fn hourly_forecast(
        &self,
        location: &Arc<Location>,
        hours: usize,
    ) -> Result<HourlyForecast> {
        let feed = self.fetch_feed(location).await?;
        if feed.points.is_empty() {
            return Err(SkycastError::EmptyData);
        }
        Ok(aggregate::hourly_forecast(
            Arc::clone(location),
            &feed.points,
            hours,
        ))
    }

    /// Summary of the next 24 points, dated by the first of them
    #[instrument(skip(self), fields(location = %location))]
    pub async fn daily_summary(&self, location: &Arc<Location>) -> Result<DailySummary> {
        let feed = self.fetch_feed(location).await?;
        let first = feed.points.first().ok_or(SkycastError::EmptyData)?;
        let window = &feed.points[..feed.points.len().min(HOURS_PER_DAY)];

        Ok(aggregate::daily_summary(
            Arc::clone(location),
            first.calendar_day(),
            window,
        ))
    }

    /// One summary per UTC calendar day, at most `days` of them
    #[instrument(skip(self), fields(location = %location))]
    pub async fn daily_forecast(
        &self,
        location: &Arc<Location>,
        days: usize,
    ) -> Result<DailyForecast> {
        if days == 0 {
            return Err(SkycastError::validation("days must be at least 1"));
        }
        let feed = self.fetch_feed(location).await?;
        aggregate::daily_forecast(Arc::clone(location), &feed.points, days)
    }
}

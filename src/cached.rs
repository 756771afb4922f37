//! Memoizing front for [`Forecaster`]
//!
//! Views are cached as JSON under keys derived from the view kind, the
//! rounded coordinates and the horizon. Cache failures never fail a request.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::Result;
use crate::cache::{CacheBackend, CacheLookup, TtlCache};
use crate::forecaster::Forecaster;
use crate::models::{
    CurrentWeather, DailyForecast, DailySummary, HourlyForecast, Location, Relocate,
};
use crate::weather::WeatherProvider;

/// Cache key for a view of `location`, optionally qualified by a horizon
#[must_use]
pub fn cache_key(view: &str, location: &Location, horizon: Option<usize>) -> String {
    let base = format!("weather:{view}:{}", location.cache_key_fragment());
    match horizon {
        Some(horizon) => format!("{base}:{horizon}"),
        None => base,
    }
}

pub struct CachedForecaster<P> {
    inner: Forecaster<P>,
    cache: CacheBackend,
    ttl: Duration,
}

impl<P: WeatherProvider> CachedForecaster<P> {
    pub fn new(inner: Forecaster<P>, cache: CacheBackend, ttl: Duration) -> Self {
        Self { inner, cache, ttl }
    }

    #[must_use]
    pub fn cache(&self) -> &CacheBackend {
        &self.cache
    }

    #[must_use]
    pub fn inner(&self) -> &Forecaster<P> {
        &self.inner
    }

    pub async fn current_weather(&self, location: &Arc<Location>) -> Result<CurrentWeather> {
        let key = cache_key("current", location, None);
        self.memoize(&key, location, self.inner.current_weather(location))
            .await
    }

    pub async fn hourly_forecast(
        &self,
        location: &Arc<Location>,
        hours: usize,
    ) -> Result<HourlyForecast> {
        let key = cache_key("forecast", location, Some(hours));
        self.memoize(&key, location, self.inner.hourly_forecast(location, hours))
            .await
    }

    pub async fn daily_summary(&self, location: &Arc<Location>) -> Result<DailySummary> {
        let key = cache_key("summary", location, None);
        self.memoize(&key, location, self.inner.daily_summary(location))
            .await
    }

    pub async fn daily_forecast(
        &self,
        location: &Arc<Location>,
        days: usize,
    ) -> Result<DailyForecast> {
        let key = cache_key("daily", location, Some(days));
        self.memoize(&key, location, self.inner.daily_forecast(location, days))
            .await
    }

    async fn memoize<T, F>(&self, key: &str, location: &Arc<Location>, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Relocate,
        F: Future<Output = Result<T>>,
    {
        match self.cache.get(key) {
            CacheLookup::Hit(bytes) => match serde_json::from_slice::<T>(&bytes) {
                Ok(mut view) => {
                    debug!("Cache hit for {}", key);
                    view.relocate(Arc::clone(location));
                    return Ok(view);
                }
                Err(e) => warn!("Discarding undecodable cache entry {}: {}", key, e),
            },
            CacheLookup::Expired => debug!("Cache entry expired for {}", key),
            CacheLookup::Miss => debug!("Cache miss for {}", key),
        }

        let view = fetch.await?;
        self.store(key, &view);
        Ok(view)
    }

    fn store<T: Serialize>(&self, key: &str, view: &T) {
        let bytes = match serde_json::to_vec(view) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to serialize view for {}: {}", key, e);
                return;
            }
        };
        if let Err(e) = self.cache.set(key, &bytes, self.ttl) {
            warn!("Failed to write cache entry {}: {}", key, e);
        }
    }
}

//! Memoization behaviour of `CachedForecaster` with a counting fake provider

use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;

use skycast::cache::TtlCache;
use skycast::cached::cache_key;
use skycast::config::CacheConfig;
use skycast::models::{Horizon, ShortHorizon};
use skycast::{
    CacheBackend, CachedForecaster, FileCache, ForecastFeed, Forecaster, Location, NoOpCache,
    ObservationPoint, SkycastError, WeatherProvider,
};

#[derive(Clone, Default)]
struct CountingProvider {
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl CountingProvider {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl WeatherProvider for CountingProvider {
    async fn fetch(&self, _latitude: f64, _longitude: f64) -> skycast::Result<ForecastFeed> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SkycastError::UpstreamStatus {
                code: 503,
                body: "maintenance".to_string(),
            });
        }

        let start = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
        let points = (0..72)
            .map(|i| ObservationPoint {
                timestamp: start + ChronoDuration::hours(i),
                temperature: 15.0 + (i % 24) as f64 * 0.25,
                humidity: 55.0,
                pressure: 1018.0,
                cloud_cover: 20.0,
                wind_speed: 4.0,
                wind_direction: 45.0,
                short_horizon: Some(ShortHorizon {
                    horizon: Horizon::OneHour,
                    symbol_code: "clearsky_day".to_string(),
                    precipitation: 0.0,
                    probability_of_precipitation: None,
                }),
            })
            .collect();

        Ok(ForecastFeed {
            updated_at: start,
            points,
        })
    }
}

fn file_backend(dir: &TempDir) -> CacheBackend {
    CacheBackend::File(FileCache::new(dir.path().join("cache")).unwrap())
}

fn service(
    provider: &CountingProvider,
    cache: CacheBackend,
    ttl: Duration,
) -> CachedForecaster<CountingProvider> {
    let forecaster = Forecaster::new(provider.clone(), Duration::from_secs(5));
    CachedForecaster::new(forecaster, cache, ttl)
}

fn location(name: &str) -> Arc<Location> {
    Arc::new(Location::new(58.9983, 10.0422).unwrap().with_name(name))
}

#[tokio::test]
async fn test_second_call_is_served_from_cache() {
    let dir = TempDir::new().unwrap();
    let provider = CountingProvider::default();
    let service = service(&provider, file_backend(&dir), Duration::from_secs(600));
    let loc = location("Stavern");

    let first = service.current_weather(&loc).await.unwrap();
    let second = service.current_weather(&loc).await.unwrap();

    assert_eq!(provider.calls(), 1);
    assert_eq!(first.temperature, second.temperature);
    assert_eq!(first.timestamp, second.timestamp);
    assert!(service.cache().has(&cache_key("current", &loc, None)));
}

#[tokio::test]
async fn test_cached_view_takes_callers_location() {
    let dir = TempDir::new().unwrap();
    let provider = CountingProvider::default();
    let service = service(&provider, file_backend(&dir), Duration::from_secs(600));

    service.daily_forecast(&location("Stavern"), 2).await.unwrap();

    let renamed = location("Larvik coast");
    let forecast = service.daily_forecast(&renamed, 2).await.unwrap();

    assert_eq!(provider.calls(), 1);
    assert!(Arc::ptr_eq(&forecast.location, &renamed));
    assert!(forecast.days.iter().all(|d| d.location.name() == Some("Larvik coast")));
}

#[tokio::test]
async fn test_views_and_horizons_use_separate_entries() {
    let dir = TempDir::new().unwrap();
    let provider = CountingProvider::default();
    let service = service(&provider, file_backend(&dir), Duration::from_secs(600));
    let loc = location("Stavern");

    let six = service.hourly_forecast(&loc, 6).await.unwrap();
    let twelve = service.hourly_forecast(&loc, 12).await.unwrap();
    service.daily_summary(&loc).await.unwrap();
    service.hourly_forecast(&loc, 6).await.unwrap();

    assert_eq!(six.hours.len(), 6);
    assert_eq!(twelve.hours.len(), 12);
    assert_eq!(provider.calls(), 3);
}

#[tokio::test]
async fn test_disabled_cache_always_fetches() {
    let provider = CountingProvider::default();
    let service = service(
        &provider,
        CacheBackend::Disabled(NoOpCache),
        Duration::from_secs(600),
    );
    let loc = location("Stavern");

    service.daily_summary(&loc).await.unwrap();
    service.daily_summary(&loc).await.unwrap();

    assert_eq!(provider.calls(), 2);
    assert!(!service.cache().is_enabled());
}

#[tokio::test]
async fn test_expired_entry_is_refetched() {
    let dir = TempDir::new().unwrap();
    let provider = CountingProvider::default();
    let service = service(&provider, file_backend(&dir), Duration::from_millis(50));
    let loc = location("Stavern");

    service.current_weather(&loc).await.unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;
    service.current_weather(&loc).await.unwrap();

    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn test_undecodable_entry_is_replaced() {
    let dir = TempDir::new().unwrap();
    let provider = CountingProvider::default();
    let service = service(&provider, file_backend(&dir), Duration::from_secs(600));
    let loc = location("Stavern");
    let key = cache_key("summary", &loc, None);

    service
        .cache()
        .set(&key, b"not a summary", Duration::from_secs(600))
        .unwrap();

    let summary = service.daily_summary(&loc).await.unwrap();
    assert_eq!(summary.sample_count, 24);
    assert_eq!(provider.calls(), 1);

    service.daily_summary(&loc).await.unwrap();
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_unwritable_cache_does_not_fail_requests() {
    let dir = TempDir::new().unwrap();
    let cache_dir = dir.path().join("cache");
    let backend = CacheBackend::File(FileCache::new(&cache_dir).unwrap());

    // a plain file where the directory used to be
    fs::remove_dir(&cache_dir).unwrap();
    fs::write(&cache_dir, b"in the way").unwrap();

    let provider = CountingProvider::default();
    let service = service(&provider, backend, Duration::from_secs(600));
    let loc = location("Stavern");

    let first = service.hourly_forecast(&loc, 3).await.unwrap();
    service.hourly_forecast(&loc, 3).await.unwrap();

    assert_eq!(first.hours.len(), 3);
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn test_provider_errors_propagate_and_are_not_cached() {
    let dir = TempDir::new().unwrap();
    let provider = CountingProvider::failing();
    let service = service(&provider, file_backend(&dir), Duration::from_secs(600));
    let loc = location("Stavern");

    for _ in 0..2 {
        match service.current_weather(&loc).await {
            Err(SkycastError::UpstreamStatus { code, .. }) => assert_eq!(code, 503),
            other => panic!("expected upstream status, got {other:?}"),
        }
    }
    assert_eq!(provider.calls(), 2);
    assert!(!service.cache().has(&cache_key("current", &loc, None)));
}

#[tokio::test]
async fn test_zero_days_is_rejected_before_fetching() {
    let dir = TempDir::new().unwrap();
    let provider = CountingProvider::default();
    let service = service(&provider, file_backend(&dir), Duration::from_secs(600));

    let result = service.daily_forecast(&location("Stavern"), 0).await;
    assert!(matches!(result, Err(SkycastError::Validation { .. })));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_backend_from_config() {
    let dir = TempDir::new().unwrap();
    let enabled = CacheConfig {
        enabled: true,
        ttl_minutes: 10,
        directory: dir.path().join("views").to_string_lossy().to_string(),
    };
    let backend = CacheBackend::from_config(&enabled);
    assert!(backend.is_enabled());
    assert!(dir.path().join("views").is_dir());

    let disabled = CacheConfig {
        enabled: false,
        ..enabled
    };
    assert!(!CacheBackend::from_config(&disabled).is_enabled());
}

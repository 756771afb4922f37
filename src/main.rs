use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use skycast::{CacheBackend, CachedForecaster, Forecaster, MetNorwayClient, SkycastConfig};

const HOURLY_HORIZON: usize = 12;
const DAILY_HORIZON: usize = 3;

fn print_view<T: Serialize>(title: &str, view: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(view)
        .with_context(|| format!("Failed to render {title}"))?;
    println!("# {title}\n{rendered}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = SkycastConfig::load()?;
    skycast::logging::init(&config.logging)?;

    let location = Arc::new(config.location.to_location()?);
    info!("Forecasting for {}", location);

    let provider = MetNorwayClient::new(&config.provider)?;
    let forecaster = Forecaster::new(provider, config.provider.timeout());
    let cache = CacheBackend::from_config(&config.cache);
    let service = CachedForecaster::new(forecaster, cache, config.cache.ttl());

    let current = service
        .current_weather(&location)
        .await
        .with_context(|| "Failed to get current weather")?;
    print_view("Current weather", &current)?;
    println!(
        "Wind: {} from {}",
        current.wind_description(),
        current.wind_direction_label()
    );

    let hourly = service
        .hourly_forecast(&location, HOURLY_HORIZON)
        .await
        .with_context(|| "Failed to get hourly forecast")?;
    print_view("Hourly forecast", &hourly)?;

    let summary = service
        .daily_summary(&location)
        .await
        .with_context(|| "Failed to get daily summary")?;
    print_view("Today", &summary)?;

    let daily = service
        .daily_forecast(&location, DAILY_HORIZON)
        .await
        .with_context(|| "Failed to get daily forecast")?;
    print_view("Daily forecast", &daily)?;

    Ok(())
}

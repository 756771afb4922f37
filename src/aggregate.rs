//! Reductions from raw forecast points to views
//!
//! Everything here is pure: no I/O, no clock. Inputs are assumed to be in
//! ascending time order, as the upstream delivers them.

use chrono::NaiveDate;
use std::sync::Arc;

use crate::models::{
    CurrentWeather, DailyForecast, DailySummary, ForecastFeed, HourlyEntry, HourlyForecast,
    Location, ObservationPoint,
};
use crate::{Result, SkycastError};

/// Points per day when grouping an hourly feed
pub const HOURS_PER_DAY: usize = 24;

/// Current conditions from the first point of the feed
pub fn current_weather(location: Arc<Location>, feed: &ForecastFeed) -> Result<CurrentWeather> {
    let now = feed.points.first().ok_or(SkycastError::EmptyData)?;
    Ok(CurrentWeather::from_point(location, now, feed.updated_at))
}

/// The first `hours` points as hourly entries. Asking for more than exists truncates.
#[must_use]
pub fn hourly_forecast(
    location: Arc<Location>,
    points: &[ObservationPoint],
    hours: usize,
) -> HourlyForecast {
    HourlyForecast {
        location,
        hours: points.iter().take(hours).map(HourlyEntry::from).collect(),
    }
}

/// Statistics for one day's points. An empty slice gives zeroed statistics.
#[must_use]
pub fn daily_summary(
    location: Arc<Location>,
    date: NaiveDate,
    points: &[ObservationPoint],
) -> DailySummary {
    let Some(first) = points.first() else {
        return DailySummary::empty(location, date);
    };

    let mut temperature_min = first.temperature;
    let mut temperature_max = first.temperature;
    let mut temperature_sum = 0.0;
    let mut precipitation_total = 0.0;
    let mut wind_speed_max = first.wind_speed;

    for point in points {
        temperature_min = temperature_min.min(point.temperature);
        temperature_max = temperature_max.max(point.temperature);
        wind_speed_max = wind_speed_max.max(point.wind_speed);
        temperature_sum += point.temperature;
        precipitation_total += point.precipitation();
    }

    DailySummary {
        location,
        date,
        temperature_min,
        temperature_max,
        temperature_mean: temperature_sum / points.len() as f64,
        precipitation_total,
        wind_speed_max,
        symbol: dominant_symbol(points.iter().map(ObservationPoint::symbol)),
        sample_count: points.len(),
    }
}

/// Most frequent non-empty symbol.
///
/// On a tie the symbol that reached the winning count first wins, so
/// `[A, B, A, B]` always yields `A`.
#[must_use]
pub fn dominant_symbol<'a>(symbols: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let mut counts: Vec<(&'a str, usize)> = Vec::new();
    let mut best: Option<(&'a str, usize)> = None;

    for symbol in symbols.into_iter().filter(|s| !s.is_empty()) {
        let count = match counts.iter_mut().find(|(s, _)| *s == symbol) {
            Some((_, count)) => {
                *count += 1;
                *count
            }
            None => {
                counts.push((symbol, 1));
                1
            }
        };

        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((symbol, count));
        }
    }

    best.map(|(symbol, _)| symbol.to_string())
}

/// Group the leading `days × 24` points into UTC calendar days and
/// summarize at most `days` of them.
///
/// Runs are contiguous: a day is closed as soon as a point from another day
/// appears. A trailing partial day still produces a summary.
pub fn daily_forecast(
    location: Arc<Location>,
    points: &[ObservationPoint],
    days: usize,
) -> Result<DailyForecast> {
    if points.is_empty() {
        return Err(SkycastError::EmptyData);
    }

    let window = &points[..points.len().min(days.saturating_mul(HOURS_PER_DAY))];
    let summaries = window
        .chunk_by(|a, b| a.calendar_day() == b.calendar_day())
        .take(days)
        .map(|run| daily_summary(Arc::clone(&location), run[0].calendar_day(), run))
        .collect();

    Ok(DailyForecast {
        location,
        days: summaries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Horizon, ShortHorizon};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn location() -> Arc<Location> {
        Arc::new(Location::new(59.0, 10.0).unwrap().with_name("Stavern"))
    }

    fn point_at(timestamp: DateTime<Utc>, temperature: f64, symbol: &str) -> ObservationPoint {
        ObservationPoint {
            timestamp,
            temperature,
            humidity: 60.0,
            pressure: 1010.0,
            cloud_cover: 50.0,
            wind_speed: 3.0,
            wind_direction: 180.0,
            short_horizon: (!symbol.is_empty()).then(|| ShortHorizon {
                horizon: Horizon::OneHour,
                symbol_code: symbol.to_string(),
                precipitation: 0.5,
                probability_of_precipitation: None,
            }),
        }
    }

    fn hourly_points(start: DateTime<Utc>, count: usize) -> Vec<ObservationPoint> {
        (0..count)
            .map(|i| {
                let temperature = 5.0 + (i % 24) as f64 * 0.5;
                point_at(start + Duration::hours(i as i64), temperature, "cloudy")
            })
            .collect()
    }

    fn midnight() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_current_weather_uses_first_point() {
        let points = hourly_points(midnight(), 3);
        let feed = ForecastFeed {
            updated_at: midnight() - Duration::minutes(20),
            points,
        };
        let current = current_weather(location(), &feed).unwrap();
        assert_eq!(current.timestamp, midnight());
        assert_eq!(current.updated_at, midnight() - Duration::minutes(20));
        assert_eq!(current.symbol, "cloudy");
        assert_eq!(current.precipitation, 0.5);
    }

    #[test]
    fn test_current_weather_without_block() {
        let feed = ForecastFeed {
            updated_at: midnight(),
            points: vec![point_at(midnight(), 12.0, "")],
        };
        let current = current_weather(location(), &feed).unwrap();
        assert_eq!(current.symbol, "");
        assert_eq!(current.precipitation, 0.0);
    }

    #[test]
    fn test_current_weather_empty_feed() {
        let feed = ForecastFeed {
            updated_at: midnight(),
            points: Vec::new(),
        };
        assert!(matches!(
            current_weather(location(), &feed),
            Err(SkycastError::EmptyData)
        ));
    }

    #[test]
    fn test_hourly_forecast_truncates() {
        let points = hourly_points(midnight(), 10);
        for n in [0, 1, 5, 10, 11, 100] {
            let forecast = hourly_forecast(location(), &points, n);
            assert_eq!(forecast.hours.len(), n.min(points.len()));
            assert!(forecast.hours.windows(2).all(|w| w[0].time < w[1].time));
        }
    }

    #[test]
    fn test_hourly_entry_mapping() {
        let points = vec![point_at(midnight(), -2.0, "snow")];
        let forecast = hourly_forecast(location(), &points, 1);
        let entry = &forecast.hours[0];
        assert_eq!(entry.symbol, "snow");
        assert_eq!(entry.feels_like, points[0].feels_like());
    }

    #[test]
    fn test_daily_summary_statistics() {
        let mut points = vec![
            point_at(midnight(), 4.0, "rain"),
            point_at(midnight() + Duration::hours(1), 10.0, ""),
            point_at(midnight() + Duration::hours(2), 7.0, "rain"),
        ];
        points[1].wind_speed = 9.5;

        let date = midnight().date_naive();
        let summary = daily_summary(location(), date, &points);
        assert_eq!(summary.temperature_min, 4.0);
        assert_eq!(summary.temperature_max, 10.0);
        assert_eq!(summary.temperature_mean, 7.0);
        assert_eq!(summary.precipitation_total, 1.0);
        assert_eq!(summary.wind_speed_max, 9.5);
        assert_eq!(summary.symbol.as_deref(), Some("rain"));
        assert_eq!(summary.sample_count, 3);
        assert_eq!(summary.date, date);
    }

    #[test]
    fn test_daily_summary_mean_between_bounds() {
        let points = hourly_points(midnight() + Duration::hours(7), 37);
        let summary = daily_summary(location(), midnight().date_naive(), &points);
        assert!(summary.temperature_min <= summary.temperature_mean);
        assert!(summary.temperature_mean <= summary.temperature_max);
    }

    #[test]
    fn test_daily_summary_calm_day_wind_max() {
        // max wind starts from the first point, not from zero
        let mut points = vec![point_at(midnight(), 1.0, "")];
        points[0].wind_speed = 0.0;
        let summary = daily_summary(location(), midnight().date_naive(), &points);
        assert_eq!(summary.wind_speed_max, 0.0);
    }

    #[test]
    fn test_daily_summary_empty() {
        let summary = daily_summary(location(), midnight().date_naive(), &[]);
        assert_eq!(summary.temperature_mean, 0.0);
        assert_eq!(summary.precipitation_total, 0.0);
        assert!(summary.symbol.is_none());
    }

    #[test]
    fn test_dominant_symbol_tie_is_first_to_reach_max() {
        for _ in 0..100 {
            assert_eq!(
                dominant_symbol(["A", "B", "A", "B"]).as_deref(),
                Some("A")
            );
        }
        assert_eq!(dominant_symbol(["B", "A", "A", "B"]).as_deref(), Some("A"));
        assert_eq!(dominant_symbol(["A", "B", "B"]).as_deref(), Some("B"));
    }

    #[test]
    fn test_dominant_symbol_ignores_empty() {
        assert_eq!(dominant_symbol(["", "", "fog"]).as_deref(), Some("fog"));
        assert_eq!(dominant_symbol(["", ""]), None);
        assert_eq!(dominant_symbol(std::iter::empty()), None);
    }

    #[test]
    fn test_daily_forecast_full_days() {
        let days = 3;
        let points = hourly_points(midnight(), days * HOURS_PER_DAY);
        let forecast = daily_forecast(location(), &points, days).unwrap();

        assert_eq!(forecast.days.len(), days);
        for (i, day) in forecast.days.iter().enumerate() {
            assert_eq!(day.sample_count, HOURS_PER_DAY);
            assert_eq!(day.date, midnight().date_naive() + Duration::days(i as i64));
        }
    }

    #[test]
    fn test_daily_forecast_partial_last_day() {
        let days = 3;
        let points = hourly_points(midnight(), days * HOURS_PER_DAY - 5);
        let forecast = daily_forecast(location(), &points, days).unwrap();

        assert_eq!(forecast.days.len(), days);
        assert_eq!(forecast.days[0].sample_count, 24);
        assert_eq!(forecast.days[1].sample_count, 24);
        assert_eq!(forecast.days[2].sample_count, 19);
    }

    #[test]
    fn test_daily_forecast_stops_at_requested_days() {
        // starting mid-day spreads 48 points over three calendar days
        let points = hourly_points(midnight() + Duration::hours(12), 48);
        let forecast = daily_forecast(location(), &points, 2).unwrap();

        assert_eq!(forecast.days.len(), 2);
        assert_eq!(forecast.days[0].sample_count, 12);
        assert_eq!(forecast.days[1].sample_count, 24);
    }

    #[test]
    fn test_daily_forecast_ignores_points_past_window() {
        let points = hourly_points(midnight(), 5 * HOURS_PER_DAY);
        let forecast = daily_forecast(location(), &points, 1).unwrap();
        assert_eq!(forecast.days.len(), 1);
        assert_eq!(forecast.days[0].sample_count, 24);
    }

    #[test]
    fn test_daily_forecast_empty() {
        assert!(matches!(
            daily_forecast(location(), &[], 3),
            Err(SkycastError::EmptyData)
        ));
    }

    #[test]
    fn test_daily_forecast_shares_location() {
        let loc = location();
        let points = hourly_points(midnight(), 30);
        let forecast = daily_forecast(Arc::clone(&loc), &points, 2).unwrap();
        assert!(forecast.days.iter().all(|d| Arc::ptr_eq(&d.location, &loc)));
    }
}

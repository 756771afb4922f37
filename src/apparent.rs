//! Apparent ("feels like") temperature
//!
//! Wind chill applies at or below 10 °C with wind above 4.8 km/h, the
//! Rothfusz heat index applies at or above 27 °C with relative humidity above
//! 40 %. Everything in between is reported as the air temperature.

/// Upper air temperature (°C) for the wind chill regime
pub const WIND_CHILL_MAX_TEMPERATURE: f64 = 10.0;
/// Wind speed (km/h) that must be exceeded for wind chill to apply
pub const WIND_CHILL_MIN_WIND_KMH: f64 = 4.8;
/// Lower air temperature (°C) for the heat index regime
pub const HEAT_INDEX_MIN_TEMPERATURE: f64 = 27.0;
/// Relative humidity (%) that must be exceeded for the heat index to apply
pub const HEAT_INDEX_MIN_HUMIDITY: f64 = 40.0;

/// Feels-like temperature in °C from air temperature (°C), relative humidity (%) and wind speed (m/s).
#[must_use]
pub fn feels_like(temperature: f64, humidity: f64, wind_speed: f64) -> f64 {
    let wind_kmh = wind_speed * 3.6;

    if temperature <= WIND_CHILL_MAX_TEMPERATURE && wind_kmh > WIND_CHILL_MIN_WIND_KMH {
        wind_chill(temperature, wind_kmh)
    } else if temperature >= HEAT_INDEX_MIN_TEMPERATURE && humidity > HEAT_INDEX_MIN_HUMIDITY {
        heat_index(temperature, humidity)
    } else {
        temperature
    }
}

/// Wind chill (°C) for air temperature in °C and wind speed in km/h
#[must_use]
pub fn wind_chill(temperature: f64, wind_kmh: f64) -> f64 {
    let v = wind_kmh.powf(0.16);
    13.12 + 0.6215 * temperature - 11.37 * v + 0.3965 * temperature * v
}

/// Rothfusz heat index (°C) for air temperature in °C and relative humidity in %
#[must_use]
pub fn heat_index(temperature: f64, humidity: f64) -> f64 {
    let t = celsius_to_fahrenheit(temperature);
    let r = humidity;

    let hi = -42.379 + 2.049_015_23 * t + 10.143_331_27 * r
        - 0.224_755_41 * t * r
        - 0.006_837_83 * t * t
        - 0.054_817_17 * r * r
        + 0.001_228_74 * t * t * r
        + 0.000_852_82 * t * r * r
        - 0.000_001_99 * t * t * r * r;

    fahrenheit_to_celsius(hi)
}

#[must_use]
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

#[must_use]
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

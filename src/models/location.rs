//! Location model for geographic coordinates and metadata

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Result, SkycastError};

/// Validated location. Coordinates are checked on construction and on deserialization.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(try_from = "RawLocation")]
pub struct Location {
    name: Option<String>,
    latitude: f64,
    longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    timezone: Option<String>,
}

#[derive(Deserialize)]
struct RawLocation {
    name: Option<String>,
    latitude: f64,
    longitude: f64,
    timezone: Option<String>,
}

impl TryFrom<RawLocation> for Location {
    type Error = SkycastError;

    fn try_from(raw: RawLocation) -> Result<Self> {
        let mut location = Location::new(raw.latitude, raw.longitude)?;
        location.name = raw.name.filter(|n| !n.is_empty());
        location.timezone = raw.timezone.filter(|tz| !tz.is_empty());
        Ok(location)
    }
}

impl Location {
    /// Create a new unnamed location
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(SkycastError::validation(format!(
                "invalid latitude: {latitude} (must be between -90 and 90)"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(SkycastError::validation(format!(
                "invalid longitude: {longitude} (must be between -180 and 180)"
            )));
        }
        Ok(Self {
            name: None,
            latitude,
            longitude,
            timezone: None,
        })
    }

    #[must_use]
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_timezone<S: Into<String>>(mut self, timezone: S) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    #[must_use]
    pub fn timezone(&self) -> Option<&str> {
        self.timezone.as_deref()
    }

    /// Coordinate fragment used in cache keys. Four decimals matches the upstream query precision.
    #[must_use]
    pub fn cache_key_fragment(&self) -> String {
        format!("{:.4}:{:.4}", self.latitude, self.longitude)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(
                f,
                "{} ({:.2}°N, {:.2}°E)",
                name, self.latitude, self.longitude
            ),
            None => write!(f, "{:.2}°N, {:.2}°E", self.latitude, self.longitude),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(59.0, 10.0)]
    #[case(90.0, 180.0)]
    #[case(-90.0, -180.0)]
    #[case(0.0, 0.0)]
    fn test_valid_coordinates(#[case] lat: f64, #[case] lon: f64) {
        assert!(Location::new(lat, lon).is_ok());
    }

    #[rstest]
    #[case(90.1, 0.0)]
    #[case(-91.0, 0.0)]
    #[case(0.0, 180.5)]
    #[case(0.0, -181.0)]
    #[case(f64::NAN, 0.0)]
    #[case(0.0, f64::INFINITY)]
    fn test_invalid_coordinates(#[case] lat: f64, #[case] lon: f64) {
        let err = Location::new(lat, lon).unwrap_err();
        assert!(matches!(err, SkycastError::Validation { .. }));
    }

    #[test]
    fn test_display() {
        let named = Location::new(59.0, 10.0).unwrap().with_name("Stavern, Norway");
        assert_eq!(named.to_string(), "Stavern, Norway (59.00°N, 10.00°E)");

        let unnamed = Location::new(60.391, 5.3221).unwrap();
        assert_eq!(unnamed.to_string(), "60.39°N, 5.32°E");
    }

    #[test]
    fn test_cache_key_fragment() {
        let location = Location::new(59.912_345, 10.75).unwrap();
        assert_eq!(location.cache_key_fragment(), "59.9123:10.7500");
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Location =
            serde_json::from_str(r#"{"name":"Oslo","latitude":59.91,"longitude":10.75}"#).unwrap();
        assert_eq!(ok.name(), Some("Oslo"));
        assert_eq!(ok.timezone(), None);

        let bad = serde_json::from_str::<Location>(r#"{"name":null,"latitude":95.0,"longitude":0.0}"#);
        assert!(bad.is_err());
    }
}

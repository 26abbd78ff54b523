use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a stock is physically held. Coordinates are decimal degrees and may
/// be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Localisation {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl Localisation {
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            latitude: None,
            longitude: None,
        }
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Both coordinates, when both are known.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }

    /// Only the empty string counts as "no city".
    pub fn has_city(&self) -> bool {
        !self.city.is_empty()
    }
}

/// `City (lat, lon)` with four decimals, or just the city.
impl fmt::Display for Localisation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.coordinates() {
            Some((lat, lon)) => write!(f, "{} ({lat:.4}, {lon:.4})", self.city),
            None => f.write_str(&self.city),
        }
    }
}

pub fn is_valid_latitude(value: f64) -> bool {
    value.is_finite() && (-90.0..=90.0).contains(&value)
}

pub fn is_valid_longitude(value: f64) -> bool {
    value.is_finite() && (-180.0..=180.0).contains(&value)
}

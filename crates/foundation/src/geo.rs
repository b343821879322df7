use serde::Serialize;

/// Geographic position in degrees, longitude first.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn is_finite(self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

/// A named point of interest.
///
/// Points are created by ingestion and never mutated afterwards; a re-fetch
/// replaces the whole set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub position: LonLat,
    pub name: String,
}

impl Point {
    pub fn new(position: LonLat, name: impl Into<String>) -> Self {
        Self {
            position,
            name: name.into(),
        }
    }
}

use crate::geo::LonLat;

/// Geographic bounding box in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoBounds {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl GeoBounds {
    pub const fn new(min_lon: f64, max_lon: f64, min_lat: f64, max_lat: f64) -> Self {
        GeoBounds {
            min_lon,
            max_lon,
            min_lat,
            max_lat,
        }
    }

    /// Smallest box containing every position, or `None` for an empty input.
    pub fn from_positions(positions: impl IntoIterator<Item = LonLat>) -> Option<Self> {
        let mut iter = positions.into_iter();
        let first = iter.next()?;
        let mut b = GeoBounds::new(first.lon, first.lon, first.lat, first.lat);
        for p in iter {
            b.min_lon = b.min_lon.min(p.lon);
            b.max_lon = b.max_lon.max(p.lon);
            b.min_lat = b.min_lat.min(p.lat);
            b.max_lat = b.max_lat.max(p.lat);
        }
        Some(b)
    }

    /// Zero (or negative) width or height.
    pub fn is_degenerate(&self) -> bool {
        !(self.min_lon < self.max_lon && self.min_lat < self.max_lat)
    }

    pub fn contains(&self, p: LonLat) -> bool {
        (self.min_lon..=self.max_lon).contains(&p.lon)
            && (self.min_lat..=self.max_lat).contains(&p.lat)
    }

    pub fn clamp(&self, p: LonLat) -> LonLat {
        LonLat::new(
            p.lon.clamp(self.min_lon, self.max_lon),
            p.lat.clamp(self.min_lat, self.max_lat),
        )
    }

    pub fn center(&self) -> LonLat {
        LonLat::new(
            0.5 * (self.min_lon + self.max_lon),
            0.5 * (self.min_lat + self.max_lat),
        )
    }
}

/// Inclusive zoom interval.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ZoomRange {
    pub min: f64,
    pub max: f64,
}

impl ZoomRange {
    pub const fn new(min: f64, max: f64) -> Self {
        ZoomRange { min, max }
    }

    pub fn clamp(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min, self.max)
    }
}

/// The region a freely moving camera is allowed to show.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewBounds {
    pub area: GeoBounds,
    pub zoom: ZoomRange,
}

impl ViewBounds {
    pub const fn new(area: GeoBounds, zoom: ZoomRange) -> Self {
        ViewBounds { area, zoom }
    }
}

//! Web Mercator "world" coordinates.
//!
//! The world is a square of `TILE_SIZE` units at zoom 0; each zoom level
//! doubles the scale. `y` grows northward.

use std::f64::consts::PI;

use crate::geo::LonLat;

/// Size of the world square at zoom 0, in pixels.
pub const TILE_SIZE: f64 = 512.0;

/// Latitude limit of the Web Mercator projection (degrees).
pub const MERCATOR_MAX_LAT_DEG: f64 = 85.051_128_78;

pub fn lon_lat_to_world(p: LonLat) -> [f64; 2] {
    let lat = p.lat.clamp(-MERCATOR_MAX_LAT_DEG, MERCATOR_MAX_LAT_DEG);
    let lambda = p.lon.to_radians();
    let phi = lat.to_radians();
    let x = TILE_SIZE * (lambda + PI) / (2.0 * PI);
    let y = TILE_SIZE * (PI + (PI / 4.0 + phi * 0.5).tan().ln()) / (2.0 * PI);
    [x, y]
}

pub fn world_to_lon_lat(xy: [f64; 2]) -> LonLat {
    let lambda = xy[0] / TILE_SIZE * (2.0 * PI) - PI;
    let phi = 2.0 * ((xy[1] / TILE_SIZE * (2.0 * PI) - PI).exp().atan() - PI / 4.0);
    LonLat::new(lambda.to_degrees(), phi.to_degrees())
}

use foundation::bounds::GeoBounds;
use foundation::geo::{LonLat, Point};
use serde::Deserialize;
use serde_json::Value;

use crate::error::IngestError;

pub const OVERPASS_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

/// Area whose bus stops are fetched: greater São Paulo.
pub const SAO_PAULO_BBOX: GeoBounds = GeoBounds::new(-47.06, -46.30, -24.05, -23.30);

/// Name given to stops without a usable `name` tag.
pub const FALLBACK_NAME: &str = "Bus stop";

/// Overpass QL for every `highway=bus_stop` node inside `bounds`.
///
/// Overpass orders a bbox as south, west, north, east.
pub fn bus_stop_query(bounds: &GeoBounds) -> String {
    format!(
        "[out:json];(node[\"highway\"=\"bus_stop\"]({},{},{},{}););out body;",
        bounds.min_lat, bounds.min_lon, bounds.max_lat, bounds.max_lon
    )
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<Value>,
}

/// Parses an Overpass JSON body into points.
///
/// Only nodes with numeric coordinates survive; every other element is
/// dropped. A body without `elements` yields no points.
pub fn parse_response(body: &[u8]) -> Result<Vec<Point>, IngestError> {
    let response: OverpassResponse = serde_json::from_slice(body)?;
    Ok(response.elements.iter().filter_map(parse_element).collect())
}

fn parse_element(el: &Value) -> Option<Point> {
    if el.get("type").and_then(Value::as_str) != Some("node") {
        return None;
    }
    let lat = el.get("lat").and_then(Value::as_f64)?;
    let lon = el.get("lon").and_then(Value::as_f64)?;
    let name = el
        .get("tags")
        .and_then(|tags| tags.get("name"))
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_NAME);
    Some(Point::new(LonLat::new(lon, lat), name))
}

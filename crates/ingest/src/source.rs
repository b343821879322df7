use std::future::Future;
use std::pin::Pin;

use foundation::bounds::GeoBounds;
use foundation::geo::Point;
use tracing::{debug, info};

use crate::error::IngestError;
use crate::overpass::{OVERPASS_ENDPOINT, bus_stop_query, parse_response};

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Anything that can produce the points inside a bounding box.
///
/// Methods return boxed futures for dyn-compatibility.
pub trait PointSource: Send + Sync {
    fn fetch(&self, bounds: GeoBounds) -> BoxFuture<'_, Result<Vec<Point>, IngestError>>;
}

/// Bus stops from an Overpass API interpreter endpoint.
pub struct OverpassSource {
    endpoint: String,
    client: reqwest::Client,
}

impl OverpassSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }
}

impl Default for OverpassSource {
    fn default() -> Self {
        Self::new(OVERPASS_ENDPOINT)
    }
}

impl PointSource for OverpassSource {
    fn fetch(&self, bounds: GeoBounds) -> BoxFuture<'_, Result<Vec<Point>, IngestError>> {
        let query = bus_stop_query(&bounds);
        Box::pin(async move {
            debug!(endpoint = %self.endpoint, %query, "querying overpass");
            let resp = self
                .client
                .post(&self.endpoint)
                .form(&[("data", query.as_str())])
                .send()
                .await?;

            if !resp.status().is_success() {
                return Err(IngestError::Http(resp.status().as_u16()));
            }

            let body = resp.bytes().await?;
            let points = parse_response(&body)?;
            info!(count = points.len(), "fetched points");
            Ok(points)
        })
    }
}

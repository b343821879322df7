use std::sync::Arc;

use foundation::geo::Point;

use crate::error::IngestError;

/// Loading flag, last good point set and last error, as the HUD shows them.
///
/// A failed fetch keeps the previous points on screen.
#[derive(Debug, Clone)]
pub struct PointData {
    loading: bool,
    points: Arc<[Point]>,
    error: Option<String>,
}

impl Default for PointData {
    fn default() -> Self {
        Self {
            loading: false,
            points: Arc::from(Vec::new()),
            error: None,
        }
    }
}

impl PointData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Current point set. A new `Arc` is installed on every successful fetch.
    pub fn points(&self) -> &Arc<[Point]> {
        &self.points
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn finish(&mut self, result: Result<Vec<Point>, IngestError>) {
        self.loading = false;
        match result {
            Ok(points) => self.points = Arc::from(points),
            Err(err) => self.error = Some(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use foundation::geo::{LonLat, Point};

    use super::PointData;
    use crate::error::IngestError;

    fn stop(name: &str) -> Point {
        Point::new(LonLat::new(-46.6, -23.5), name)
    }

    #[test]
    fn begin_sets_loading_and_clears_error() {
        let mut data = PointData::new();
        data.finish(Err(IngestError::Http(500)));
        assert_eq!(data.error(), Some("HTTP 500"));

        data.begin();
        assert!(data.is_loading());
        assert_eq!(data.error(), None);
    }

    #[test]
    fn failure_keeps_previous_points() {
        let mut data = PointData::new();
        data.begin();
        data.finish(Ok(vec![stop("a"), stop("b")]));
        let before = data.points().clone();

        data.begin();
        data.finish(Err(IngestError::Http(503)));
        assert!(!data.is_loading());
        assert_eq!(data.error(), Some("HTTP 503"));
        assert!(Arc::ptr_eq(data.points(), &before));
    }

    #[test]
    fn success_replaces_points() {
        let mut data = PointData::new();
        data.finish(Ok(vec![stop("a")]));
        let first = data.points().clone();
        data.finish(Ok(vec![stop("a")]));
        assert!(!Arc::ptr_eq(data.points(), &first));
        assert_eq!(data.points().len(), 1);
    }
}

use std::sync::Arc;

use foundation::geo::Point;
use serde::Serialize;

use crate::symbology::Rgba;

/// Fixed look of the selected-point markers.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub radius_px: f64,
    pub fill_color: Rgba,
    pub line_color: Rgba,
    pub stroked: bool,
    pub line_width_min_px: f64,
    pub pickable: bool,
    pub auto_highlight: bool,
}

pub const MARKER_STYLE: MarkerStyle = MarkerStyle {
    radius_px: 4.0,
    fill_color: Rgba::new(255, 80, 80, 255),
    line_color: Rgba::new(255, 255, 255, 255),
    stroked: true,
    line_width_min_px: 1.0,
    pickable: true,
    auto_highlight: true,
};

/// Points drawn on top of a confirmed selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointDataset {
    pub points: Arc<[Point]>,
    pub style: MarkerStyle,
}

impl PointDataset {
    /// Markers exist only for a confirmed, non-empty selection.
    pub fn build(points: Arc<[Point]>, confirmed: bool) -> Option<PointDataset> {
        if !confirmed || points.is_empty() {
            return None;
        }
        Some(PointDataset {
            points,
            style: MARKER_STYLE,
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

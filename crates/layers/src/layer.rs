use std::sync::Arc;

use serde::Serialize;

use crate::basemap::MapStyle;
use crate::hex::HexDataset;
use crate::markers::PointDataset;

/// Stable layer identifier; pick events carry it back.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LayerId(pub &'static str);

impl LayerId {
    pub const BASEMAP: LayerId = LayerId("basemap");
    pub const HEX_CELLS: LayerId = LayerId("hex-cells");
    pub const SELECTED_POINTS: LayerId = LayerId("selected-points");
    pub const LABELS: LayerId = LayerId("labels");
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

pub trait Layer {
    fn id(&self) -> LayerId;
}

pub const TILE_MIN_ZOOM: u8 = 0;
pub const TILE_MAX_ZOOM: u8 = 19;
pub const TILE_SIZE_PX: u32 = 512;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileLayer {
    id: LayerId,
    pub url: &'static str,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub tile_size: u32,
    pub depth_test: bool,
}

impl TileLayer {
    pub fn new(id: LayerId, url: &'static str) -> Self {
        Self {
            id,
            url,
            min_zoom: TILE_MIN_ZOOM,
            max_zoom: TILE_MAX_ZOOM,
            tile_size: TILE_SIZE_PX,
            depth_test: true,
        }
    }

    /// Labels draw over extruded cells, so they skip the depth test.
    pub fn labels(url: &'static str) -> Self {
        Self {
            depth_test: false,
            ..Self::new(LayerId::LABELS, url)
        }
    }
}

impl Layer for TileLayer {
    fn id(&self) -> LayerId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HexLayer {
    id: LayerId,
    pub data: Arc<HexDataset>,
    pub extruded: bool,
    pub stroked: bool,
    pub filled: bool,
    pub elevation_scale: f64,
    pub line_width_min_px: f64,
}

impl HexLayer {
    pub fn new(data: Arc<HexDataset>) -> Self {
        Self {
            id: LayerId::HEX_CELLS,
            data,
            extruded: true,
            stroked: true,
            filled: true,
            elevation_scale: 1.0,
            line_width_min_px: 2.0,
        }
    }
}

impl Layer for HexLayer {
    fn id(&self) -> LayerId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointLayer {
    id: LayerId,
    pub data: Arc<PointDataset>,
}

impl PointLayer {
    pub fn new(data: Arc<PointDataset>) -> Self {
        Self {
            id: LayerId::SELECTED_POINTS,
            data,
        }
    }
}

impl Layer for PointLayer {
    fn id(&self) -> LayerId {
        self.id
    }
}

/// Declarative description handed to the rendering engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerDescriptor {
    Tile(TileLayer),
    Hex(HexLayer),
    Points(PointLayer),
}

impl Layer for LayerDescriptor {
    fn id(&self) -> LayerId {
        match self {
            LayerDescriptor::Tile(l) => l.id(),
            LayerDescriptor::Hex(l) => l.id(),
            LayerDescriptor::Points(l) => l.id(),
        }
    }
}

/// Bottom-to-top draw order: basemap, cells, markers, labels.
///
/// The marker layer is omitted without a dataset and the labels layer when
/// the style has no overlay.
pub fn build_layer_stack(
    style: &MapStyle,
    cells: Arc<HexDataset>,
    points: Option<Arc<PointDataset>>,
) -> Vec<LayerDescriptor> {
    let mut stack = Vec::with_capacity(4);
    stack.push(LayerDescriptor::Tile(TileLayer::new(LayerId::BASEMAP, style.url)));
    stack.push(LayerDescriptor::Hex(HexLayer::new(cells)));
    if let Some(points) = points {
        stack.push(LayerDescriptor::Points(PointLayer::new(points)));
    }
    if let Some(labels) = style.labels {
        stack.push(LayerDescriptor::Tile(TileLayer::labels(labels)));
    }
    stack
}

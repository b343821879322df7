use serde::Serialize;

/// A raster basemap plus its optional labels-only overlay.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct MapStyle {
    pub label: &'static str,
    pub url: &'static str,
    pub labels: Option<&'static str>,
}

pub const CARTO_VOYAGER: MapStyle = MapStyle {
    label: "Carto Voyager",
    url: "https://basemaps.cartocdn.com/rastertiles/voyager_nolabels/{z}/{x}/{y}@2x.png",
    labels: Some("https://basemaps.cartocdn.com/rastertiles/voyager_only_labels/{z}/{x}/{y}@2x.png"),
};

pub const CARTO_LIGHT: MapStyle = MapStyle {
    label: "Carto Light",
    url: "https://basemaps.cartocdn.com/rastertiles/light_all/{z}/{x}/{y}@2x.png",
    labels: Some("https://basemaps.cartocdn.com/rastertiles/light_only_labels/{z}/{x}/{y}@2x.png"),
};

pub const CARTO_DARK: MapStyle = MapStyle {
    label: "Carto Dark",
    url: "https://basemaps.cartocdn.com/rastertiles/dark_all/{z}/{x}/{y}@2x.png",
    labels: Some("https://basemaps.cartocdn.com/rastertiles/dark_only_labels/{z}/{x}/{y}@2x.png"),
};

pub const OPEN_STREET_MAP: MapStyle = MapStyle {
    label: "OpenStreetMap",
    url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
    labels: None,
};

/// Styles offered by the style picker, default first.
pub const MAP_STYLES: [MapStyle; 4] = [CARTO_VOYAGER, CARTO_LIGHT, CARTO_DARK, OPEN_STREET_MAP];

impl Default for MapStyle {
    fn default() -> Self {
        CARTO_VOYAGER
    }
}

impl MapStyle {
    /// Looks a style up by its tile URL, the key the picker reports.
    pub fn find_by_url(url: &str) -> Option<MapStyle> {
        MAP_STYLES.iter().copied().find(|s| s.url == url)
    }

    /// Case-insensitive lookup by display label.
    pub fn find_by_label(label: &str) -> Option<MapStyle> {
        MAP_STYLES
            .iter()
            .copied()
            .find(|s| s.label.eq_ignore_ascii_case(label))
    }
}

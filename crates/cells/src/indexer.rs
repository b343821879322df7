use foundation::geo::LonLat;
use foundation::ids::CellId;
use h3o::{LatLng, Resolution};

#[derive(Debug, Clone, PartialEq)]
pub enum CellIndexError {
    InvalidResolution(u8),
    InvalidPosition { lon: f64, lat: f64 },
}

impl std::fmt::Display for CellIndexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellIndexError::InvalidResolution(r) => write!(f, "unsupported cell resolution: {r}"),
            CellIndexError::InvalidPosition { lon, lat } => {
                write!(f, "position cannot be indexed: lon={lon} lat={lat}")
            }
        }
    }
}

impl std::error::Error for CellIndexError {}

/// Maps a position to the cell containing it at a resolution.
///
/// Implementations must be deterministic in `(position, resolution)`.
pub trait CellIndexer {
    fn cell_for(&self, position: LonLat, resolution: u8) -> Result<CellId, CellIndexError>;
}

/// H3 hexagonal cells. Ids are the canonical 15-digit hex strings.
#[derive(Debug, Copy, Clone, Default)]
pub struct H3Indexer;

impl CellIndexer for H3Indexer {
    fn cell_for(&self, position: LonLat, resolution: u8) -> Result<CellId, CellIndexError> {
        let res = Resolution::try_from(resolution)
            .map_err(|_| CellIndexError::InvalidResolution(resolution))?;
        let ll = LatLng::new(position.lat, position.lon).map_err(|_| {
            CellIndexError::InvalidPosition {
                lon: position.lon,
                lat: position.lat,
            }
        })?;
        Ok(CellId::new(ll.to_cell(res).to_string()))
    }
}

use foundation::geo::LonLat;
use foundation::ids::CellId;

use crate::indexer::{CellIndexError, CellIndexer};

/// Square grid of `1 / resolution` degrees; ids read `r{res}:{col}:{row}`.
pub struct GridIndexer;

impl CellIndexer for GridIndexer {
    fn cell_for(&self, position: LonLat, resolution: u8) -> Result<CellId, CellIndexError> {
        if resolution == 0 {
            return Err(CellIndexError::InvalidResolution(0));
        }
        if !position.is_finite() {
            return Err(CellIndexError::InvalidPosition {
                lon: position.lon,
                lat: position.lat,
            });
        }
        let step = 1.0 / f64::from(resolution);
        let col = (position.lon / step).floor() as i64;
        let row = (position.lat / step).floor() as i64;
        Ok(CellId::new(format!("r{resolution}:{col}:{row}")))
    }
}

use foundation::geo::Point;
use foundation::ids::CellId;
use serde::Serialize;
use tracing::warn;

use crate::indexer::CellIndexer;

/// A point together with the cell it falls in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellAssignment {
    pub point: Point,
    pub cell_id: CellId,
}

/// Assigns every point to its cell at `resolution`.
///
/// Input order is preserved. Points the indexer rejects are dropped; the
/// resolution range itself is a UI concern and is not checked here.
pub fn assign<I>(points: &[Point], resolution: u8, indexer: &I) -> Vec<CellAssignment>
where
    I: CellIndexer + ?Sized,
{
    let mut out = Vec::with_capacity(points.len());
    let mut rejected = 0usize;
    let mut first_error = None;

    for point in points {
        match indexer.cell_for(point.position, resolution) {
            Ok(cell_id) => out.push(CellAssignment {
                point: point.clone(),
                cell_id,
            }),
            Err(err) => {
                rejected += 1;
                first_error.get_or_insert(err);
            }
        }
    }

    if let Some(err) = first_error {
        warn!(rejected, resolution, "skipped points without a cell: {err}");
    }
    out
}

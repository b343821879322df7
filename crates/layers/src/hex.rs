use cells::CellAggregate;
use foundation::ids::CellId;
use scene::SelectionState;
use serde::Serialize;

use crate::symbology::{Rgba, cell_elevation, cell_fill, cell_line};

/// Render attributes of one cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellVisual {
    pub cell_id: CellId,
    pub count: u32,
    pub fill_color: Rgba,
    pub line_color: Rgba,
    pub elevation: f64,
    pub pickable: bool,
}

/// Everything the hexagon layer draws.
///
/// `pickable` applies to the whole layer: clicks toggle cells only while the
/// selection is not confirmed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HexDataset {
    pub cells: Vec<CellVisual>,
    pub pickable: bool,
}

impl HexDataset {
    pub fn from_selection(aggregates: &[CellAggregate], selection: &SelectionState) -> Self {
        build_cell_visuals(
            aggregates,
            |id| selection.contains(id),
            selection.is_confirmed(),
        )
    }
}

/// Combines counts and selection into per-cell visuals.
///
/// When `confirmed`, only chosen cells are emitted; otherwise every aggregate
/// is. Aggregate order is preserved.
pub fn build_cell_visuals(
    aggregates: &[CellAggregate],
    is_chosen: impl Fn(&CellId) -> bool,
    confirmed: bool,
) -> HexDataset {
    let pickable = !confirmed;
    let cells = aggregates
        .iter()
        .filter_map(|agg| {
            let chosen = is_chosen(&agg.cell_id);
            if confirmed && !chosen {
                return None;
            }
            Some(CellVisual {
                cell_id: agg.cell_id.clone(),
                count: agg.count,
                fill_color: cell_fill(agg.count, chosen, confirmed),
                line_color: cell_line(chosen),
                elevation: cell_elevation(agg.count, chosen, confirmed),
                pickable,
            })
        })
        .collect();
    HexDataset { cells, pickable }
}

use std::collections::BTreeMap;

use foundation::ids::CellId;
use serde::Serialize;

use crate::assign::CellAssignment;

/// Number of points in one cell. `count` is always at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellAggregate {
    pub cell_id: CellId,
    pub count: u32,
}

/// Groups assignments by cell.
///
/// Output is sorted by `cell_id` ascending so results are reproducible.
pub fn aggregate(assignments: &[CellAssignment]) -> Vec<CellAggregate> {
    let mut counts: BTreeMap<&CellId, u32> = BTreeMap::new();
    for a in assignments {
        *counts.entry(&a.cell_id).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(cell_id, count)| CellAggregate {
            cell_id: cell_id.clone(),
            count,
        })
        .collect()
}

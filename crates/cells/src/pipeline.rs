use std::sync::Arc;

use foundation::geo::Point;
use runtime::memo::{Identity, Memo, MemoStats};
use tracing::debug;

use crate::aggregate::{CellAggregate, aggregate};
use crate::assign::{CellAssignment, assign};
use crate::indexer::{CellIndexer, H3Indexer};

/// Output of one pipeline pass.
#[derive(Debug, Clone)]
pub struct CellSnapshot {
    pub assignments: Arc<[CellAssignment]>,
    pub aggregates: Arc<[CellAggregate]>,
}

/// Memoized assignment + aggregation.
///
/// Invalidation rules:
/// - assignments recompute only when the point set (by identity) or the
///   resolution changes;
/// - aggregates recompute only when the assignment set (by identity) changes.
///
/// Unchanged inputs therefore return pointer-identical `Arc`s, which lets the
/// layer builder skip rebuilding datasets.
#[derive(Debug)]
pub struct CellPipeline<I = H3Indexer> {
    indexer: I,
    assignments: Memo<(Identity<[Point]>, u8), [CellAssignment]>,
    aggregates: Memo<Identity<[CellAssignment]>, [CellAggregate]>,
}

impl Default for CellPipeline<H3Indexer> {
    fn default() -> Self {
        Self::new(H3Indexer)
    }
}

impl<I: CellIndexer> CellPipeline<I> {
    pub fn new(indexer: I) -> Self {
        Self {
            indexer,
            assignments: Memo::new(),
            aggregates: Memo::new(),
        }
    }

    pub fn assignments(&mut self, points: &Arc<[Point]>, resolution: u8) -> Arc<[CellAssignment]> {
        let indexer = &self.indexer;
        self.assignments
            .get_or_compute((Identity::of(points), resolution), || {
                debug!(points = points.len(), resolution, "assigning points to cells");
                Arc::from(assign(points, resolution, indexer))
            })
    }

    pub fn aggregates(&mut self, assignments: &Arc<[CellAssignment]>) -> Arc<[CellAggregate]> {
        self.aggregates
            .get_or_compute(Identity::of(assignments), || {
                let out = aggregate(assignments);
                debug!(cells = out.len(), "aggregated cell counts");
                Arc::from(out)
            })
    }

    pub fn run(&mut self, points: &Arc<[Point]>, resolution: u8) -> CellSnapshot {
        let assignments = self.assignments(points, resolution);
        let aggregates = self.aggregates(&assignments);
        CellSnapshot {
            assignments,
            aggregates,
        }
    }

    pub fn assignment_stats(&self) -> MemoStats {
        self.assignments.stats()
    }

    pub fn aggregate_stats(&self) -> MemoStats {
        self.aggregates.stats()
    }
}

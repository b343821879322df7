use std::collections::HashSet;

use cells::CellAssignment;
use foundation::geo::Point;
use foundation::ids::CellId;
use tracing::debug;

/// Number of chosen cells listed individually by the HUD.
pub const PREVIEW_LIMIT: usize = 5;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SelectionPhase {
    Empty,
    Selecting,
    Confirmed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// `confirm` was requested while no cell is chosen.
    EmptySelectionConfirm,
}

impl std::fmt::Display for SelectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionError::EmptySelectionConfirm => {
                write!(f, "cannot confirm an empty selection")
            }
        }
    }
}

impl std::error::Error for SelectionError {}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
    /// The set is frozen by a confirmation.
    Ignored,
}

/// Chosen cells plus the confirmation flag.
///
/// Membership is a hash set; `order` keeps insertion order for display only.
/// Invariant: `confirmed` implies a non-empty set that has not been mutated
/// since it was confirmed.
///
/// Equality compares membership, order and the flag. The revision counter is
/// bookkeeping for memoization and is ignored.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    members: HashSet<CellId>,
    order: Vec<CellId>,
    confirmed: bool,
    revision: u64,
}

impl PartialEq for SelectionState {
    fn eq(&self, other: &Self) -> bool {
        self.confirmed == other.confirmed && self.order == other.order
    }
}

impl Eq for SelectionState {}

/// Display view of the chosen cells: the first few ids and how many remain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPreview<'a> {
    pub shown: &'a [CellId],
    pub more: usize,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SelectionPhase {
        match (self.members.is_empty(), self.confirmed) {
            (true, _) => SelectionPhase::Empty,
            (false, false) => SelectionPhase::Selecting,
            (false, true) => SelectionPhase::Confirmed,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, cell: &CellId) -> bool {
        self.members.contains(cell)
    }

    /// Chosen cells in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CellId> + '_ {
        self.order.iter()
    }

    /// Bumped on every effective mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Flips membership of `cell`.
    ///
    /// Toggling is driven by map clicks, which are disabled while the
    /// selection is confirmed; a toggle in that phase changes nothing.
    pub fn toggle(&mut self, cell: CellId) -> Toggle {
        if self.confirmed {
            debug!(%cell, "toggle ignored on a confirmed selection");
            return Toggle::Ignored;
        }
        let outcome = if self.members.remove(&cell) {
            self.order.retain(|c| *c != cell);
            Toggle::Removed
        } else {
            self.order.push(cell.clone());
            self.members.insert(cell);
            Toggle::Added
        };
        self.revision += 1;
        outcome
    }

    /// Removes `cell` and drops the confirmation.
    ///
    /// Returns `true` if anything changed.
    pub fn remove(&mut self, cell: &CellId) -> bool {
        let removed = self.members.remove(cell);
        if removed {
            self.order.retain(|c| c != cell);
        }
        let changed = removed || self.confirmed;
        self.confirmed = false;
        if changed {
            self.revision += 1;
        }
        changed
    }

    /// Empties the set and drops the confirmation.
    pub fn clear(&mut self) {
        if self.members.is_empty() && !self.confirmed {
            return;
        }
        self.members.clear();
        self.order.clear();
        self.confirmed = false;
        self.revision += 1;
    }

    /// Freezes the current set.
    pub fn confirm(&mut self) -> Result<(), SelectionError> {
        if self.members.is_empty() {
            return Err(SelectionError::EmptySelectionConfirm);
        }
        if !self.confirmed {
            self.confirmed = true;
            self.revision += 1;
        }
        Ok(())
    }

    /// Returns to `Selecting` keeping the members. Returns `true` if the flag changed.
    pub fn unconfirm(&mut self) -> bool {
        if !self.confirmed {
            return false;
        }
        self.confirmed = false;
        self.revision += 1;
        true
    }

    /// `confirm(true)` / `confirm(false)` as a single entry point.
    pub fn set_confirmed(&mut self, confirmed: bool) -> Result<(), SelectionError> {
        if confirmed {
            self.confirm()
        } else {
            self.unconfirm();
            Ok(())
        }
    }

    pub fn preview(&self, limit: usize) -> SelectionPreview<'_> {
        let n = self.order.len().min(limit);
        SelectionPreview {
            shown: &self.order[..n],
            more: self.order.len() - n,
        }
    }

    /// Points whose cell is chosen, in assignment order.
    pub fn selected_points(&self, assignments: &[CellAssignment]) -> Vec<Point> {
        if self.members.is_empty() {
            return Vec::new();
        }
        assignments
            .iter()
            .filter(|a| self.members.contains(&a.cell_id))
            .map(|a| a.point.clone())
            .collect()
    }
}

use std::fmt;

use foundation::ids::CellId;
use scene::PREVIEW_LIMIT;
use serde::Serialize;

use crate::store::Explorer;

/// Chosen-cells block of the HUD. The per-cell list is only shown while the
/// selection can still be edited.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionSummary {
    pub cells: usize,
    pub points: usize,
    pub confirmed: bool,
    pub preview: Vec<CellId>,
    pub more: usize,
}

/// Text-level view of the explorer state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSummary {
    pub style: &'static str,
    pub resolution: u8,
    pub pitch: f64,
    pub bearing: f64,
    pub loading: bool,
    pub error: Option<String>,
    pub points: usize,
    pub cells: usize,
    pub selection: Option<SelectionSummary>,
}

impl HudSummary {
    pub fn of(explorer: &mut Explorer) -> Self {
        let cells = explorer.cells().aggregates.len();
        let selected_points = explorer.selected_points().len();
        let pose = explorer.camera().pose();
        let data = explorer.point_data();
        let selection = explorer.selection();

        let selection = (!selection.is_empty()).then(|| {
            let (preview, more) = if selection.is_confirmed() {
                (Vec::new(), 0)
            } else {
                let p = selection.preview(PREVIEW_LIMIT);
                (p.shown.to_vec(), p.more)
            };
            SelectionSummary {
                cells: selection.len(),
                points: selected_points,
                confirmed: selection.is_confirmed(),
                preview,
                more,
            }
        });

        Self {
            style: explorer.style().label,
            resolution: explorer.resolution(),
            pitch: pose.pitch,
            bearing: pose.bearing,
            loading: data.is_loading(),
            error: data.error().map(str::to_string),
            points: data.points().len(),
            cells,
            selection,
        }
    }
}

impl fmt::Display for HudSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "map: {}", self.style)?;
        writeln!(
            f,
            "camera: pitch {:.0} bearing {:.0}",
            self.pitch, self.bearing
        )?;
        writeln!(f, "resolution: {}", self.resolution)?;
        if self.loading {
            writeln!(f, "loading...")?;
        }
        if let Some(err) = &self.error {
            writeln!(f, "error: {err}")?;
        }
        writeln!(f, "stops: {}  cells: {}", self.points, self.cells)?;

        let Some(sel) = &self.selection else {
            return Ok(());
        };
        let plural = if sel.cells > 1 { "s" } else { "" };
        write!(f, "{} cell{plural} selected", sel.cells)?;
        if sel.confirmed {
            write!(f, " (confirmed)")?;
        }
        writeln!(f)?;
        writeln!(f, "{} bus stops", sel.points)?;
        for id in &sel.preview {
            writeln!(f, "  {id}")?;
        }
        if sel.more > 0 {
            writeln!(f, "  +{} more", sel.more)?;
        }
        Ok(())
    }
}

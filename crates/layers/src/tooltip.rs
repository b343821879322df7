use foundation::geo::Point;
use foundation::ids::CellId;

use crate::layer::LayerId;

/// The object under the cursor, as reported by the rendering engine.
#[derive(Debug, Clone, PartialEq)]
pub enum PickedObject {
    Cell { cell_id: CellId, count: u32 },
    Point(Point),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickEvent {
    pub layer: LayerId,
    pub object: PickedObject,
}

/// Hover text. Cells have none; the HUD already lists them.
pub fn tooltip(object: &PickedObject) -> Option<String> {
    match object {
        PickedObject::Point(p) => Some(format!(
            "{}\n({:.4}, {:.4})",
            p.name, p.position.lat, p.position.lon
        )),
        PickedObject::Cell { .. } => None,
    }
}

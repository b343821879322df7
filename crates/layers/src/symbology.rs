use serde::Serialize;

/// 8-bit RGBA color, serialized as `[r, g, b, a]`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba([r, g, b, a])
    }
}

/// Elevation per point in a cell (meters).
pub const ELEVATION_PER_POINT: f64 = 15.0;

pub const CHOSEN_FILL: Rgba = Rgba::new(0, 220, 255, 120);
pub const CHOSEN_FILL_CONFIRMED: Rgba = Rgba::new(0, 220, 255, 40);
pub const CHOSEN_LINE: Rgba = Rgba::new(0, 255, 255, 255);
pub const CELL_LINE: Rgba = Rgba::new(40, 40, 40, 200);

/// Heat ramp for unselected cells: green fades from 255 to a floor of 50
/// as the count grows.
pub fn density_fill(count: u32) -> Rgba {
    let green = (255i64 - i64::from(count) * 3).max(50);
    Rgba::new(255, green as u8, 0, 180)
}

/// Fill for a cell given its selection state.
pub fn cell_fill(count: u32, chosen: bool, confirmed: bool) -> Rgba {
    match (chosen, confirmed) {
        (true, true) => CHOSEN_FILL_CONFIRMED,
        (true, false) => CHOSEN_FILL,
        (false, _) => density_fill(count),
    }
}

pub fn cell_line(chosen: bool) -> Rgba {
    if chosen { CHOSEN_LINE } else { CELL_LINE }
}

/// Chosen cells flatten once confirmed so the point markers stay visible.
pub fn cell_elevation(count: u32, chosen: bool, confirmed: bool) -> f64 {
    if chosen && confirmed {
        0.0
    } else {
        f64::from(count) * ELEVATION_PER_POINT
    }
}

//! Point ingestion: the Overpass query and response format, the
//! `PointSource` seam, and the cancellable loader feeding `PointData`.

pub mod error;
pub mod loader;
pub mod overpass;
pub mod source;
pub mod state;

pub use error::*;
pub use loader::*;
pub use overpass::*;
pub use source::*;
pub use state::*;

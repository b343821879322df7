pub mod basemap;
pub mod hex;
pub mod layer;
pub mod markers;
pub mod symbology;
pub mod tooltip;

pub use basemap::*;
pub use hex::*;
pub use layer::*;
pub use markers::*;
pub use symbology::*;
pub use tooltip::*;

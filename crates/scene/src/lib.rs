pub mod camera;
pub mod fit;
pub mod selection;

pub use camera::*;
pub use fit::*;
pub use selection::*;

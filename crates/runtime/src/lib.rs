pub mod clock;
pub mod event_bus;
pub mod memo;

pub use clock::*;
pub use event_bus::*;
pub use memo::*;

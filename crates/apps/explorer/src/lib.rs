//! Explorer application: the store tying ingestion, binning, selection,
//! camera and layers together, plus its configuration and async driver.

pub mod config;
pub mod hud;
pub mod session;
pub mod store;

pub use config::*;
pub use hud::*;
pub use session::*;
pub use store::*;

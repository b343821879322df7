use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// Opaque identifier of a spatial cell at some resolution.
///
/// Cheap to clone: the text is shared.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CellId(Arc<str>);

impl CellId {
    pub fn new(id: impl AsRef<str>) -> Self {
        CellId(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CellId {
    fn from(value: &str) -> Self {
        CellId::new(value)
    }
}

impl From<String> for CellId {
    fn from(value: String) -> Self {
        CellId(Arc::from(value))
    }
}

/// Failure of a single point fetch. No retry is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    /// The endpoint answered with a non-success status.
    Http(u16),
    /// The request never produced a response.
    Network(String),
    /// The body was not the JSON we expect.
    Decode(String),
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::Http(status) => write!(f, "HTTP {status}"),
            IngestError::Network(msg) => write!(f, "network error: {msg}"),
            IngestError::Decode(msg) => write!(f, "invalid response: {msg}"),
        }
    }
}

impl std::error::Error for IngestError {}

impl From<reqwest::Error> for IngestError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => IngestError::Http(status.as_u16()),
            None if err.is_decode() => IngestError::Decode(err.to_string()),
            None => IngestError::Network(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        IngestError::Decode(err.to_string())
    }
}

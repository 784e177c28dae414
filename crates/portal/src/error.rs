//! Request error taxonomy
//!
//! Every call against the portal backend fails with one of these kinds.
//! Controllers turn them into danger notifications; nothing here is fatal.

/// Failure of a single portal request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// The request never produced a response (connection refused, DNS, reset)
    #[error("network error: {0}")]
    Network(String),
    /// The request exceeded the configured timeout
    #[error("request timed out")]
    Timeout,
    /// The server answered with a non-2xx status
    #[error("request failed with status {status}: {message}")]
    Http { status: u16, message: String },
    /// The response body was not the JSON we expected
    #[error("unexpected response: {0}")]
    Protocol(String),
    /// The server reported `success: false`
    #[error("{0}")]
    Application(String),
}

/// Result type for portal requests
pub type RequestResult<T> = std::result::Result<T, RequestError>;

impl RequestError {
    /// Text to show on the notification surface.
    ///
    /// Server-supplied messages win; everything else falls back to the
    /// action-specific `fallback` text.
    pub fn notice(&self, fallback: &str) -> String {
        match self {
            Self::Application(message) | Self::Http { message, .. } if !message.is_empty() => {
                message.clone()
            }
            Self::Timeout => format!("{} (request timed out)", fallback),
            _ => fallback.to_string(),
        }
    }

    /// HTTP status, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

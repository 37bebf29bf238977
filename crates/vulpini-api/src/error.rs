use thiserror::Error;

/// Internal error type for the `vulpini-api` crate.
///
/// These never cross the public surface of [`crate::MonitorClient`]:
/// read operations collapse them to `None`/empty fallbacks and mutations
/// collapse them to a failed [`crate::MutationOutcome`]. They exist so the
/// request helpers can use `?` and so the logs say what actually broke.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The base URL cannot carry extra path segments.
    #[error("base URL cannot be extended with a path")]
    InvalidPath,

    /// The server answered with a non-success status or envelope.
    #[error("management API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this looks like the backend simply not being up,
    /// as opposed to a protocol-level problem.
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}

//! Error types for the news API client.
//!
//! Every failure mode of a page fetch is folded into [`FetchError`] so the
//! paging feed only ever branches on a tagged result, never on a panic or a
//! raw transport error escaping the client boundary.

use thiserror::Error;

/// A failed page fetch.
///
/// The three variants mirror where the request died: on the wire, at the
/// server, or while decoding the body.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connectivity failure, including request timeouts.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("server responded with status {status}")]
    Server {
        /// The HTTP status code the server returned.
        status: u16,
    },

    /// The body was not the JSON shape this client expects.
    #[error("malformed response: {0}")]
    Parse(String),
}

impl FetchError {
    /// Short tag for status lines and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "network",
            FetchError::Server { .. } => "server",
            FetchError::Parse(_) => "parse",
        }
    }
}

//! Error types for JMAP operations.

/// Result type alias for JMAP operations.
pub type Result<T> = std::result::Result<T, Error>;

/// JMAP error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The transport answered with a body it could not process.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The bearer token was rejected.
    #[error("Authorization header in an invalid format or has an invalid token")]
    Unauthorized,

    /// Response body is not valid JSON or lacks a required field.
    #[error("Protocol error: {0}")]
    Protocol(#[from] serde_json::Error),

    /// The query stage of a batched request failed on the server.
    #[error("Query failed: {kind} - {description}")]
    Query {
        /// JMAP error type (e.g., `unsupportedFilter`).
        kind: String,
        /// Human-readable description.
        description: String,
    },

    /// The get stage of a batched request failed on the server.
    #[error("Fetch failed: {kind} - {description}")]
    Fetch {
        /// JMAP error type (e.g., `invalidArguments`).
        kind: String,
        /// Human-readable description.
        description: String,
    },

    /// The server refused to return that many objects in one get.
    #[error("Request too large: {description}")]
    RequestTooLarge {
        /// Human-readable description.
        description: String,
    },

    /// The response was well-formed JSON but not a valid answer to the request.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Creates a query-stage error from a JMAP error type and description.
    #[must_use]
    pub fn query(kind: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Query {
            kind: kind.into(),
            description: description.into(),
        }
    }

    /// Creates a get-stage error from a JMAP error type and description.
    ///
    /// `requestTooLarge` is mapped to [`Error::RequestTooLarge`].
    #[must_use]
    pub fn fetch(kind: impl Into<String>, description: impl Into<String>) -> Self {
        let kind = kind.into();
        if kind == "requestTooLarge" {
            return Self::RequestTooLarge {
                description: description.into(),
            };
        }
        Self::Fetch {
            kind,
            description: description.into(),
        }
    }
}

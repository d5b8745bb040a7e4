//! Error types for loki-client.

/// Result type alias for loki-client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Maximum number of body characters rendered in error messages.
const MAX_BODY_DISPLAY: usize = 500;

/// Error type for loki-client operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Shorthand for an [`ErrorKind::InvalidArgument`] error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument(message.into()))
    }

    /// Shorthand for an [`ErrorKind::Config`] error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config(message.into()))
    }

    /// Returns true if the request that produced this error may be retried.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    /// Returns true if this error was caused by a bad argument.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidArgument(_))
    }

    /// Returns true if this is a transport-level failure.
    pub fn is_transport(&self) -> bool {
        matches!(self.kind, ErrorKind::Transport(_))
    }

    /// Returns the HTTP status if this is a status error.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Invalid client configuration (missing or malformed base URL, bad header).
    #[error("Configuration error: {0}")]
    Config(String),

    /// A query parameter failed validation. No request was sent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Connection failure, timeout, or retries exhausted on a transport failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-2xx response while HTTP errors are not ignored.
    #[error("HTTP status error: {status} {}", truncate_body(.body))]
    HttpStatus { status: u16, body: String },

    /// Response body is not valid JSON.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl ErrorKind {
    /// Returns true if this error kind is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Transport(_))
    }
}

fn truncate_body(body: &str) -> String {
    if body.chars().count() <= MAX_BODY_DISPLAY {
        return body.to_string();
    }
    let mut truncated: String = body.chars().take(MAX_BODY_DISPLAY).collect();
    truncated.push_str("...[truncated]");
    truncated
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_builder() {
            ErrorKind::Config(err.to_string())
        } else if err.is_decode() {
            ErrorKind::Decode(err.to_string())
        } else {
            ErrorKind::Transport(err.to_string())
        };

        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Decode(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::Config(format!("Invalid URL: {}", err)), err)
    }
}

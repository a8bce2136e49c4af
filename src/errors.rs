//! Error taxonomy for launchbot
//!
//! `ApiError` covers the upstream market-data client. A `NotFound` is a
//! normal empty result for single-entity lookups and is never retried;
//! network and server-side failures are transient and retried with backoff.

#[derive(Debug, Clone)]
pub enum ApiError {
    /// Single-entity lookup miss - empty result, not a failure
    NotFound,
    /// Connection-level failure (DNS, refused, reset)
    Network(String),
    /// Request exceeded the client timeout
    Timeout,
    /// Non-success HTTP status from the API
    Http { status: u16, body: String },
    /// Response body could not be decoded
    Parse(String),
    /// Request rejected before dispatch (caller-side misuse)
    InvalidRequest(String),
}

impl ApiError {
    /// Whether a retry with backoff makes sense for this error
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::NotFound => false,
            ApiError::Network(_) => true,
            ApiError::Timeout => true,
            ApiError::Http { status, .. } => *status == 429 || *status >= 500,
            ApiError::Parse(_) => false,
            ApiError::InvalidRequest(_) => false,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotFound => write!(f, "Not found"),
            ApiError::Network(msg) => write!(f, "Network error: {}", msg),
            ApiError::Timeout => write!(f, "Request timeout"),
            ApiError::Http { status, body } => write!(f, "HTTP {}: {}", status, body),
            ApiError::Parse(msg) => write!(f, "Invalid response: {}", msg),
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Rejected input at a CRUD boundary (malformed alert condition, empty
/// address). Never enters the pipeline.
#[derive(Debug, Clone)]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Validation error: {}", self.0)
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_not_retryable() {
        assert!(!ApiError::NotFound.is_retryable());
        assert!(ApiError::Network("reset".into()).is_retryable());
        assert!(ApiError::Timeout.is_retryable());
    }

    #[test]
    fn server_errors_are_retryable_client_errors_are_not() {
        let server = ApiError::Http { status: 503, body: String::new() };
        let throttled = ApiError::Http { status: 429, body: String::new() };
        let client = ApiError::Http { status: 400, body: String::new() };
        assert!(server.is_retryable());
        assert!(throttled.is_retryable());
        assert!(!client.is_retryable());
    }
}

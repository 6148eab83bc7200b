//! Error types for the Metal client library.

use serde::Deserialize;
use thiserror::Error;

/// The main error type for all Metal client operations.
#[derive(Error, Debug)]
pub enum MetalError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP request with middleware failed
    #[error("HTTP request failed: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// Query string serialization error
    #[error("Query string error: {0}")]
    Query(String),

    /// The API answered with a non-success status
    #[error("Metal API error: {0}")]
    Api(ApiError),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_ms:?}ms")]
    RateLimitExceeded {
        /// Suggested wait time in milliseconds before retrying
        retry_after_ms: Option<u64>,
    },

    /// Caller input rejected before any request was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid response from the API
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Missing required credentials
    #[error("Missing credentials: an API token is required")]
    MissingCredentials,
}

impl From<serde_urlencoded::ser::Error> for MetalError {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        MetalError::Query(err.to_string())
    }
}

/// An error reported by the API in a non-success response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code of the response
    pub status: u16,
    /// Error messages from the response body
    pub errors: Vec<String>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.errors.is_empty() {
            write!(f, "HTTP {}", self.status)
        } else {
            write!(f, "HTTP {}: {}", self.status, self.errors.join(", "))
        }
    }
}

impl ApiError {
    /// Create a new API error from a status and its messages.
    pub fn new(status: u16, errors: Vec<String>) -> Self {
        Self { status, errors }
    }

    /// Parse an API error from a response body.
    ///
    /// The API reports failures as `{"errors": ["..."]}`, and some endpoints
    /// use a single `{"error": "..."}` instead. Bodies that are not JSON are
    /// kept verbatim as the only message.
    pub fn from_body(status: u16, body: &str) -> Self {
        #[derive(Deserialize)]
        struct ErrorBody {
            #[serde(default)]
            errors: Option<Vec<String>>,
            #[serde(default)]
            error: Option<String>,
        }

        let errors = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => {
                let mut errors = parsed.errors.unwrap_or_default();
                if let Some(single) = parsed.error {
                    if !single.is_empty() {
                        errors.push(single);
                    }
                }
                errors
            }
            Err(_) if body.trim().is_empty() => Vec::new(),
            Err(_) => vec![body.trim().to_string()],
        };

        Self::new(status, errors)
    }

    /// Check if the resource was not found.
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Check if the token was missing or rejected.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Check if the token lacks access to the resource.
    pub fn is_forbidden(&self) -> bool {
        self.status == 403
    }

    /// Check if the server rejected the request payload.
    pub fn is_unprocessable(&self) -> bool {
        self.status == 422
    }
}

//! The request/response seam between resource services and HTTP.
//!
//! Resource services describe each call as an [`ApiRequest`] and hand it to a
//! [`Transport`]. [`MetalClient`](crate::rest::MetalClient) is the HTTP
//! implementation; tests substitute an in-memory one.

use std::future::Future;
use std::sync::Arc;

use reqwest::Method;
use reqwest::header::HeaderMap;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::MetalError;
use crate::types::Timestamp;

/// Rate limit header names.
pub mod headers {
    /// Requests allowed in the current window.
    pub const RATE_LIMIT: &str = "x-ratelimit-limit";
    /// Requests left in the current window.
    pub const RATE_REMAINING: &str = "x-ratelimit-remaining";
    /// Unix time at which the window resets.
    pub const RATE_RESET: &str = "x-ratelimit-reset";
}

/// A single API call, independent of any HTTP library.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Path relative to the API root, including any query string
    pub path: String,
    /// JSON body, if any
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    /// Create a request with no body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    /// Create a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Create a POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Create a DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body.
    pub fn with_body<B>(mut self, body: &B) -> Result<Self, MetalError>
    where
        B: Serialize + ?Sized,
    {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

/// A successful API response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Rate limit state reported with the response
    pub rate: Option<Rate>,
    /// Raw response body
    pub body: String,
}

impl ApiResponse {
    /// Create a response with no rate limit information.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            rate: None,
            body: body.into(),
        }
    }

    /// Deserialize the body as JSON.
    pub fn json<T>(&self) -> Result<T, MetalError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(&self.body).map_err(|e| {
            MetalError::InvalidResponse(format!(
                "Failed to parse response: {}. Body: {}",
                e, self.body
            ))
        })
    }
}

/// Rate limit state from the `X-RateLimit-*` response headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rate {
    /// Requests allowed in the current window
    pub limit: u32,
    /// Requests left in the current window
    pub remaining: u32,
    /// When the window resets
    pub reset: Option<Timestamp>,
}

impl Rate {
    /// Read rate limit headers, returning `None` when the limit is absent.
    pub fn from_headers(map: &HeaderMap) -> Option<Self> {
        fn parse<T: std::str::FromStr>(map: &HeaderMap, name: &str) -> Option<T> {
            map.get(name)?.to_str().ok()?.trim().parse().ok()
        }

        let limit = parse(map, headers::RATE_LIMIT)?;
        let remaining = parse(map, headers::RATE_REMAINING).unwrap_or(0);
        let reset = parse::<i64>(map, headers::RATE_RESET)
            .and_then(|secs| Timestamp::from_unix_timestamp(secs).ok());

        Some(Self {
            limit,
            remaining,
            reset,
        })
    }
}

/// Performs one request/response exchange against the API.
///
/// Implementations own authentication, connection management, retries and
/// the mapping of non-success statuses to [`MetalError`]. Callers receive
/// only successful responses.
pub trait Transport: Send + Sync {
    /// Execute a request.
    fn execute(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, MetalError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn execute(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, MetalError>> + Send {
        (**self).execute(request)
    }
}

//! Metal REST API client implementation.

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, RETRY_AFTER, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use reqwest_tracing::TracingMiddleware;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::auth::CredentialsProvider;
use crate::error::{ApiError, MetalError};
use crate::rest::endpoints::METAL_BASE_URL;
use crate::rest::spot_market::SpotMarketRequests;
use crate::rest::transport::{ApiRequest, ApiResponse, Rate, Transport};
use crate::types::Timestamp;

const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";
const CONSUMER_TOKEN_HEADER: &str = "X-Consumer-Token";
const MEDIA_TYPE: &str = "application/json";

/// The Metal REST API client.
///
/// This is the HTTP [`Transport`] the resource services run on. It handles
/// authentication, JSON framing, error translation and automatic retries of
/// transient failures. Only idempotent methods are retried; POST requests
/// are sent exactly once.
///
/// # Example
///
/// ```rust,no_run
/// use metal_api_client::auth::StaticCredentials;
/// use metal_api_client::rest::MetalClient;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let credentials = Arc::new(StaticCredentials::new("api_token"));
///     let client = MetalClient::builder()
///         .credentials(credentials)
///         .build();
///
///     let requests = client.spot_market_requests().list("project-id").await?;
///     println!("{} spot market requests", requests.len());
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct MetalClient {
    http_client: ClientWithMiddleware,
    single_shot_client: ClientWithMiddleware,
    base_url: String,
    credentials: Option<Arc<dyn CredentialsProvider>>,
    consumer_token: Option<SecretString>,
}

impl MetalClient {
    /// Create a new client with default settings.
    ///
    /// The client has no credentials; every request fails with
    /// [`MetalError::MissingCredentials`] until they are configured through
    /// [`MetalClient::builder()`].
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new client builder.
    pub fn builder() -> MetalClientBuilder {
        MetalClientBuilder::new()
    }

    /// The base URL requests are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The spot market requests service bound to this client.
    pub fn spot_market_requests(&self) -> SpotMarketRequests<MetalClient> {
        SpotMarketRequests::new(self.clone())
    }

    /// Resolve a path relative to the API root.
    fn resolve(&self, path: &str) -> Result<Url, MetalError> {
        Ok(Url::parse(&self.base_url)?.join(path.trim_start_matches('/'))?)
    }

    /// Send a request and translate the response.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, MetalError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(MetalError::MissingCredentials)?;
        let creds = credentials.get_credentials();

        let url = self.resolve(&request.path)?;
        let http_client = if request.method.is_idempotent() {
            &self.http_client
        } else {
            &self.single_shot_client
        };
        let mut builder = http_client
            .request(request.method.clone(), url)
            .header(AUTH_TOKEN_HEADER, creds.expose_token());

        if let Some(consumer_token) = &self.consumer_token {
            builder = builder.header(CONSUMER_TOKEN_HEADER, consumer_token.expose_secret());
        }

        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, MEDIA_TYPE)
                .body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await?;
        self.parse_response(&request, response).await
    }

    /// Parse a response from the Metal API.
    ///
    /// Success is any 2xx status. 429 becomes
    /// [`MetalError::RateLimitExceeded`]; every other status becomes
    /// [`MetalError::Api`] with the messages from the body.
    async fn parse_response(
        &self,
        request: &ApiRequest,
        response: reqwest::Response,
    ) -> Result<ApiResponse, MetalError> {
        let status = response.status();
        let rate = Rate::from_headers(response.headers());
        let retry_after_ms = retry_after_ms(response.headers(), rate.as_ref());
        let body = response.text().await?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(
                method = %request.method,
                path = %request.path,
                retry_after_ms = ?retry_after_ms,
                "Rate limit exceeded"
            );
            return Err(MetalError::RateLimitExceeded { retry_after_ms });
        }

        if !status.is_success() {
            tracing::warn!(
                method = %request.method,
                path = %request.path,
                status = status.as_u16(),
                "Request failed"
            );
            return Err(MetalError::Api(ApiError::from_body(status.as_u16(), &body)));
        }

        Ok(ApiResponse {
            status: status.as_u16(),
            rate,
            body,
        })
    }
}

impl Transport for MetalClient {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, MetalError> {
        self.send(request).await
    }
}

impl Default for MetalClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MetalClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetalClient")
            .field("base_url", &self.base_url)
            .field("has_credentials", &self.credentials.is_some())
            .field("has_consumer_token", &self.consumer_token.is_some())
            .finish()
    }
}

/// Milliseconds to wait before retrying, from `Retry-After` or the rate reset.
fn retry_after_ms(headers: &HeaderMap, rate: Option<&Rate>) -> Option<u64> {
    let retry_after = headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(|secs| secs.saturating_mul(1000));

    retry_after.or_else(|| {
        let reset = rate?.reset?;
        let wait = (reset - Timestamp::now_utc()).whole_milliseconds();
        Some(u64::try_from(wait).unwrap_or(0))
    })
}

/// Builder for [`MetalClient`].
pub struct MetalClientBuilder {
    base_url: String,
    credentials: Option<Arc<dyn CredentialsProvider>>,
    consumer_token: Option<SecretString>,
    user_agent: Option<String>,
    max_retries: u32,
}

impl MetalClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: METAL_BASE_URL.to_string(),
            credentials: None,
            consumer_token: None,
            user_agent: None,
            max_retries: 3,
        }
    }

    /// Set the base URL (useful for testing with a mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the credentials provider for authenticated requests.
    pub fn credentials(mut self, credentials: Arc<dyn CredentialsProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set the consumer token sent as `X-Consumer-Token`.
    pub fn consumer_token(mut self, token: impl Into<String>) -> Self {
        self.consumer_token = Some(SecretString::from(token.into()));
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the maximum number of retries for transient failures.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Build the client.
    pub fn build(self) -> MetalClient {
        let mut headers = HeaderMap::new();
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("metal-api-client/{}", env!("CARGO_PKG_VERSION")));
        let header_value = HeaderValue::from_str(&user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("metal-api-client"));
        headers.insert(USER_AGENT, header_value);
        headers.insert(ACCEPT, HeaderValue::from_static(MEDIA_TYPE));

        let reqwest_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(self.max_retries);

        // Both share one connection pool; only the first retries.
        let client = ClientBuilder::new(reqwest_client.clone())
            .with(TracingMiddleware::default())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();
        let single_shot_client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        // Url::join drops the last segment of a base without a trailing slash.
        let mut base_url = self.base_url;
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        MetalClient {
            http_client: client,
            single_shot_client,
            base_url,
            credentials: self.credentials,
            consumer_token: self.consumer_token,
        }
    }
}

impl Default for MetalClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

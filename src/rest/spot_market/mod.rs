//! Spot market requests: bids for spare compute capacity.
//!
//! [`SpotMarketRequestService`] is the abstract capability and
//! [`SpotMarketRequests`] its implementation over any [`Transport`].
//!
//! # Example
//!
//! ```rust,ignore
//! use metal_api_client::rest::spot_market::{
//!     SpotMarketRequestCreateRequest, SpotMarketRequestInstanceParameters,
//!     SpotMarketRequestService,
//! };
//!
//! async fn bid<S: SpotMarketRequestService>(service: &S) -> metal_api_client::Result<()> {
//!     let params =
//!         SpotMarketRequestInstanceParameters::new("hourly", "ubuntu_22_04", "c3.small.x86");
//!     let mut request = SpotMarketRequestCreateRequest::new(1, 2, 0.254, params);
//!     let created = service.create(&mut request, "project-id").await?;
//!     assert_eq!(request.max_bid_price, 0.25);
//!     println!("created {}", created.id);
//!     Ok(())
//! }
//! ```

mod types;

pub use types::*;

use std::future::Future;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::MetalError;
use crate::rest::endpoints::{
    PROJECT_BASE_PATH, SPOT_MARKET_REQUEST_BASE_PATH, SPOT_MARKET_REQUEST_INCLUDES,
};
use crate::rest::transport::{ApiRequest, Transport};
use crate::types::ListOptions;

/// Round `value` half-up to `places` decimal places.
///
/// Computes `floor(value * 10^places + 0.5) / 10^places` in decimal
/// arithmetic on the shortest decimal form of `value`, so prices read the
/// way they were written: `round_plus(1.005, 2) == 1.01`. Values that have
/// no finite decimal form, or overflow it, are returned unchanged.
///
/// ```rust
/// use metal_api_client::rest::spot_market::round_plus;
///
/// assert_eq!(round_plus(3.14159, 2), 3.14);
/// assert_eq!(round_plus(2.335, 2), 2.34);
/// ```
pub fn round_plus(value: f64, places: u32) -> f64 {
    let Ok(exact) = Decimal::from_str(&value.to_string()) else {
        return value;
    };
    let Some(shift) = 10_i64.checked_pow(places).map(Decimal::from) else {
        return value;
    };

    exact
        .checked_mul(shift)
        .and_then(|v| v.checked_add(Decimal::new(5, 1)))
        .and_then(|v| v.floor().checked_div(shift))
        .and_then(|v| v.to_f64())
        .unwrap_or(value)
}

/// The spot market request operations.
///
/// This trait enables dependency injection and allows for:
/// - Testing with mock implementations
/// - Alternative implementations
///
/// All methods are async and return `Result<T, MetalError>`. Transport
/// errors are returned unchanged.
pub trait SpotMarketRequestService: Send + Sync {
    /// Create a spot market request in a project.
    ///
    /// Rounds `request.max_bid_price` to two decimal places in place.
    fn create(
        &self,
        request: &mut SpotMarketRequestCreateRequest,
        project_id: &str,
    ) -> impl Future<Output = Result<SpotMarketRequest, MetalError>> + Send;

    /// List the spot market requests of a project.
    fn list(
        &self,
        project_id: &str,
    ) -> impl Future<Output = Result<Vec<SpotMarketRequest>, MetalError>> + Send;

    /// Get a spot market request by ID.
    fn get(
        &self,
        id: &str,
        options: Option<&ListOptions>,
    ) -> impl Future<Output = Result<SpotMarketRequest, MetalError>> + Send;

    /// Delete a spot market request, optionally terminating its devices.
    fn delete(
        &self,
        id: &str,
        force_delete: bool,
    ) -> impl Future<Output = Result<(), MetalError>> + Send;
}

/// Spot market request operations bound to a transport.
#[derive(Debug, Clone)]
pub struct SpotMarketRequests<T> {
    transport: T,
}

impl<T: Transport> SpotMarketRequests<T> {
    /// Bind the operations to a transport.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Create a spot market request.
    ///
    /// # Arguments
    ///
    /// * `request` - The bid; its `max_bid_price` is rounded in place
    /// * `project_id` - The owning project
    pub async fn create(
        &self,
        request: &mut SpotMarketRequestCreateRequest,
        project_id: &str,
    ) -> Result<SpotMarketRequest, MetalError> {
        let path = collection_path(project_id)?;
        request.max_bid_price = round_plus(request.max_bid_price, 2);
        tracing::debug!(
            project_id,
            max_bid_price = request.max_bid_price,
            "Creating spot market request"
        );

        let response = self
            .transport
            .execute(ApiRequest::post(path).with_body(&*request)?)
            .await?;
        response.json()
    }

    /// List the spot market requests of a project in server order.
    pub async fn list(&self, project_id: &str) -> Result<Vec<SpotMarketRequest>, MetalError> {
        let path = collection_path(project_id)?;
        tracing::debug!(project_id, "Listing spot market requests");

        let response = self.transport.execute(ApiRequest::get(path)).await?;
        let root: SpotMarketRequestsResponse = response.json()?;
        Ok(root.spot_market_requests)
    }

    /// Get a spot market request.
    ///
    /// # Arguments
    ///
    /// * `id` - The spot market request ID
    /// * `options` - Optional query options appended to the path
    pub async fn get(
        &self,
        id: &str,
        options: Option<&ListOptions>,
    ) -> Result<SpotMarketRequest, MetalError> {
        require("spot market request id", id)?;
        let params = match options {
            Some(options) => options.to_query_string()?,
            None => String::new(),
        };
        let path = format!("{}/{}?{}", SPOT_MARKET_REQUEST_BASE_PATH, id, params);
        tracing::debug!(id, "Getting spot market request");

        let response = self.transport.execute(ApiRequest::get(path)).await?;
        response.json()
    }

    /// Delete a spot market request.
    ///
    /// With `force_delete` the body `{"force_termination": true}` is sent and
    /// the devices provisioned under the request are terminated too. Without
    /// it no body is sent.
    pub async fn delete(&self, id: &str, force_delete: bool) -> Result<(), MetalError> {
        require("spot market request id", id)?;
        let path = format!("{}/{}", SPOT_MARKET_REQUEST_BASE_PATH, id);
        tracing::debug!(id, force_delete, "Deleting spot market request");

        let mut request = ApiRequest::delete(path);
        if force_delete {
            request = request.with_body(&serde_json::json!({ "force_termination": true }))?;
        }
        self.transport.execute(request).await?;
        Ok(())
    }
}

fn collection_path(project_id: &str) -> Result<String, MetalError> {
    require("project id", project_id)?;
    Ok(format!(
        "{}/{}/{}?{}",
        PROJECT_BASE_PATH, project_id, SPOT_MARKET_REQUEST_BASE_PATH, SPOT_MARKET_REQUEST_INCLUDES
    ))
}

fn require(name: &str, value: &str) -> Result<(), MetalError> {
    if value.is_empty() {
        return Err(MetalError::InvalidRequest(format!("{} must not be empty", name)));
    }
    Ok(())
}

// SpotMarketRequestService trait implementation.

impl<T: Transport> SpotMarketRequestService for SpotMarketRequests<T> {
    async fn create(
        &self,
        request: &mut SpotMarketRequestCreateRequest,
        project_id: &str,
    ) -> Result<SpotMarketRequest, MetalError> {
        SpotMarketRequests::create(self, request, project_id).await
    }

    async fn list(&self, project_id: &str) -> Result<Vec<SpotMarketRequest>, MetalError> {
        SpotMarketRequests::list(self, project_id).await
    }

    async fn get(
        &self,
        id: &str,
        options: Option<&ListOptions>,
    ) -> Result<SpotMarketRequest, MetalError> {
        SpotMarketRequests::get(self, id, options).await
    }

    async fn delete(&self, id: &str, force_delete: bool) -> Result<(), MetalError> {
        SpotMarketRequests::delete(self, id, force_delete).await
    }
}

//! Metal REST API client.
//!
//! Provides the HTTP transport and the resource services built on it.
//!
//! # Trait-based API
//!
//! The [`Transport`] trait is the seam between resource services and HTTP,
//! and [`SpotMarketRequestService`] abstracts the spot market request
//! operations. Both enable:
//! - Mock implementations for testing
//! - Alternative implementations
//!
//! ```rust,ignore
//! use metal_api_client::rest::{MetalClient, SpotMarketRequestService};
//!
//! async fn count<S: SpotMarketRequestService>(service: &S) -> metal_api_client::Result<usize> {
//!     Ok(service.list("project-id").await?.len())
//! }
//! ```

mod client;
mod endpoints;
pub mod spot_market;
mod transport;

pub use client::{MetalClient, MetalClientBuilder};
pub use endpoints::*;
pub use spot_market::{SpotMarketRequestService, SpotMarketRequests};
pub use transport::{ApiRequest, ApiResponse, Rate, Transport, headers};

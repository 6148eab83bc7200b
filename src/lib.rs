//! # Metal Client
//!
//! An async Rust client for the bare-metal provisioning API's spot market
//! requests: bids for spare compute capacity.
//!
//! ## Features
//!
//! - Create, list, get and delete spot market requests
//! - Strong typing for all request/response types
//! - Bid prices normalized to cents before they are sent
//! - Automatic retries of transient failures with tracing spans per request
//! - A [`Transport`](rest::Transport) seam for substituting test doubles
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use metal_api_client::auth::EnvCredentials;
//! use metal_api_client::rest::MetalClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = EnvCredentials::try_from_env().ok_or("METAL_AUTH_TOKEN not set")?;
//!     let client = MetalClient::builder()
//!         .credentials(Arc::new(credentials))
//!         .build();
//!
//!     for request in client.spot_market_requests().list("project-id").await? {
//!         println!("{}: {} devices", request.id, request.devices.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod error;
pub mod rest;
pub mod types;

// Re-export commonly used types at crate root
pub use error::MetalError;
pub use rest::spot_market::{
    SpotMarketRequest, SpotMarketRequestCreateRequest, SpotMarketRequestInstanceParameters,
};
pub use types::ListOptions;

/// Result type alias using MetalError
pub type Result<T> = std::result::Result<T, MetalError>;

//! Metal REST API endpoint constants.
//!
//! Paths are relative to the API root and joined onto the client's base URL.

/// Base URL for the Metal REST API.
pub const METAL_BASE_URL: &str = "https://api.equinix.com/metal/v1/";

/// Collection of projects.
pub const PROJECT_BASE_PATH: &str = "projects";

/// Collection of spot market requests.
pub const SPOT_MARKET_REQUEST_BASE_PATH: &str = "spot-market-requests";

/// Related resources expanded inline on spot market request collections.
pub const SPOT_MARKET_REQUEST_INCLUDES: &str = "include=devices,project";

//! Types for the spot market requests endpoints.

use serde::{Deserialize, Serialize};

use crate::types::serde_helpers::null_as_default;
use crate::types::{Device, Facility, Project, Timestamp};

/// A bid for spare capacity: how many devices, where, and at what price.
///
/// `max_bid_price` is rounded to two decimal places in place by
/// [`SpotMarketRequests::create`](super::SpotMarketRequests::create).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpotMarketRequestCreateRequest {
    /// Maximum number of devices to provision
    #[serde(default)]
    pub devices_max: i64,
    /// Minimum number of devices to provision
    #[serde(default)]
    pub devices_min: i64,
    /// When the request expires
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub end_at: Option<Timestamp>,
    /// Acceptable facility IDs
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub facility_ids: Vec<String>,
    /// Maximum bid price per device per hour
    #[serde(default)]
    pub max_bid_price: f64,
    /// Machine to provision when the bid wins
    #[serde(rename = "instance_parameters", default)]
    pub parameters: SpotMarketRequestInstanceParameters,
}

impl SpotMarketRequestCreateRequest {
    /// Create a request for between `devices_min` and `devices_max` devices.
    pub fn new(
        devices_min: i64,
        devices_max: i64,
        max_bid_price: f64,
        parameters: SpotMarketRequestInstanceParameters,
    ) -> Self {
        Self {
            devices_max,
            devices_min,
            end_at: None,
            facility_ids: Vec::new(),
            max_bid_price,
            parameters,
        }
    }

    /// Set the acceptable facilities.
    pub fn facility_ids<I, S>(mut self, facility_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.facility_ids = facility_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Set the expiry time.
    pub fn end_at(mut self, end_at: Timestamp) -> Self {
        self.end_at = Some(end_at);
        self
    }
}

/// The provisioning parameters of each device created under a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotMarketRequestInstanceParameters {
    /// Always boot from iPXE
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub always_pxe: Option<bool>,
    /// Billing cycle, e.g. `hourly`
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub billing_cycle: String,
    /// Arbitrary data exposed through metadata
    #[serde(rename = "customdata", default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<String>,
    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Requested hardware features
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    /// Hostname for a single device
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Hostnames, one per device
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostnames: Option<Vec<String>>,
    /// Protect devices from deletion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    /// Operating system slug
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub operating_system: String,
    /// Plan slug
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub plan: String,
    /// Project SSH key IDs to install
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_ssh_keys: Option<Vec<String>>,
    /// Tags
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub tags: Vec<String>,
    /// When devices are terminated
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub termination_time: Option<Timestamp>,
    /// User SSH key IDs to install
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_ssh_keys: Option<Vec<String>>,
    /// Boot-time user data
    #[serde(rename = "userdata", default, deserialize_with = "null_as_default::deserialize")]
    pub user_data: String,
}

impl SpotMarketRequestInstanceParameters {
    /// Create parameters with the three required slugs.
    pub fn new(
        billing_cycle: impl Into<String>,
        operating_system: impl Into<String>,
        plan: impl Into<String>,
    ) -> Self {
        Self {
            billing_cycle: billing_cycle.into(),
            operating_system: operating_system.into(),
            plan: plan.into(),
            ..Self::default()
        }
    }
}

/// A spot market request as stored by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpotMarketRequest {
    /// The bid the request was created from
    #[serde(flatten)]
    pub request: SpotMarketRequestCreateRequest,
    /// Server-assigned ID
    #[serde(default)]
    pub id: String,
    /// Devices provisioned under the request
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub devices: Vec<Device>,
    /// Facilities considered
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub facilities: Vec<Facility>,
    /// Owning project
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub project: Project,
    /// Resource locator
    #[serde(default)]
    pub href: String,
}

/// Envelope of the list endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct SpotMarketRequestsResponse {
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub spot_market_requests: Vec<SpotMarketRequest>,
}

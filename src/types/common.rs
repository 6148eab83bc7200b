//! Common domain types for the Metal API.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::MetalError;
use crate::types::serde_helpers::{comma_separated, null_as_default};

/// An RFC 3339 timestamp as used by every Metal API date field.
pub type Timestamp = OffsetDateTime;

/// A reference to another resource by its canonical locator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Href {
    /// Resource locator, e.g. `/metal/v1/devices/{id}`
    #[serde(default)]
    pub href: String,
}

/// A provisioned compute instance.
///
/// Only the fields commonly returned alongside a spot market request are
/// modelled. Devices referenced without `include=devices` carry just `href`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Device ID
    #[serde(default)]
    pub id: String,
    /// Resource locator
    #[serde(default)]
    pub href: String,
    /// Hostname
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Provisioning state, e.g. `provisioning` or `active`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Billing cycle the device was created with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_cycle: Option<String>,
    /// Whether the device is a spot instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spot_instance: Option<bool>,
    /// Maximum spot price for the device
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spot_price_max: Option<f64>,
    /// Tags
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub tags: Vec<String>,
    /// When the device will be terminated
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub termination_time: Option<Timestamp>,
    /// Creation time
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub created_at: Option<Timestamp>,
}

/// A provider datacenter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facility {
    /// Facility ID
    #[serde(default)]
    pub id: String,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Short code, e.g. `ewr1`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Supported features
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub features: Vec<String>,
    /// Resource locator
    #[serde(default)]
    pub href: String,
}

/// A billing and ownership grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project ID
    #[serde(default)]
    pub id: String,
    /// Project name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Owning organization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<Href>,
    /// Creation time
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub created_at: Option<Timestamp>,
    /// Resource locator
    #[serde(default)]
    pub href: String,
}

/// Query options accepted by read endpoints.
///
/// Serialized to a query string with unset members omitted. `include` and
/// `exclude` are sent comma-joined in the order given.
///
/// # Example
///
/// ```rust
/// use metal_api_client::types::ListOptions;
///
/// let options = ListOptions::new().include(["devices", "project"]).per_page(10);
/// assert_eq!(
///     options.to_query_string().unwrap(),
///     "include=devices%2Cproject&per_page=10"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListOptions {
    /// Related resources to expand inline
    #[serde(
        rename = "include",
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "comma_separated::serialize"
    )]
    pub includes: Vec<String>,
    /// Fields to leave out of the response
    #[serde(
        rename = "exclude",
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "comma_separated::serialize"
    )]
    pub excludes: Vec<String>,
    /// Page number (1-based)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Items per page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    /// Free-text search filter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ListOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand the given related resources.
    pub fn include<I, S>(mut self, includes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.includes.extend(includes.into_iter().map(Into::into));
        self
    }

    /// Exclude the given fields.
    pub fn exclude<I, S>(mut self, excludes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excludes.extend(excludes.into_iter().map(Into::into));
        self
    }

    /// Set the page number.
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the page size.
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Set the search filter.
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Serialize to a query string without the leading `?`.
    pub fn to_query_string(&self) -> Result<String, MetalError> {
        Ok(serde_urlencoded::to_string(self)?)
    }
}

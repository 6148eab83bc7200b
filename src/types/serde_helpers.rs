//! Custom serde helpers for the Metal API's serialization formats.
//!
//! The API returns `null` for collections it has nothing to report for and
//! expects list-style query parameters joined with commas. These modules
//! provide reusable serde helpers for both.

use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serializer};

/// Serialize a sequence as a single comma-separated string.
///
/// # Example
///
/// ```rust
/// use serde::Serialize;
/// use metal_api_client::types::serde_helpers::comma_separated;
///
/// #[derive(Serialize)]
/// struct Query {
///     #[serde(serialize_with = "comma_separated::serialize")]
///     include: Vec<String>,
/// }
///
/// let query = Query {
///     include: vec!["devices".to_string(), "project".to_string()],
/// };
///
/// let json = serde_json::to_string(&query).unwrap();
/// assert_eq!(json, r#"{"include":"devices,project"}"#);
/// ```
pub mod comma_separated {
    use super::*;

    /// Serialize values as a comma-separated string, preserving order.
    pub fn serialize<T, S>(values: &[T], serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        let s = values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        serializer.serialize_str(&s)
    }
}

/// Deserialize `null` as the type's default value.
///
/// # Example
///
/// ```rust
/// use serde::Deserialize;
/// use metal_api_client::types::serde_helpers::null_as_default;
///
/// #[derive(Deserialize, Debug)]
/// struct Response {
///     #[serde(deserialize_with = "null_as_default::deserialize", default)]
///     tags: Vec<String>,
/// }
///
/// let response: Response = serde_json::from_str(r#"{"tags":null}"#).unwrap();
/// assert!(response.tags.is_empty());
/// ```
pub mod null_as_default {
    use super::*;

    /// Deserialize a value, substituting the default for `null`.
    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: Deserialize<'de> + Default,
        D: Deserializer<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[test]
    fn test_comma_separated_preserves_order() {
        #[derive(Serialize)]
        struct Test {
            #[serde(serialize_with = "comma_separated::serialize")]
            include: Vec<String>,
        }

        let test = Test {
            include: vec!["project".into(), "devices".into(), "facilities".into()],
        };
        let json = serde_json::to_string(&test).unwrap();
        assert_eq!(json, r#"{"include":"project,devices,facilities"}"#);
    }

    #[test]
    fn test_null_as_default() {
        #[derive(Deserialize, Debug)]
        struct Test {
            #[serde(deserialize_with = "null_as_default::deserialize", default)]
            facility_ids: Vec<String>,
            #[serde(deserialize_with = "null_as_default::deserialize", default)]
            plan: String,
        }

        let test: Test = serde_json::from_str(r#"{"facility_ids":null,"plan":null}"#).unwrap();
        assert!(test.facility_ids.is_empty());
        assert!(test.plan.is_empty());

        let test: Test = serde_json::from_str(r#"{}"#).unwrap();
        assert!(test.facility_ids.is_empty());

        let test: Test =
            serde_json::from_str(r#"{"facility_ids":["ewr1"],"plan":"baremetal_0"}"#).unwrap();
        assert_eq!(test.facility_ids, vec!["ewr1".to_string()]);
        assert_eq!(test.plan, "baremetal_0");
    }
}

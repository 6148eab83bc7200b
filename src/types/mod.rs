//! Common types used across the Metal client library.

pub mod common;
pub mod serde_helpers;

pub use common::*;

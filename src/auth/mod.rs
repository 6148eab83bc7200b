//! Authentication module for the Metal API.
//!
//! The API authenticates every request with a single token sent in the
//! `X-Auth-Token` header. This module provides credential management with
//! secure secret storage and pluggable credential sources.

mod credentials;

pub use credentials::{Credentials, CredentialsProvider, EnvCredentials, StaticCredentials};

/// Default environment variable holding the API token.
pub const AUTH_TOKEN_ENV: &str = "METAL_AUTH_TOKEN";

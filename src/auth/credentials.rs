//! Credential management for Metal API authentication.

use secrecy::{ExposeSecret, SecretString};

use super::AUTH_TOKEN_ENV;

/// API credentials holding the auth token.
#[derive(Clone)]
pub struct Credentials {
    auth_token: SecretString,
}

impl Credentials {
    /// Create new credentials from an API token.
    pub fn new(auth_token: impl Into<String>) -> Self {
        Self {
            auth_token: SecretString::from(auth_token.into()),
        }
    }

    /// Get the API token for the `X-Auth-Token` header.
    ///
    /// This method exposes the secret - use carefully.
    pub fn expose_token(&self) -> &str {
        self.auth_token.expose_secret()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("auth_token", &"[REDACTED]")
            .finish()
    }
}

/// Trait for providing API credentials.
///
/// Implement this trait to customize how credentials are retrieved,
/// for example from a secrets manager or environment variables.
pub trait CredentialsProvider: Send + Sync {
    /// Get the credentials.
    fn get_credentials(&self) -> &Credentials;
}

/// Static credentials provider that holds credentials directly.
#[derive(Clone)]
pub struct StaticCredentials {
    credentials: Credentials,
}

impl StaticCredentials {
    /// Create a new static credentials provider.
    pub fn new(auth_token: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(auth_token),
        }
    }
}

impl CredentialsProvider for StaticCredentials {
    fn get_credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// Credentials provider that reads from an environment variable.
///
/// By default, reads from `METAL_AUTH_TOKEN`.
pub struct EnvCredentials {
    credentials: Credentials,
}

impl EnvCredentials {
    /// Try to create credentials from the default environment variable.
    ///
    /// Returns `None` if `METAL_AUTH_TOKEN` is not set or empty.
    pub fn try_from_env() -> Option<Self> {
        Self::try_from_env_var(AUTH_TOKEN_ENV)
    }

    /// Try to create credentials from a custom environment variable name.
    ///
    /// Returns `None` if the variable is not set or empty.
    pub fn try_from_env_var(token_var: &str) -> Option<Self> {
        let auth_token = std::env::var(token_var).ok()?;
        if auth_token.is_empty() {
            return None;
        }

        Some(Self {
            credentials: Credentials::new(auth_token),
        })
    }
}

impl CredentialsProvider for EnvCredentials {
    fn get_credentials(&self) -> &Credentials {
        &self.credentials
    }
}

//! Authorization server configuration.
//!
//! # Example (TOML)
//!
//! ```toml
//! [auth]
//! issuer = "https://auth.example.com"
//! login_url = "https://auth.example.com/login"
//! code_lifetime = "10m"
//! access_token_lifetime = "1h"
//! require_pkce = true
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the authorization and token issuance engine.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Public base URL of this authorization server.
    pub issuer: String,

    /// Login page of the external identity collaborator. Authorization
    /// requests without an authenticated user are suspended by redirecting
    /// here with the original request parameters attached, so the flow can
    /// resume after login.
    pub login_url: String,

    /// Authorization code lifetime.
    /// Default: 10 minutes, per OAuth 2.0 recommendations.
    #[serde(with = "humantime_serde")]
    pub code_lifetime: Duration,

    /// Access token lifetime. Default: 1 hour. Tokens are strictly
    /// time-bounded from issuance; validation never extends expiry.
    #[serde(with = "humantime_serde")]
    pub access_token_lifetime: Duration,

    /// Entropy of generated client secrets, codes, and tokens, in bytes.
    /// Default: 32 (256 bits).
    pub secret_bytes: usize,

    /// Whether a PKCE challenge is required for every authorization code.
    /// Default: true. Disabling this permits PKCE-less confidential flows;
    /// public clients should never run without PKCE.
    pub require_pkce: bool,

    /// Whether the discouraged "plain" challenge method is accepted.
    /// Default: false (S256 only).
    pub allow_plain_pkce: bool,

    /// Whether registered redirect URIs must use the https scheme.
    /// Default: false, to permit loopback URIs during development.
    pub require_https_redirects: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer: "http://localhost:8080".to_string(),
            login_url: "http://localhost:8080/login".to_string(),
            code_lifetime: Duration::from_secs(10 * 60),
            access_token_lifetime: Duration::from_secs(60 * 60),
            secret_bytes: 32,
            require_pkce: true,
            allow_plain_pkce: false,
            require_https_redirects: false,
        }
    }
}

impl AuthConfig {
    /// Code lifetime as a `time::Duration` for expiry arithmetic.
    #[must_use]
    pub fn code_lifetime(&self) -> time::Duration {
        time::Duration::seconds(self.code_lifetime.as_secs() as i64)
    }

    /// Access token lifetime as a `time::Duration` for expiry arithmetic.
    #[must_use]
    pub fn access_token_lifetime(&self) -> time::Duration {
        time::Duration::seconds(self.access_token_lifetime.as_secs() as i64)
    }

    /// Access token lifetime in whole seconds, for `expires_in` responses.
    #[must_use]
    pub fn access_token_lifetime_secs(&self) -> u64 {
        self.access_token_lifetime.as_secs()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if lifetimes are zero or the secret entropy is
    /// below 128 bits.
    pub fn validate(&self) -> Result<(), crate::error::AuthError> {
        if self.code_lifetime.is_zero() {
            return Err(crate::error::AuthError::configuration(
                "code_lifetime must be non-zero",
            ));
        }
        if self.access_token_lifetime.is_zero() {
            return Err(crate::error::AuthError::configuration(
                "access_token_lifetime must be non-zero",
            ));
        }
        if self.secret_bytes < 16 {
            return Err(crate::error::AuthError::configuration(
                "secret_bytes must provide at least 128 bits of entropy",
            ));
        }
        Ok(())
    }
}

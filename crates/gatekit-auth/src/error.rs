//! Authorization server error types.
//!
//! This module defines all error types that can occur during client
//! registration, authorization, code exchange, and token validation.
//!
//! # Enumeration Resistance
//!
//! Several variants carry an internal `message` that is useful for tracing
//! but must never reach the caller verbatim. In particular every failure
//! mode of code exchange (unknown code, consumed code, expired code, client
//! mismatch, redirect mismatch, PKCE mismatch) is collapsed into
//! `InvalidGrant`; the HTTP layer serializes it with a fixed generic
//! description so a caller cannot probe which check failed.

use std::fmt;

/// Errors that can occur during authorization server operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// A registration or authorization request is malformed.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of why the request is invalid.
        message: String,
    },

    /// The redirect URI is not registered for the client.
    ///
    /// This failure is always shown directly to the user agent and never
    /// delivered via redirect, to prevent open-redirect abuse.
    #[error("Invalid redirect URI: {message}")]
    InvalidRedirectUri {
        /// Description of why the redirect URI was rejected.
        message: String,
    },

    /// The client credentials are invalid or the client is not registered.
    #[error("Invalid client: {message}")]
    InvalidClient {
        /// Description of why the client is invalid (internal use only).
        message: String,
    },

    /// The authorization code is invalid, expired, consumed, or bound to
    /// different parameters than those presented at exchange time.
    #[error("Invalid grant: {message}")]
    InvalidGrant {
        /// Internal detail of which check failed. Never sent to callers.
        message: String,
    },

    /// The access token is unknown, malformed, or expired.
    #[error("Invalid token: {message}")]
    InvalidToken {
        /// Description of why the token is invalid.
        message: String,
    },

    /// The request lacks valid authentication credentials.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Description of why the request is unauthorized.
        message: String,
    },

    /// An error occurred while storing or retrieving auth data.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error. Never includes secrets.
        message: String,
    },

    /// The auth configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },

    /// An unexpected internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `InvalidRequest` error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidRedirectUri` error.
    #[must_use]
    pub fn invalid_redirect_uri(message: impl Into<String>) -> Self {
        Self::InvalidRedirectUri {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidClient` error.
    #[must_use]
    pub fn invalid_client(message: impl Into<String>) -> Self {
        Self::InvalidClient {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidGrant` error.
    #[must_use]
    pub fn invalid_grant(message: impl Into<String>) -> Self {
        Self::InvalidGrant {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidToken` error.
    #[must_use]
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }

    /// Creates a new `Unauthorized` error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a client error (4xx category).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest { .. }
                | Self::InvalidRedirectUri { .. }
                | Self::InvalidClient { .. }
                | Self::InvalidGrant { .. }
                | Self::InvalidToken { .. }
                | Self::Unauthorized { .. }
        )
    }

    /// Returns `true` if this is a server error (5xx category).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Storage { .. } | Self::Configuration { .. } | Self::Internal { .. }
        )
    }

    /// Returns the error category for logging and monitoring.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidRequest { .. } | Self::InvalidRedirectUri { .. } => {
                ErrorCategory::Validation
            }
            Self::InvalidClient { .. } | Self::InvalidGrant { .. } | Self::Unauthorized { .. } => {
                ErrorCategory::Authentication
            }
            Self::InvalidToken { .. } => ErrorCategory::Token,
            Self::Storage { .. } => ErrorCategory::Infrastructure,
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns the OAuth 2.0 error code for this error (RFC 6749 §5.2).
    #[must_use]
    pub fn oauth_error_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } | Self::InvalidRedirectUri { .. } => "invalid_request",
            Self::InvalidClient { .. } => "invalid_client",
            Self::InvalidGrant { .. } => "invalid_grant",
            Self::InvalidToken { .. } => "invalid_token",
            Self::Unauthorized { .. } => "unauthorized_client",
            Self::Storage { .. } | Self::Configuration { .. } | Self::Internal { .. } => {
                "server_error"
            }
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidRequest { .. }
            | Self::InvalidRedirectUri { .. }
            | Self::InvalidGrant { .. } => 400,
            Self::InvalidClient { .. } | Self::InvalidToken { .. } | Self::Unauthorized { .. } => {
                401
            }
            Self::Storage { .. } | Self::Configuration { .. } | Self::Internal { .. } => 500,
        }
    }

    /// Returns the description that is safe to send to callers.
    ///
    /// `InvalidGrant` is always reported with a fixed generic phrase so a
    /// caller cannot distinguish a consumed code from an expired one, a
    /// client mismatch, or a PKCE failure.
    #[must_use]
    pub fn public_description(&self) -> &str {
        match self {
            Self::InvalidGrant { .. } => "The provided authorization grant is invalid",
            Self::InvalidClient { .. } => "Client authentication failed",
            Self::InvalidRequest { message } | Self::InvalidRedirectUri { message } => message,
            Self::InvalidToken { .. } => "The access token is invalid or expired",
            Self::Unauthorized { message } => message,
            Self::Storage { .. } | Self::Configuration { .. } | Self::Internal { .. } => {
                "Internal server error"
            }
        }
    }
}

/// Categories of authorization errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Request validation errors.
    Validation,
    /// Authentication-related errors (client credentials, grants).
    Authentication,
    /// Token-related errors (validation, expiration).
    Token,
    /// Infrastructure/storage errors.
    Infrastructure,
    /// Configuration errors.
    Configuration,
    /// Internal server errors.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Authentication => write!(f, "authentication"),
            Self::Token => write!(f, "token"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Configuration => write!(f, "configuration"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::invalid_client("client not found");
        assert_eq!(err.to_string(), "Invalid client: client not found");

        let err = AuthError::invalid_grant("code already consumed");
        assert_eq!(err.to_string(), "Invalid grant: code already consumed");

        let err = AuthError::storage("pool exhausted");
        assert_eq!(err.to_string(), "Storage error: pool exhausted");
    }

    #[test]
    fn test_error_predicates() {
        let err = AuthError::invalid_request("missing redirect_uris");
        assert!(err.is_client_error());
        assert!(!err.is_server_error());

        let err = AuthError::storage("database down");
        assert!(!err.is_client_error());
        assert!(err.is_server_error());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            AuthError::invalid_request("x").category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            AuthError::invalid_grant("x").category(),
            ErrorCategory::Authentication
        );
        assert_eq!(
            AuthError::invalid_token("x").category(),
            ErrorCategory::Token
        );
        assert_eq!(
            AuthError::storage("x").category(),
            ErrorCategory::Infrastructure
        );
    }

    #[test]
    fn test_oauth_error_code() {
        assert_eq!(
            AuthError::invalid_request("x").oauth_error_code(),
            "invalid_request"
        );
        assert_eq!(
            AuthError::invalid_client("x").oauth_error_code(),
            "invalid_client"
        );
        assert_eq!(
            AuthError::invalid_grant("x").oauth_error_code(),
            "invalid_grant"
        );
        assert_eq!(AuthError::storage("x").oauth_error_code(), "server_error");
    }

    #[test]
    fn test_http_status() {
        assert_eq!(AuthError::invalid_request("x").http_status(), 400);
        assert_eq!(AuthError::invalid_grant("x").http_status(), 400);
        assert_eq!(AuthError::invalid_client("x").http_status(), 401);
        assert_eq!(AuthError::invalid_token("x").http_status(), 401);
        assert_eq!(AuthError::internal("x").http_status(), 500);
    }

    #[test]
    fn test_invalid_grant_description_is_opaque() {
        // Whatever internal detail is recorded, the caller-visible
        // description stays identical across all exchange failure modes.
        let consumed = AuthError::invalid_grant("code already consumed");
        let expired = AuthError::invalid_grant("code expired");
        let pkce = AuthError::invalid_grant("PKCE verification failed");

        assert_eq!(consumed.public_description(), expired.public_description());
        assert_eq!(expired.public_description(), pkce.public_description());
        assert!(!consumed.public_description().contains("consumed"));
    }

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::Validation.to_string(), "validation");
        assert_eq!(ErrorCategory::Authentication.to_string(), "authentication");
        assert_eq!(ErrorCategory::Infrastructure.to_string(), "infrastructure");
    }
}

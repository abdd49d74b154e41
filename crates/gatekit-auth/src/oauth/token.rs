//! Token endpoint wire types.

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Form body of a token request (`application/x-www-form-urlencoded`).
///
/// Only the `authorization_code` grant is supported. `client_secret` may
/// arrive here or via HTTP Basic auth; the handler merges the two before
/// calling the token service.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRequest {
    /// Grant type; must be "authorization_code".
    pub grant_type: String,

    /// The authorization code being exchanged.
    pub code: String,

    /// Must match the redirect URI the code was issued against.
    pub redirect_uri: String,

    /// Public identifier of the exchanging client. May be omitted when
    /// the client authenticates with HTTP Basic auth.
    #[serde(default)]
    pub client_id: String,

    /// Client secret, when sent in the body instead of Basic auth.
    /// Public clients omit it and rely on their PKCE verifier.
    #[serde(default)]
    pub client_secret: Option<String>,

    /// PKCE verifier; required when the code carries a challenge.
    #[serde(default)]
    pub code_verifier: Option<String>,
}

/// Successful token response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The bearer access token.
    pub access_token: String,

    /// Always "bearer".
    pub token_type: String,

    /// Remaining lifetime in seconds.
    pub expires_in: u64,
}

impl TokenResponse {
    /// Builds a bearer token response.
    #[must_use]
    pub fn bearer(access_token: String, expires_in: u64) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            expires_in,
        }
    }
}

/// RFC 6749 error response body.
///
/// Built from [`AuthError::public_description`], so grant failures all
/// collapse to the same opaque wording regardless of internal cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenErrorBody {
    /// RFC 6749 error code.
    pub error: String,

    /// Human-readable description, deliberately generic for grant and
    /// client failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl From<&AuthError> for TokenErrorBody {
    fn from(error: &AuthError) -> Self {
        Self {
            error: error.oauth_error_code().to_string(),
            error_description: Some(error.public_description().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_serialization() {
        let response = TokenResponse::bearer("tok".to_string(), 3600);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["access_token"], "tok");
        assert_eq!(json["token_type"], "bearer");
        assert_eq!(json["expires_in"], 3600);
    }

    #[test]
    fn test_error_body_hides_grant_details() {
        let error = AuthError::invalid_grant("code abc123 was already consumed");
        let body = TokenErrorBody::from(&error);
        assert_eq!(body.error, "invalid_grant");
        let description = body.error_description.unwrap();
        assert!(!description.contains("abc123"));
        assert!(!description.contains("consumed"));
    }

    #[test]
    fn test_error_body_keeps_request_details() {
        let error = AuthError::invalid_request("grant_type must be authorization_code");
        let body = TokenErrorBody::from(&error);
        assert_eq!(body.error, "invalid_request");
        assert_eq!(
            body.error_description.as_deref(),
            Some("grant_type must be authorization_code")
        );
    }

    #[test]
    fn test_token_request_deserialization() {
        let body = "grant_type=authorization_code&code=c1&redirect_uri=https%3A%2F%2Fapp%2Fcb\
                    &client_id=id&client_secret=s&code_verifier=v";
        let request: TokenRequest = serde_urlencoded::from_str(body).unwrap();
        assert_eq!(request.grant_type, "authorization_code");
        assert_eq!(request.code, "c1");
        assert_eq!(request.client_secret.as_deref(), Some("s"));
        assert_eq!(request.code_verifier.as_deref(), Some("v"));
    }
}

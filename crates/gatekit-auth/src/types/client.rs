//! OAuth client domain types.

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use time::OffsetDateTime;
use url::Url;
use uuid::Uuid;

use crate::error::AuthError;
use crate::types::UserId;

/// A registered OAuth client.
///
/// `client_id` and `client_secret` are generated once at registration and
/// never regenerated for the lifetime of the record. The secret is stored
/// as the opaque random string it was issued as; it belongs to the same
/// bearer-credential class as codes and tokens and is only ever compared
/// in constant time via [`Client::secret_matches`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Internal record identifier.
    pub id: Uuid,

    /// Public client identifier used in OAuth flows. Unique.
    pub client_id: String,

    /// Server-generated client secret. Disclosed to the client exactly
    /// once, in the registration response.
    pub client_secret: String,

    /// Human-readable display name.
    pub name: String,

    /// Allowed redirect URIs. Non-empty; each entry is a syntactically
    /// valid absolute URI. Matching at authorization and exchange time is
    /// exact, byte for byte.
    pub redirect_uris: Vec<String>,

    /// User who registered the client, when the registration request was
    /// authenticated. `None` denotes a public/unauthenticated registration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_user_id: Option<UserId>,

    /// Timestamp when the client was registered.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// Timestamp of the last administrative update.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Client {
    /// Checks whether `uri` exactly matches a registered redirect URI.
    ///
    /// No prefix or partial matching; a query string or trailing slash
    /// difference is a mismatch.
    #[must_use]
    pub fn is_redirect_uri_allowed(&self, uri: &str) -> bool {
        self.redirect_uris.iter().any(|allowed| allowed == uri)
    }

    /// Compares a presented secret against the stored one in constant
    /// time.
    #[must_use]
    pub fn secret_matches(&self, presented: &str) -> bool {
        self.client_secret
            .as_bytes()
            .ct_eq(presented.as_bytes())
            .into()
    }
}

/// Registration response: the only place the client secret appears in
/// plaintext. Field names follow the dynamic registration wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredClient {
    /// Public client identifier.
    pub client_id: String,

    /// Generated client secret. Not retrievable after this response.
    pub client_secret: String,

    /// Redirect URIs accepted for this client, echoed back.
    pub redirect_uris: Vec<String>,
}

/// Validates registration input: a non-empty name and a non-empty set of
/// syntactically valid absolute redirect URIs.
///
/// Fragments are rejected (RFC 6749 §3.1.2), and the https scheme can be
/// required by deployment policy.
///
/// # Errors
///
/// Returns `AuthError::InvalidRequest` describing the first violation.
pub fn validate_registration(
    name: &str,
    redirect_uris: &[String],
    require_https: bool,
) -> Result<(), AuthError> {
    if name.trim().is_empty() {
        return Err(AuthError::invalid_request("client_name must not be empty"));
    }
    if redirect_uris.is_empty() {
        return Err(AuthError::invalid_request(
            "redirect_uris must contain at least one URI",
        ));
    }
    for uri in redirect_uris {
        let parsed = Url::parse(uri)
            .map_err(|_| AuthError::invalid_request(format!("not an absolute URI: {uri}")))?;
        if parsed.fragment().is_some() {
            return Err(AuthError::invalid_request(format!(
                "redirect URI must not contain a fragment: {uri}"
            )));
        }
        if require_https && parsed.scheme() != "https" {
            return Err(AuthError::invalid_request(format!(
                "redirect URI must use https: {uri}"
            )));
        }
    }
    Ok(())
}

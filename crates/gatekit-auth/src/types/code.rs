//! Authorization code domain type.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::types::UserId;

/// A single-use authorization code.
///
/// Issued at the end of a successful authorization step and bound to the
/// issuing client, the authenticated resource owner, the exact redirect
/// URI, and the PKCE challenge presented with the request. The lifecycle
/// is `ISSUED -> CONSUMED` or `ISSUED -> EXPIRED`; expiry is a predicate
/// evaluated at consumption time, not a stored transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationCode {
    /// The code value: 256-bit random, base64url. Single use.
    pub code: String,

    /// Public identifier of the client the code was issued to.
    pub client_id: String,

    /// Resource owner who authenticated during the authorization step.
    pub user_id: UserId,

    /// Redirect URI used at issuance. The exchange request must present
    /// the identical string.
    pub redirect_uri: String,

    /// PKCE code challenge recorded at issuance. `None` only when the
    /// deployment permits PKCE-less flows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_challenge: Option<String>,

    /// PKCE challenge method ("S256" expected).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_challenge_method: Option<String>,

    /// Timestamp when the code was issued.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// Timestamp after which the code is dead.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,

    /// Timestamp when the code was exchanged. Set exactly once, by the
    /// storage layer's atomic consume.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub consumed_at: Option<OffsetDateTime>,
}

impl AuthorizationCode {
    /// Returns `true` if the code has passed its expiry.
    #[must_use]
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        now > self.expires_at
    }

    /// Returns `true` if the code has already been exchanged.
    #[must_use]
    pub fn is_consumed(&self) -> bool {
        self.consumed_at.is_some()
    }

    /// Returns `true` if a PKCE challenge was recorded at issuance.
    #[must_use]
    pub fn has_challenge(&self) -> bool {
        self.code_challenge.is_some()
    }
}

//! Access token domain type.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::types::UserId;

/// A bearer access token bound to a client and a resource owner.
///
/// The record is consulted, never mutated, on resource access. A token is
/// logically dead once `expires_at` has passed even if the record still
/// exists for audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    /// The bearer string: 256-bit random, base64url. Never reused.
    pub token: String,

    /// Public identifier of the client the token was issued to.
    pub client_id: String,

    /// Resource owner on whose behalf the token acts.
    pub user_id: UserId,

    /// Timestamp when the token was issued.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// Timestamp after which the token is dead. Fixed at issuance; there
    /// is no sliding expiration.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl AccessToken {
    /// Returns `true` if the token has passed its expiry.
    #[must_use]
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        now > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;
    use uuid::Uuid;

    #[test]
    fn test_expiry_predicate() {
        let now = OffsetDateTime::now_utc();
        let token = AccessToken {
            token: crate::secret::generate_default(),
            client_id: "client-abc".to_string(),
            user_id: Uuid::new_v4(),
            created_at: now,
            expires_at: now + Duration::hours(1),
        };
        assert!(!token.is_expired(now));
        assert!(!token.is_expired(now + Duration::minutes(59)));
        assert!(token.is_expired(now + Duration::minutes(61)));
    }

    #[test]
    fn test_serde_roundtrip() {
        let now = OffsetDateTime::now_utc();
        let token = AccessToken {
            token: "tok".to_string(),
            client_id: "client-abc".to_string(),
            user_id: Uuid::new_v4(),
            created_at: now,
            expires_at: now + Duration::hours(1),
        };
        let json = serde_json::to_string(&token).unwrap();
        assert!(json.contains(r#""clientId""#));
        let back: AccessToken = serde_json::from_str(&json).unwrap();
        assert_eq!(token.token, back.token);
        assert_eq!(token.user_id, back.user_id);
    }
}

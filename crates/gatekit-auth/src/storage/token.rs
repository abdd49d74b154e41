//! Access token storage trait.

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::AuthResult;
use crate::types::AccessToken;

/// Storage operations for bearer access tokens.
///
/// Lookup is read-only; validation never mutates the record.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Persists a freshly issued token.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn create(&self, token: &AccessToken) -> AuthResult<()>;

    /// Finds a token by its bearer string.
    ///
    /// Returns the record regardless of expiry; the caller applies the
    /// expiry predicate.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find(&self, token: &str) -> AuthResult<Option<AccessToken>>;

    /// Deletes a token immediately (revocation).
    ///
    /// Returns `true` if a record was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn revoke(&self, token: &str) -> AuthResult<bool>;

    /// Deletes tokens whose expiry has passed. Optional housekeeping.
    ///
    /// Returns the number of tokens removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn cleanup_expired(&self, now: OffsetDateTime) -> AuthResult<u64>;

    /// Deletes all tokens issued to a client. Called when the client is
    /// deleted (cascade).
    ///
    /// Returns the number of tokens removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn delete_by_client(&self, client_id: &str) -> AuthResult<u64>;
}

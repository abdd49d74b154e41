//! Authorization code storage trait.
//!
//! # Security Considerations
//!
//! - Never log authorization codes
//! - `consume` must be atomic so concurrent exchange attempts for the
//!   same code admit exactly one winner

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::AuthResult;
use crate::types::AuthorizationCode;

/// Storage operations for single-use authorization codes.
#[async_trait]
pub trait CodeStore: Send + Sync {
    /// Persists a freshly issued code.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn create(&self, code: &AuthorizationCode) -> AuthResult<()>;

    /// Atomically consumes a code: marks it consumed and returns the
    /// record, if and only if it exists and was not consumed before.
    ///
    /// Returns `None` for an unknown or already-consumed code. Two
    /// concurrent calls with the same code must resolve to exactly one
    /// `Some`; this is the system's sole required locking discipline.
    /// A relational implementation uses a conditional update:
    ///
    /// ```sql
    /// UPDATE auth_code SET consumed_at = NOW()
    /// WHERE code = $1 AND consumed_at IS NULL
    /// RETURNING *
    /// ```
    ///
    /// Expiry and binding checks happen in the caller after the take, so
    /// every failed exchange leaves the code burned.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn consume(&self, code: &str, now: OffsetDateTime)
    -> AuthResult<Option<AuthorizationCode>>;

    /// Deletes codes whose expiry has passed. Optional housekeeping, not
    /// part of the protocol contract.
    ///
    /// Returns the number of codes removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn cleanup_expired(&self, now: OffsetDateTime) -> AuthResult<u64>;

    /// Deletes all codes issued to a client. Called when the client is
    /// deleted (cascade).
    ///
    /// Returns the number of codes removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn delete_by_client(&self, client_id: &str) -> AuthResult<u64>;
}

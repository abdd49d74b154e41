//! Client storage trait.

use async_trait::async_trait;

use crate::AuthResult;
use crate::types::Client;

/// Storage operations for OAuth client registrations.
///
/// Records are immutable after creation apart from administrative edits,
/// which are out of scope here. Deleting a client does not itself cascade;
/// the registry deletes the client's codes and tokens alongside it.
#[async_trait]
pub trait ClientStore: Send + Sync {
    /// Persists a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if a client with the same `client_id` already
    /// exists or the storage operation fails. Generated client ids draw
    /// from a 256-bit space, so a duplicate indicates a caller bug rather
    /// than a race to be retried.
    async fn create(&self, client: &Client) -> AuthResult<()>;

    /// Finds a client by its public `client_id`.
    ///
    /// Returns `None` if no such client exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_client_id(&self, client_id: &str) -> AuthResult<Option<Client>>;

    /// Deletes a client record.
    ///
    /// Returns `true` if a record was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn delete(&self, client_id: &str) -> AuthResult<bool>;
}

//! Client registry: dynamic registration, lookup, and authentication.

use std::sync::Arc;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::AuthResult;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::secret;
use crate::storage::{ClientStore, CodeStore, TokenStore};
use crate::types::client::validate_registration;
use crate::types::{Client, RegisteredClient, UserId};

/// Service for registering and authenticating OAuth clients.
///
/// Holds injected store handles; never caches client records in process
/// memory.
pub struct ClientRegistry {
    clients: Arc<dyn ClientStore>,
    codes: Arc<dyn CodeStore>,
    tokens: Arc<dyn TokenStore>,
    config: AuthConfig,
}

impl ClientRegistry {
    /// Creates a new registry over the given stores.
    #[must_use]
    pub fn new(
        clients: Arc<dyn ClientStore>,
        codes: Arc<dyn CodeStore>,
        tokens: Arc<dyn TokenStore>,
        config: AuthConfig,
    ) -> Self {
        Self {
            clients,
            codes,
            tokens,
            config,
        }
    }

    /// Registers a new client.
    ///
    /// Generates `client_id` and `client_secret` from the 256-bit secret
    /// space, so concurrent registrations cannot race on uniqueness. The
    /// secret is returned here and is never retrievable again.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if `name` is empty or `redirect_uris` is empty
    ///   or contains a non-absolute URI
    /// - `Storage` if persistence fails (no partial state is left behind)
    pub async fn register(
        &self,
        name: &str,
        redirect_uris: Vec<String>,
        owner_user_id: Option<UserId>,
    ) -> AuthResult<RegisteredClient> {
        validate_registration(name, &redirect_uris, self.config.require_https_redirects)?;

        let now = OffsetDateTime::now_utc();
        let client = Client {
            id: Uuid::new_v4(),
            client_id: secret::generate(self.config.secret_bytes),
            client_secret: secret::generate(self.config.secret_bytes),
            name: name.to_string(),
            redirect_uris,
            owner_user_id,
            created_at: now,
            updated_at: now,
        };

        self.clients.create(&client).await?;

        tracing::info!(
            client_id = %client.client_id,
            name = %client.name,
            owned = client.owner_user_id.is_some(),
            "Client registered"
        );

        Ok(RegisteredClient {
            client_id: client.client_id,
            client_secret: client.client_secret,
            redirect_uris: client.redirect_uris,
        })
    }

    /// Looks up a client by its public `client_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    pub async fn lookup(&self, client_id: &str) -> AuthResult<Option<Client>> {
        self.clients.find_by_client_id(client_id).await
    }

    /// Authenticates a confidential client by id and secret.
    ///
    /// The secret comparison is constant time, and the same `InvalidClient`
    /// error is returned whether the client is unknown or the secret is
    /// wrong, so callers cannot enumerate registered client ids.
    ///
    /// # Errors
    ///
    /// - `InvalidClient` on unknown client or secret mismatch
    /// - `Storage` if the lookup fails
    pub async fn authenticate(&self, client_id: &str, client_secret: &str) -> AuthResult<Client> {
        let client = self.clients.find_by_client_id(client_id).await?;

        match client {
            Some(client) if client.secret_matches(client_secret) => Ok(client),
            _ => {
                tracing::debug!(client_id, "Client authentication failed");
                Err(AuthError::invalid_client("unknown client or bad secret"))
            }
        }
    }

    /// Deletes a client and cascades to its authorization codes and
    /// access tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if any storage operation fails.
    pub async fn delete(&self, client_id: &str) -> AuthResult<bool> {
        let removed = self.clients.delete(client_id).await?;
        if removed {
            let codes = self.codes.delete_by_client(client_id).await?;
            let tokens = self.tokens.delete_by_client(client_id).await?;
            tracing::info!(client_id, codes, tokens, "Client deleted with cascade");
        }
        Ok(removed)
    }
}

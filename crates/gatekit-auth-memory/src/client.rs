//! In-memory client store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use gatekit_auth::storage::ClientStore;
use gatekit_auth::types::Client;
use gatekit_auth::{AuthError, AuthResult};

/// Client store backed by a `RwLock`-guarded map keyed by `client_id`.
#[derive(Default)]
pub struct MemoryClientStore {
    clients: RwLock<HashMap<String, Client>>,
}

impl MemoryClientStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientStore for MemoryClientStore {
    async fn create(&self, client: &Client) -> AuthResult<()> {
        let mut clients = self.clients.write().await;
        if clients.contains_key(&client.client_id) {
            return Err(AuthError::storage("client_id already exists"));
        }
        clients.insert(client.client_id.clone(), client.clone());
        Ok(())
    }

    async fn find_by_client_id(&self, client_id: &str) -> AuthResult<Option<Client>> {
        Ok(self.clients.read().await.get(client_id).cloned())
    }

    async fn delete(&self, client_id: &str) -> AuthResult<bool> {
        Ok(self.clients.write().await.remove(client_id).is_some())
    }
}

//! In-memory access token store.

use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use gatekit_auth::AuthResult;
use gatekit_auth::storage::TokenStore;
use gatekit_auth::types::AccessToken;

/// Token store backed by a `RwLock`-guarded map keyed by the bearer
/// string.
#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<HashMap<String, AccessToken>>,
}

impl MemoryTokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn create(&self, token: &AccessToken) -> AuthResult<()> {
        self.tokens
            .write()
            .await
            .insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn find(&self, token: &str) -> AuthResult<Option<AccessToken>> {
        Ok(self.tokens.read().await.get(token).cloned())
    }

    async fn revoke(&self, token: &str) -> AuthResult<bool> {
        Ok(self.tokens.write().await.remove(token).is_some())
    }

    async fn cleanup_expired(&self, now: OffsetDateTime) -> AuthResult<u64> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, record| !record.is_expired(now));
        Ok((before - tokens.len()) as u64)
    }

    async fn delete_by_client(&self, client_id: &str) -> AuthResult<u64> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, record| record.client_id != client_id);
        Ok((before - tokens.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;
    use uuid::Uuid;

    fn sample_token(token: &str, client_id: &str) -> AccessToken {
        let now = OffsetDateTime::now_utc();
        AccessToken {
            token: token.to_string(),
            client_id: client_id.to_string(),
            user_id: Uuid::new_v4(),
            created_at: now,
            expires_at: now + Duration::hours(1),
        }
    }

    #[tokio::test]
    async fn test_create_find_revoke() {
        let store = MemoryTokenStore::new();
        store.create(&sample_token("t1", "client")).await.unwrap();

        assert!(store.find("t1").await.unwrap().is_some());
        assert!(store.revoke("t1").await.unwrap());
        assert!(!store.revoke("t1").await.unwrap());
        assert!(store.find("t1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cleanup_expired() {
        let store = MemoryTokenStore::new();
        let mut expired = sample_token("old", "client");
        expired.expires_at = expired.created_at - Duration::minutes(1);
        store.create(&expired).await.unwrap();
        store.create(&sample_token("live", "client")).await.unwrap();

        assert_eq!(
            store.cleanup_expired(OffsetDateTime::now_utc()).await.unwrap(),
            1
        );
        assert!(store.find("live").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_by_client() {
        let store = MemoryTokenStore::new();
        store.create(&sample_token("t1", "client-a")).await.unwrap();
        store.create(&sample_token("t2", "client-a")).await.unwrap();
        store.create(&sample_token("t3", "client-b")).await.unwrap();

        assert_eq!(store.delete_by_client("client-a").await.unwrap(), 2);
        assert!(store.find("t3").await.unwrap().is_some());
    }
}

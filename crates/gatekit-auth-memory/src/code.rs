//! In-memory authorization code store.

use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use gatekit_auth::AuthResult;
use gatekit_auth::storage::CodeStore;
use gatekit_auth::types::AuthorizationCode;

/// Code store backed by a `RwLock`-guarded map keyed by the code string.
///
/// `consume` holds the write lock across the check-and-mark, which gives
/// the single-winner guarantee the trait requires.
#[derive(Default)]
pub struct MemoryCodeStore {
    codes: RwLock<HashMap<String, AuthorizationCode>>,
}

impl MemoryCodeStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CodeStore for MemoryCodeStore {
    async fn create(&self, code: &AuthorizationCode) -> AuthResult<()> {
        self.codes
            .write()
            .await
            .insert(code.code.clone(), code.clone());
        Ok(())
    }

    async fn consume(
        &self,
        code: &str,
        now: OffsetDateTime,
    ) -> AuthResult<Option<AuthorizationCode>> {
        let mut codes = self.codes.write().await;
        match codes.get_mut(code) {
            Some(record) if record.consumed_at.is_none() => {
                record.consumed_at = Some(now);
                Ok(Some(record.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn cleanup_expired(&self, now: OffsetDateTime) -> AuthResult<u64> {
        let mut codes = self.codes.write().await;
        let before = codes.len();
        codes.retain(|_, record| !record.is_expired(now));
        Ok((before - codes.len()) as u64)
    }

    async fn delete_by_client(&self, client_id: &str) -> AuthResult<u64> {
        let mut codes = self.codes.write().await;
        let before = codes.len();
        codes.retain(|_, record| record.client_id != client_id);
        Ok((before - codes.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use time::Duration;
    use uuid::Uuid;

    fn sample_code(code: &str, client_id: &str) -> AuthorizationCode {
        let now = OffsetDateTime::now_utc();
        AuthorizationCode {
            code: code.to_string(),
            client_id: client_id.to_string(),
            user_id: Uuid::new_v4(),
            redirect_uri: "https://app.example/cb".to_string(),
            code_challenge: None,
            code_challenge_method: None,
            created_at: now,
            expires_at: now + Duration::minutes(10),
            consumed_at: None,
        }
    }

    #[tokio::test]
    async fn test_consume_returns_record_once() {
        let store = MemoryCodeStore::new();
        store.create(&sample_code("c1", "client")).await.unwrap();

        let now = OffsetDateTime::now_utc();
        assert!(store.consume("c1", now).await.unwrap().is_some());
        assert!(store.consume("c1", now).await.unwrap().is_none());
        assert!(store.consume("unknown", now).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_consume_returns_expired_records() {
        // Expiry is the caller's check; the store still hands the record
        // to exactly one consumer so the failure burns the code.
        let store = MemoryCodeStore::new();
        let mut code = sample_code("c1", "client");
        code.expires_at = code.created_at - Duration::minutes(1);
        store.create(&code).await.unwrap();

        let taken = store
            .consume("c1", OffsetDateTime::now_utc())
            .await
            .unwrap()
            .unwrap();
        assert!(taken.is_expired(OffsetDateTime::now_utc()));
    }

    #[tokio::test]
    async fn test_concurrent_consume_single_winner() {
        let store = Arc::new(MemoryCodeStore::new());
        store.create(&sample_code("c1", "client")).await.unwrap();

        let now = OffsetDateTime::now_utc();
        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(
                async move { store.consume("c1", now).await },
            ));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap().is_some() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn test_cleanup_and_cascade() {
        let store = MemoryCodeStore::new();
        let mut expired = sample_code("old", "client-a");
        expired.expires_at = expired.created_at - Duration::minutes(1);
        store.create(&expired).await.unwrap();
        store.create(&sample_code("live", "client-a")).await.unwrap();
        store.create(&sample_code("other", "client-b")).await.unwrap();

        assert_eq!(
            store.cleanup_expired(OffsetDateTime::now_utc()).await.unwrap(),
            1
        );
        assert_eq!(store.delete_by_client("client-a").await.unwrap(), 1);
        assert!(
            store
                .consume("other", OffsetDateTime::now_utc())
                .await
                .unwrap()
                .is_some()
        );
    }
}

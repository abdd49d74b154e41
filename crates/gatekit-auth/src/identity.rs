//! External identity collaborator seam.
//!
//! The core never implements federated login. It consumes an
//! authenticated user id from the identity layer through
//! [`IdentitySource`], and models the upstream social providers
//! (Google, GitHub, Discord, ...) as a capability interface dispatched by
//! provider key through [`ProviderRegistry`].
//!
//! `authenticated_user` returning `None` means "suspend for login"; it is
//! never an error. The suspended state has no persisted record, so an
//! abandoned login requires no cleanup.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::AuthResult;
use crate::types::UserId;

/// Per-request context handed to the identity layer.
///
/// Deliberately opaque to the core: the HTTP layer extracts whatever
/// session material it uses (typically a session cookie) and the identity
/// implementation interprets it.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Session token presented by the user agent, if any.
    pub session_token: Option<String>,
}

impl RequestContext {
    /// Context with no session material; always resolves to "not
    /// authenticated".
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Context carrying a session token.
    #[must_use]
    pub fn with_session(token: impl Into<String>) -> Self {
        Self {
            session_token: Some(token.into()),
        }
    }
}

/// Source of authenticated user identities.
///
/// Implemented outside the core (the server wires a cookie-session
/// implementation); the core only asks "who is this, if anyone".
#[async_trait]
pub trait IdentitySource: Send + Sync {
    /// Resolves the resource owner behind a request.
    ///
    /// Returns `Ok(None)` when no authenticated session exists; the
    /// caller must suspend the flow for login, never treat this as an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure failures (e.g. the
    /// session store is unreachable).
    async fn authenticated_user(&self, ctx: &RequestContext) -> AuthResult<Option<UserId>>;
}

/// Configuration for one upstream identity provider.
///
/// These credentials identify *this server* to the upstream provider;
/// they are unrelated to the clients this server registers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider key used for dispatch (e.g. "google", "github", "discord").
    pub key: String,

    /// Human-readable name for login UI.
    pub name: String,

    /// OAuth client id registered with the upstream provider.
    pub client_id: String,

    /// OAuth client secret registered with the upstream provider.
    pub client_secret: String,

    /// Whether this provider is offered at login.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

/// Capability interface for one upstream provider.
///
/// The protocol exchange behind `authenticate` (redirects, token calls
/// against the upstream) lives in the identity layer; the core only sees
/// the resulting external account id.
#[async_trait]
pub trait UpstreamProvider: Send + Sync {
    /// The provider key this implementation answers to.
    fn key(&self) -> &str;

    /// Completes the upstream login exchange and returns the external
    /// account identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream exchange fails.
    async fn authenticate(&self, callback: &ProviderCallback) -> AuthResult<String>;
}

/// Parameters handed back by an upstream provider's redirect.
#[derive(Debug, Clone, Default)]
pub struct ProviderCallback {
    /// Upstream authorization code.
    pub code: Option<String>,
    /// Upstream state echo.
    pub state: Option<String>,
}

/// Registry of upstream providers, dispatched by key at request time.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn UpstreamProvider>>,
}

impl ProviderRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider under its own key, replacing any previous
    /// registration for that key.
    pub fn register(&mut self, provider: Arc<dyn UpstreamProvider>) {
        self.providers.insert(provider.key().to_string(), provider);
    }

    /// Looks up a provider by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Arc<dyn UpstreamProvider>> {
        self.providers.get(key).cloned()
    }

    /// Keys of all registered providers, for login UI.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.providers.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubProvider {
        key: &'static str,
        account: &'static str,
    }

    #[async_trait]
    impl UpstreamProvider for StubProvider {
        fn key(&self) -> &str {
            self.key
        }

        async fn authenticate(&self, _callback: &ProviderCallback) -> AuthResult<String> {
            Ok(self.account.to_string())
        }
    }

    #[tokio::test]
    async fn test_registry_dispatch_by_key() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(StubProvider {
            key: "google",
            account: "google-account-1",
        }));
        registry.register(Arc::new(StubProvider {
            key: "github",
            account: "github-account-1",
        }));

        let provider = registry.get("github").unwrap();
        let account = provider
            .authenticate(&ProviderCallback::default())
            .await
            .unwrap();
        assert_eq!(account, "github-account-1");

        assert!(registry.get("discord").is_none());
        assert_eq!(registry.keys().len(), 2);
    }

    #[test]
    fn test_registry_replaces_same_key() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(StubProvider {
            key: "google",
            account: "first",
        }));
        registry.register(Arc::new(StubProvider {
            key: "google",
            account: "second",
        }));
        assert_eq!(registry.keys(), vec!["google"]);
    }

    #[test]
    fn test_provider_config_deserialization() {
        let json = r#"{
            "key": "discord",
            "name": "Discord",
            "client_id": "upstream-id",
            "client_secret": "upstream-secret"
        }"#;
        let config: ProviderConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.key, "discord");
        assert!(config.enabled);
    }

    #[test]
    fn test_request_context() {
        assert!(RequestContext::anonymous().session_token.is_none());
        assert_eq!(
            RequestContext::with_session("abc").session_token.as_deref(),
            Some("abc")
        );
    }
}

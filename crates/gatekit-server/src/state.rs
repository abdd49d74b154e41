//! Application state assembly.

use std::sync::Arc;

use axum::extract::FromRef;

use gatekit_auth::http::AuthState;
use gatekit_auth::identity::{IdentitySource, ProviderConfig};
use gatekit_auth::storage::{ClientStore, CodeStore, TokenStore};
use gatekit_auth::{AuthorizationService, ClientRegistry, TokenService};
use gatekit_auth_memory::{MemoryClientStore, MemoryCodeStore, MemoryTokenStore};

use crate::config::ServerConfig;
use crate::session::{SessionIdentitySource, SessionStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// OAuth endpoint state.
    pub auth: AuthState,

    /// Session map behind the identity source.
    pub sessions: Arc<SessionStore>,

    /// Providers offered at login (config records; secrets are never
    /// exposed through any endpoint).
    pub providers: Arc<Vec<ProviderConfig>>,
}

impl AppState {
    /// Builds the full service graph over the in-memory backend.
    ///
    /// Stores are constructed here and injected into the services; there
    /// is no process-wide store.
    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        let clients: Arc<dyn ClientStore> = Arc::new(MemoryClientStore::new());
        let codes: Arc<dyn CodeStore> = Arc::new(MemoryCodeStore::new());
        let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());

        let sessions = Arc::new(SessionStore::new());
        let identity: Arc<dyn IdentitySource> =
            Arc::new(SessionIdentitySource::new(sessions.clone()));

        let auth = AuthState {
            registry: Arc::new(ClientRegistry::new(
                clients.clone(),
                codes.clone(),
                tokens.clone(),
                config.auth.clone(),
            )),
            authorization: Arc::new(AuthorizationService::new(
                clients.clone(),
                codes.clone(),
                identity,
                config.auth.clone(),
            )),
            tokens: Arc::new(TokenService::new(clients, codes, tokens, config.auth.clone())),
        };

        Self {
            auth,
            sessions,
            providers: Arc::new(config.providers.clone()),
        }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

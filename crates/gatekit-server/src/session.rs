//! Cookie-session identity source.
//!
//! Sessions are established by the login flow (outside the authorization
//! engine) and consulted by the authorization endpoint through
//! [`IdentitySource`]. Tokens are opaque random strings; the map holds no
//! user data beyond the id.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use gatekit_auth::identity::{IdentitySource, RequestContext};
use gatekit_auth::{AuthResult, UserId, secret};

/// In-process session map keyed by session token.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<String, UserId>,
}

impl SessionStore {
    /// Creates an empty session store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a session for a user and returns the new session token.
    pub fn start(&self, user_id: UserId) -> String {
        let token = secret::generate_default();
        self.sessions.insert(token.clone(), user_id);
        token
    }

    /// Resolves a session token to its user.
    #[must_use]
    pub fn resolve(&self, token: &str) -> Option<UserId> {
        self.sessions.get(token).map(|entry| *entry.value())
    }

    /// Ends a session. Returns `true` if it existed.
    pub fn end(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }
}

/// [`IdentitySource`] backed by a [`SessionStore`].
pub struct SessionIdentitySource {
    sessions: Arc<SessionStore>,
}

impl SessionIdentitySource {
    /// Creates an identity source over the given session store.
    #[must_use]
    pub fn new(sessions: Arc<SessionStore>) -> Self {
        Self { sessions }
    }
}

#[async_trait]
impl IdentitySource for SessionIdentitySource {
    async fn authenticated_user(&self, ctx: &RequestContext) -> AuthResult<Option<UserId>> {
        Ok(ctx
            .session_token
            .as_deref()
            .and_then(|token| self.sessions.resolve(token)))
    }
}

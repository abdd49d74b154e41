//! Code exchange and access token lifecycle.

use std::sync::Arc;

use time::OffsetDateTime;

use crate::AuthResult;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::oauth::token::{TokenRequest, TokenResponse};
use crate::pkce;
use crate::secret;
use crate::storage::{ClientStore, CodeStore, TokenStore};
use crate::types::{AccessToken, AuthorizationCode, Client, UserId};

/// Service for exchanging authorization codes and managing access tokens.
///
/// # Single-use codes
///
/// `exchange` takes the code out of the store *before* checking expiry,
/// client binding, redirect binding, or PKCE. The take is atomic, so under
/// concurrent exchange exactly one caller obtains the record; and because
/// the take happens first, a failed exchange still burns the code. A
/// stolen code cannot be retried with corrected parameters.
pub struct TokenService {
    clients: Arc<dyn ClientStore>,
    codes: Arc<dyn CodeStore>,
    tokens: Arc<dyn TokenStore>,
    config: AuthConfig,
}

impl TokenService {
    /// Creates a new token service.
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

    /// Exchanges an authorization code for an access token.
    ///
    /// Confidential clients present their secret (form body or Basic
    /// auth, merged by the handler). A public client may omit the secret,
    /// but only for a PKCE-bound code; the verifier then carries the
    /// proof of possession.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` for an unsupported grant type
    /// - `InvalidClient` when client authentication fails, or when the
    ///   secret is omitted and the code carries no PKCE challenge
    /// - `InvalidGrant` for every code failure mode (unknown, consumed,
    ///   expired, wrong client, wrong redirect URI, PKCE failure); the
    ///   public description never says which
    pub async fn exchange(&self, request: &TokenRequest) -> AuthResult<TokenResponse> {
        if request.grant_type != "authorization_code" {
            return Err(AuthError::invalid_request(format!(
                "unsupported grant_type: {}",
                request.grant_type
            )));
        }

        let (client, authenticated) = self.authenticate_client(request).await?;
        let now = OffsetDateTime::now_utc();

        // Atomic take. From here on the code is spent no matter what.
        let code = self
            .codes
            .consume(&request.code, now)
            .await?
            .ok_or_else(|| AuthError::invalid_grant("code unknown or already consumed"))?;

        self.check_bindings(&code, &client, authenticated, request, now)?;

        let token = self.issue(&client.client_id, code.user_id).await?;

        tracing::info!(
            client_id = %client.client_id,
            user_id = %code.user_id,
            "Access token issued"
        );

        Ok(TokenResponse::bearer(
            token.token,
            self.config.access_token_lifetime_secs(),
        ))
    }

    /// Mints and stores an access token for a client/user pair.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if persistence fails.
    pub async fn issue(&self, client_id: &str, user_id: UserId) -> AuthResult<AccessToken> {
        let now = OffsetDateTime::now_utc();
        let token = AccessToken {
            token: secret::generate(self.config.secret_bytes),
            client_id: client_id.to_string(),
            user_id,
            created_at: now,
            expires_at: now + self.config.access_token_lifetime(),
        };
        self.tokens.create(&token).await?;
        Ok(token)
    }

    /// Validates a bearer token and returns its record.
    ///
    /// Unknown and expired tokens produce the same `InvalidToken` error.
    ///
    /// # Errors
    ///
    /// - `InvalidToken` when the token is unknown or expired
    /// - `Storage` if the lookup fails
    pub async fn validate(&self, token: &str) -> AuthResult<AccessToken> {
        let record = self
            .tokens
            .find(token)
            .await?
            .ok_or_else(|| AuthError::invalid_token("unknown token"))?;

        if record.is_expired(OffsetDateTime::now_utc()) {
            return Err(AuthError::invalid_token("token expired"));
        }

        Ok(record)
    }

    /// Revokes an access token. Returns `false` when it did not exist;
    /// revoking an already revoked token is not an error.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the operation fails.
    pub async fn revoke(&self, token: &str) -> AuthResult<bool> {
        self.tokens.revoke(token).await
    }

    /// Removes expired codes and tokens. Returns the number of records
    /// deleted.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if either sweep fails.
    pub async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now = OffsetDateTime::now_utc();
        let codes = self.codes.cleanup_expired(now).await?;
        let tokens = self.tokens.cleanup_expired(now).await?;
        if codes + tokens > 0 {
            tracing::debug!(codes, tokens, "Expired auth records removed");
        }
        Ok(codes + tokens)
    }

    /// Resolves the exchanging client. Returns the record and whether it
    /// proved possession of its secret; a secret-less request is resolved
    /// but not authenticated, and is only honored later for a PKCE-bound
    /// code.
    async fn authenticate_client(&self, request: &TokenRequest) -> AuthResult<(Client, bool)> {
        let client = self.clients.find_by_client_id(&request.client_id).await?;

        match (client, request.client_secret.as_deref()) {
            (Some(client), Some(secret)) if client.secret_matches(secret) => Ok((client, true)),
            (Some(client), None) => Ok((client, false)),
            _ => {
                tracing::debug!(client_id = %request.client_id, "Client authentication failed");
                Err(AuthError::invalid_client("unknown client or bad secret"))
            }
        }
    }

    /// Checks the bindings of an already-consumed code. Every failure
    /// here leaves the code burnt, including the secret-less-without-PKCE
    /// rejection: a client that could not authenticate up front does not
    /// get a second attempt at the same code.
    fn check_bindings(
        &self,
        code: &AuthorizationCode,
        client: &Client,
        authenticated: bool,
        request: &TokenRequest,
        now: OffsetDateTime,
    ) -> AuthResult<()> {
        if code.is_expired(now) {
            return Err(AuthError::invalid_grant("code expired"));
        }
        if code.client_id != client.client_id {
            return Err(AuthError::invalid_grant("code issued to a different client"));
        }
        if code.redirect_uri != request.redirect_uri {
            return Err(AuthError::invalid_grant("redirect_uri mismatch"));
        }

        match (&code.code_challenge, &code.code_challenge_method) {
            (Some(challenge), Some(method)) => {
                let Some(verifier) = request.code_verifier.as_deref() else {
                    return Err(AuthError::invalid_grant("code_verifier is required"));
                };
                if !pkce::verify(challenge, method, verifier) {
                    return Err(AuthError::invalid_grant("PKCE verification failed"));
                }
                Ok(())
            }
            _ => {
                if !authenticated {
                    return Err(AuthError::invalid_client(
                        "client_secret is required when the code has no challenge",
                    ));
                }
                // A verifier against a challenge-less code signals a
                // confused or tampered-with flow.
                if request.code_verifier.is_some() {
                    return Err(AuthError::invalid_grant(
                        "code_verifier sent for a code without a challenge",
                    ));
                }
                Ok(())
            }
        }
    }
}

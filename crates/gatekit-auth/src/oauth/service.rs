//! Authorization flow orchestrator.
//!
//! Sequences one authorization attempt:
//! `START -> AWAITING_LOGIN -> AUTHENTICATED -> CODE_ISSUED`.
//!
//! The client and redirect URI are validated before anything else; an
//! unregistered redirect URI is never used to deliver an error response.
//! The AWAITING_LOGIN state has no persisted record — suspension is just
//! a redirect to the login collaborator carrying enough context to resume.
//!
//! # Security
//!
//! - Authorization codes and the state parameter are never logged
//! - Redirect URIs match registered URIs exactly, byte for byte
//! - PKCE is required by default; S256 only unless "plain" is enabled

use std::sync::Arc;

use time::OffsetDateTime;
use url::Url;

use crate::AuthResult;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::identity::{IdentitySource, RequestContext};
use crate::oauth::authorize::{AuthorizationRequest, AuthorizeOutcome};
use crate::pkce::{self, CodeChallengeMethod};
use crate::secret;
use crate::storage::{ClientStore, CodeStore};
use crate::types::{AuthorizationCode, Client, UserId};

/// Orchestrates authorization requests against the external identity
/// collaborator and the code store.
pub struct AuthorizationService {
    clients: Arc<dyn ClientStore>,
    codes: Arc<dyn CodeStore>,
    identity: Arc<dyn IdentitySource>,
    config: AuthConfig,
}

impl AuthorizationService {
    /// Creates a new authorization service.
    #[must_use]
    pub fn new(
        clients: Arc<dyn ClientStore>,
        codes: Arc<dyn CodeStore>,
        identity: Arc<dyn IdentitySource>,
        config: AuthConfig,
    ) -> Self {
        Self {
            clients,
            codes,
            identity,
            config,
        }
    }

    /// Processes an authorization request.
    ///
    /// Validates the client and request, then either suspends for login
    /// ([`AuthorizeOutcome::LoginRequired`]) or issues a code and returns
    /// the redirect parameters ([`AuthorizeOutcome::CodeIssued`]).
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` for an unsupported response type or malformed
    ///   PKCE parameters
    /// - `InvalidClient` for an unknown client
    /// - `InvalidRedirectUri` when the redirect URI is not registered;
    ///   callers must render this directly, never redirect
    pub async fn authorize(
        &self,
        request: &AuthorizationRequest,
        ctx: &RequestContext,
    ) -> AuthResult<AuthorizeOutcome> {
        if request.response_type != "code" {
            return Err(AuthError::invalid_request(format!(
                "unsupported response_type: {}",
                request.response_type
            )));
        }

        let client = self
            .clients
            .find_by_client_id(&request.client_id)
            .await?
            .ok_or_else(|| AuthError::invalid_client("unknown client"))?;

        // Redirect URI is pinned before any response can be delivered
        // through it.
        if !client.is_redirect_uri_allowed(&request.redirect_uri) {
            return Err(AuthError::invalid_redirect_uri(
                "redirect_uri is not registered for this client",
            ));
        }

        self.validate_pkce_params(request)?;

        let Some(user_id) = self.identity.authenticated_user(ctx).await? else {
            return Ok(AuthorizeOutcome::LoginRequired {
                login_url: self.login_url(request)?,
            });
        };

        let code = self
            .issue_code(
                &client,
                user_id,
                &request.redirect_uri,
                request.code_challenge.clone(),
                request.code_challenge_method.clone(),
            )
            .await?;

        Ok(AuthorizeOutcome::CodeIssued {
            redirect_uri: request.redirect_uri.clone(),
            code,
            state: request.state.clone(),
        })
    }

    /// Issues an authorization code bound to client, user, redirect URI,
    /// and PKCE challenge.
    ///
    /// # Errors
    ///
    /// - `InvalidRedirectUri` if `redirect_uri` does not exactly match a
    ///   registered URI
    /// - `Storage` if persistence fails
    pub async fn issue_code(
        &self,
        client: &Client,
        user_id: UserId,
        redirect_uri: &str,
        code_challenge: Option<String>,
        code_challenge_method: Option<String>,
    ) -> AuthResult<String> {
        if !client.is_redirect_uri_allowed(redirect_uri) {
            return Err(AuthError::invalid_redirect_uri(
                "redirect_uri is not registered for this client",
            ));
        }

        let now = OffsetDateTime::now_utc();
        let record = AuthorizationCode {
            code: secret::generate(self.config.secret_bytes),
            client_id: client.client_id.clone(),
            user_id,
            redirect_uri: redirect_uri.to_string(),
            code_challenge,
            code_challenge_method,
            created_at: now,
            expires_at: now + self.config.code_lifetime(),
            consumed_at: None,
        };

        self.codes.create(&record).await?;

        tracing::info!(
            client_id = %client.client_id,
            user_id = %user_id,
            "Authorization code issued"
        );

        Ok(record.code)
    }

    /// Validates the PKCE parameters of an authorization request against
    /// deployment policy.
    fn validate_pkce_params(&self, request: &AuthorizationRequest) -> AuthResult<()> {
        match (&request.code_challenge, &request.code_challenge_method) {
            (None, None) => {
                if self.config.require_pkce {
                    return Err(AuthError::invalid_request(
                        "code_challenge is required",
                    ));
                }
                Ok(())
            }
            (Some(_), None) | (None, Some(_)) => Err(AuthError::invalid_request(
                "code_challenge and code_challenge_method must be provided together",
            )),
            (Some(challenge), Some(method)) => {
                let method = CodeChallengeMethod::parse(method).map_err(|e| {
                    AuthError::invalid_request(format!("invalid code_challenge_method: {e}"))
                })?;
                if method == CodeChallengeMethod::Plain && !self.config.allow_plain_pkce {
                    return Err(AuthError::invalid_request(
                        "the plain code_challenge_method is not accepted",
                    ));
                }
                if method == CodeChallengeMethod::S256 {
                    pkce::validate_challenge(challenge).map_err(|e| {
                        AuthError::invalid_request(format!("invalid code_challenge: {e}"))
                    })?;
                }
                Ok(())
            }
        }
    }

    /// Builds the login collaborator URL that suspends this flow, with a
    /// `return_to` parameter resuming the original authorization request.
    fn login_url(&self, request: &AuthorizationRequest) -> AuthResult<String> {
        let mut resume = Url::parse(&self.config.issuer)
            .map_err(|e| AuthError::configuration(format!("invalid issuer URL: {e}")))?;
        resume.set_path("/oauth/authorize");
        {
            let mut pairs = resume.query_pairs_mut();
            pairs.append_pair("response_type", &request.response_type);
            pairs.append_pair("client_id", &request.client_id);
            pairs.append_pair("redirect_uri", &request.redirect_uri);
            if let Some(challenge) = &request.code_challenge {
                pairs.append_pair("code_challenge", challenge);
            }
            if let Some(method) = &request.code_challenge_method {
                pairs.append_pair("code_challenge_method", method);
            }
            if let Some(state) = &request.state {
                pairs.append_pair("state", state);
            }
        }

        let mut login = Url::parse(&self.config.login_url)
            .map_err(|e| AuthError::configuration(format!("invalid login URL: {e}")))?;
        login
            .query_pairs_mut()
            .append_pair("return_to", resume.as_str());
        Ok(login.into())
    }
}

//! Token revocation endpoint handler.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Form;
use serde::Deserialize;

use crate::error::AuthError;

use super::AuthState;

/// Form body of a revocation request.
#[derive(Debug, Deserialize)]
pub struct RevokeRequest {
    /// The access token to revoke.
    pub token: String,

    /// Public identifier of the revoking client.
    pub client_id: String,

    /// Client secret.
    pub client_secret: String,
}

/// `POST /oauth/revoke`
///
/// Revokes an access token. Per RFC 7009 the endpoint responds 200
/// whether or not the token existed, so callers cannot probe for live
/// tokens; only failed client authentication is an error.
pub async fn handle(
    State(state): State<AuthState>,
    Form(request): Form<RevokeRequest>,
) -> Result<StatusCode, AuthError> {
    state
        .registry
        .authenticate(&request.client_id, &request.client_secret)
        .await?;
    state.tokens.revoke(&request.token).await?;
    Ok(StatusCode::OK)
}

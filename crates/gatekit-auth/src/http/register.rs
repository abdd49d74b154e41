//! Dynamic client registration endpoint handler.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;

use crate::error::AuthError;
use crate::types::RegisteredClient;

use super::AuthState;

/// JSON body of a registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Human-readable client name.
    pub client_name: String,

    /// Redirect URIs the client may use. Must be non-empty absolute URIs.
    pub redirect_uris: Vec<String>,
}

/// `POST /oauth/register`
///
/// Registers a new client and returns its credentials with `200 OK`. The
/// secret appears only in this response; it cannot be retrieved later.
///
/// A missing or malformed body is a `400 invalid_request`, the same as a
/// body that fails semantic validation.
pub async fn handle(
    State(state): State<AuthState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisteredClient>, AuthError> {
    let Json(request) = body.map_err(|rejection| {
        AuthError::invalid_request(rejection.body_text())
    })?;

    let registered = state
        .registry
        .register(&request.client_name, request.redirect_uris, None)
        .await?;
    Ok(Json(registered))
}

//! Bearer token extractor for protected routes.
//!
//! ```ignore
//! async fn userinfo(BearerAuth(token): BearerAuth) -> Json<UserInfo> {
//!     Json(UserInfo { sub: token.user_id })
//! }
//! ```

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::AuthError;
use crate::types::AccessToken;

use super::AuthState;

/// Extractor that validates the `Authorization: Bearer` header and yields
/// the validated access token record.
///
/// Rejects with `InvalidToken` (401) when the header is missing,
/// malformed, or names an unknown or expired token.
#[derive(Debug, Clone)]
pub struct BearerAuth(pub AccessToken);

impl<S> FromRequestParts<S> for BearerAuth
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let state = AuthState::from_ref(state);
        let record = state.tokens.validate(&token).await?;
        Ok(Self(record))
    }
}

fn bearer_token(parts: &Parts) -> Result<String, AuthError> {
    let value = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AuthError::invalid_token("missing Authorization header"))?
        .to_str()
        .map_err(|_| AuthError::invalid_token("malformed Authorization header"))?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::invalid_token("Authorization header is not a Bearer token"))?
        .trim();

    if token.is_empty() {
        return Err(AuthError::invalid_token("empty bearer token"));
    }

    Ok(token.to_string())
}

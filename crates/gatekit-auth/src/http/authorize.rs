//! Authorization endpoint handler.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::error::AuthError;
use crate::oauth::AuthorizationRequest;

use super::AuthState;

/// `GET /oauth/authorize`
///
/// Validates the request and either redirects the user agent to the
/// login page or issues a code and redirects back to the client.
///
/// Validation failures are rendered directly as error responses. Nothing
/// is ever delivered through an unvalidated redirect URI.
pub async fn handle(
    State(state): State<AuthState>,
    Query(request): Query<AuthorizationRequest>,
    headers: HeaderMap,
) -> Result<Response, AuthError> {
    let ctx = super::request_context(&headers);
    let outcome = state.authorization.authorize(&request, &ctx).await?;
    let location = outcome.redirect_url()?;
    Ok(found(&location))
}

fn found(location: &str) -> Response {
    match header::HeaderValue::from_str(location) {
        Ok(value) => {
            (StatusCode::FOUND, [(header::LOCATION, value)]).into_response()
        }
        Err(_) => AuthError::internal("redirect location is not a valid header value")
            .into_response(),
    }
}

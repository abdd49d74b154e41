//! HTTP layer for the authorization server.
//!
//! - [`register`] - dynamic client registration endpoint
//! - [`authorize`] - authorization endpoint
//! - [`token`] - code exchange endpoint
//! - [`revoke`] - token revocation endpoint
//! - [`auth`] - bearer token extractor for protected routes

pub mod auth;
pub mod authorize;
pub mod register;
pub mod revoke;
pub mod token;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use crate::error::AuthError;
use crate::identity::RequestContext;
use crate::oauth::AuthorizationService;
use crate::oauth::token::TokenErrorBody;
use crate::registry::ClientRegistry;
use crate::token::TokenService;

/// Name of the session cookie the authorization endpoint reads.
pub const SESSION_COOKIE: &str = "gatekit_session";

/// Shared state for the OAuth endpoints.
///
/// Include this in the application state and expose it to the handlers
/// via `FromRef`.
#[derive(Clone)]
pub struct AuthState {
    /// Client registration and authentication.
    pub registry: Arc<ClientRegistry>,

    /// Authorization flow orchestrator.
    pub authorization: Arc<AuthorizationService>,

    /// Code exchange and token lifecycle.
    pub tokens: Arc<TokenService>,
}

/// Builds the OAuth endpoint router.
///
/// The registration endpoint is exposed cross-origin so browser-based
/// tools can register clients directly; the other endpoints are
/// same-origin or server-to-server and carry no CORS headers.
pub fn oauth_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    AuthState: axum::extract::FromRef<S>,
{
    let registration_cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route(
            "/oauth/register",
            post(register::handle).layer(registration_cors),
        )
        .route("/oauth/authorize", get(authorize::handle))
        .route("/oauth/token", post(token::handle))
        .route("/oauth/revoke", post(revoke::handle))
}

/// Builds a [`RequestContext`] from request headers, reading the session
/// cookie if present.
#[must_use]
pub fn request_context(headers: &HeaderMap) -> RequestContext {
    let token = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|cookies| {
            cookies.split(';').find_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                (name == SESSION_COOKIE).then(|| value.to_string())
            })
        });

    match token {
        Some(token) => RequestContext::with_session(token),
        None => RequestContext::anonymous(),
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            tracing::error!(error = %self, category = %self.category(), "Request failed");
        } else {
            tracing::debug!(error = %self, category = %self.category(), "Request rejected");
        }

        let status = StatusCode::from_u16(self.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = TokenErrorBody::from(&self);
        let mut response = (status, axum::Json(body)).into_response();
        response.headers_mut().insert(
            header::CACHE_CONTROL,
            header::HeaderValue::from_static("no-store"),
        );
        response
    }
}

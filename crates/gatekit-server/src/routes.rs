//! Router assembly.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use time::OffsetDateTime;
use tower_http::trace::TraceLayer;

use gatekit_auth::http::auth::BearerAuth;
use gatekit_auth::http::oauth_router;
use gatekit_auth::types::UserId;

use crate::state::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(oauth_router::<AppState>())
        .route("/userinfo", get(userinfo))
        .route("/login/providers", get(login_providers))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Resource-owner claims behind a valid bearer token.
#[derive(Debug, Serialize)]
struct UserInfo {
    sub: UserId,
    client_id: String,
    #[serde(with = "time::serde::rfc3339")]
    expires_at: OffsetDateTime,
}

/// `GET /userinfo` - minimal protected resource demonstrating token
/// validation.
async fn userinfo(BearerAuth(token): BearerAuth) -> Json<UserInfo> {
    Json(UserInfo {
        sub: token.user_id,
        client_id: token.client_id,
        expires_at: token.expires_at,
    })
}

/// One provider choice on the login page. Never carries credentials.
#[derive(Debug, Serialize)]
struct ProviderSummary {
    key: String,
    name: String,
}

/// `GET /login/providers` - enabled upstream providers, for login UI.
async fn login_providers(State(state): State<AppState>) -> Json<Vec<ProviderSummary>> {
    let providers = state
        .providers
        .iter()
        .filter(|provider| provider.enabled)
        .map(|provider| ProviderSummary {
            key: provider.key.clone(),
            name: provider.name.clone(),
        })
        .collect();
    Json(providers)
}

/// `GET /healthz`
async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

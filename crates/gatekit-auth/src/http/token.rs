//! Token endpoint handler.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, header};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::AuthError;
use crate::oauth::token::{TokenRequest, TokenResponse};

use super::AuthState;

/// `POST /oauth/token`
///
/// Exchanges an authorization code for an access token. The body may be
/// `application/x-www-form-urlencoded` or `application/json`. The client
/// may authenticate with HTTP Basic auth or with
/// `client_id`/`client_secret` body parameters; Basic auth wins when both
/// are present and name the same client. Public clients send no secret.
pub async fn handle(
    State(state): State<AuthState>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<TokenResponse>, AuthError> {
    let mut request = parse_body(&headers, &body)?;

    if let Some((basic_id, basic_secret)) = basic_credentials(&headers)? {
        if !request.client_id.is_empty() && request.client_id != basic_id {
            return Err(AuthError::invalid_request(
                "client_id in body does not match Basic auth",
            ));
        }
        request.client_id = basic_id;
        request.client_secret = Some(basic_secret);
    }

    let response = state.tokens.exchange(&request).await?;
    Ok(Json(response))
}

/// Parses a token request from a form or JSON body, by content type.
fn parse_body(headers: &HeaderMap, body: &str) -> Result<TokenRequest, AuthError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    if content_type.starts_with("application/json") {
        serde_json::from_str(body)
            .map_err(|e| AuthError::invalid_request(format!("malformed JSON body: {e}")))
    } else {
        serde_urlencoded::from_str(body)
            .map_err(|e| AuthError::invalid_request(format!("malformed form body: {e}")))
    }
}

/// Parses an `Authorization: Basic` header into client credentials.
fn basic_credentials(headers: &HeaderMap) -> Result<Option<(String, String)>, AuthError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| AuthError::invalid_request("malformed Authorization header"))?;
    let Some(encoded) = value.strip_prefix("Basic ") else {
        return Ok(None);
    };

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| AuthError::invalid_client("malformed Basic credentials"))?;
    let decoded = String::from_utf8(decoded)
        .map_err(|_| AuthError::invalid_client("malformed Basic credentials"))?;
    let (id, secret) = decoded
        .split_once(':')
        .ok_or_else(|| AuthError::invalid_client("malformed Basic credentials"))?;

    Ok(Some((id.to_string(), secret.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_content_type(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_parse_form_body() {
        let headers = headers_with_content_type("application/x-www-form-urlencoded");
        let body = "grant_type=authorization_code&code=c1\
                    &redirect_uri=https%3A%2F%2Fapp%2Fcb&client_id=id&code_verifier=v";
        let request = parse_body(&headers, body).unwrap();
        assert_eq!(request.grant_type, "authorization_code");
        assert_eq!(request.code, "c1");
        assert!(request.client_secret.is_none());
        assert_eq!(request.code_verifier.as_deref(), Some("v"));
    }

    #[test]
    fn test_parse_json_body() {
        let headers = headers_with_content_type("application/json");
        let body = r#"{
            "grant_type": "authorization_code",
            "code": "c1",
            "redirect_uri": "https://app/cb",
            "client_id": "id",
            "client_secret": "s"
        }"#;
        let request = parse_body(&headers, body).unwrap();
        assert_eq!(request.code, "c1");
        assert_eq!(request.client_secret.as_deref(), Some("s"));
    }

    #[test]
    fn test_parse_rejects_malformed_bodies() {
        let headers = headers_with_content_type("application/json");
        assert!(matches!(
            parse_body(&headers, "not json"),
            Err(AuthError::InvalidRequest { .. })
        ));

        let headers = headers_with_content_type("application/x-www-form-urlencoded");
        assert!(matches!(
            parse_body(&headers, "code=only"),
            Err(AuthError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn test_basic_credentials_parsing() {
        let mut headers = HeaderMap::new();
        let encoded = STANDARD.encode("client-1:s3cret");
        headers.insert(
            header::AUTHORIZATION,
            format!("Basic {encoded}").parse().unwrap(),
        );
        let (id, secret) = basic_credentials(&headers).unwrap().unwrap();
        assert_eq!(id, "client-1");
        assert_eq!(secret, "s3cret");
    }

    #[test]
    fn test_basic_credentials_absent() {
        assert!(basic_credentials(&HeaderMap::new()).unwrap().is_none());
    }

    #[test]
    fn test_bearer_header_is_not_basic() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer abc".parse().unwrap());
        assert!(basic_credentials(&headers).unwrap().is_none());
    }

    #[test]
    fn test_basic_credentials_rejects_garbage() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Basic !!!".parse().unwrap());
        assert!(basic_credentials(&headers).is_err());
    }
}

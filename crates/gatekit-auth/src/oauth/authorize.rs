//! Authorization request and outcome types.

use serde::Deserialize;
use url::Url;

use crate::error::AuthError;

/// Query parameters of an authorization request.
///
/// `state` is an opaque value chosen by the client; it is echoed back
/// unchanged on the final redirect and never interpreted here.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizationRequest {
    /// Response type; only "code" is supported. Defaults to "code" when
    /// omitted.
    #[serde(default = "default_response_type")]
    pub response_type: String,

    /// Public identifier of the requesting client.
    pub client_id: String,

    /// Redirect URI; must exactly match one registered for the client.
    pub redirect_uri: String,

    /// PKCE code challenge.
    #[serde(default)]
    pub code_challenge: Option<String>,

    /// PKCE challenge method ("S256" expected).
    #[serde(default)]
    pub code_challenge_method: Option<String>,

    /// Opaque client state, echoed unchanged.
    #[serde(default)]
    pub state: Option<String>,
}

fn default_response_type() -> String {
    "code".to_string()
}

/// Result of processing an authorization request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizeOutcome {
    /// No authenticated user session exists; the user agent must be sent
    /// to the login collaborator. Carries the full login URL including a
    /// `return_to` parameter that resumes this flow afterwards.
    LoginRequired {
        /// Where to send the user agent.
        login_url: String,
    },

    /// A code was issued; the user agent must be redirected back to the
    /// client.
    CodeIssued {
        /// The exact registered redirect URI the code is bound to.
        redirect_uri: String,
        /// The authorization code.
        code: String,
        /// Client state to echo, unchanged.
        state: Option<String>,
    },
}

impl AuthorizeOutcome {
    /// Builds the URL the user agent should be redirected to.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the stored redirect URI fails to parse; it
    /// was validated as absolute at registration, so this indicates data
    /// corruption rather than caller error.
    pub fn redirect_url(&self) -> Result<String, AuthError> {
        match self {
            Self::LoginRequired { login_url } => Ok(login_url.clone()),
            Self::CodeIssued {
                redirect_uri,
                code,
                state,
            } => {
                let mut url = Url::parse(redirect_uri)
                    .map_err(|e| AuthError::internal(format!("stored redirect URI invalid: {e}")))?;
                {
                    let mut pairs = url.query_pairs_mut();
                    pairs.append_pair("code", code);
                    if let Some(state) = state {
                        pairs.append_pair("state", state);
                    }
                }
                Ok(url.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_deserialization_defaults() {
        let query = "client_id=abc&redirect_uri=https%3A%2F%2Fapp.example%2Fcb";
        let request: AuthorizationRequest = serde_urlencoded(query);
        assert_eq!(request.response_type, "code");
        assert_eq!(request.client_id, "abc");
        assert!(request.code_challenge.is_none());
        assert!(request.state.is_none());
    }

    #[test]
    fn test_request_deserialization_full() {
        let query = "response_type=code&client_id=abc&redirect_uri=https%3A%2F%2Fapp.example%2Fcb\
                     &code_challenge=E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM\
                     &code_challenge_method=S256&state=xyzzy";
        let request: AuthorizationRequest = serde_urlencoded(query);
        assert_eq!(request.code_challenge_method.as_deref(), Some("S256"));
        assert_eq!(request.state.as_deref(), Some("xyzzy"));
    }

    #[test]
    fn test_redirect_url_with_state() {
        let outcome = AuthorizeOutcome::CodeIssued {
            redirect_uri: "https://app.example/cb".to_string(),
            code: "the-code".to_string(),
            state: Some("xyzzy".to_string()),
        };
        let url = outcome.redirect_url().unwrap();
        assert!(url.starts_with("https://app.example/cb?"));
        assert!(url.contains("code=the-code"));
        assert!(url.contains("state=xyzzy"));
    }

    #[test]
    fn test_redirect_url_without_state() {
        let outcome = AuthorizeOutcome::CodeIssued {
            redirect_uri: "https://app.example/cb".to_string(),
            code: "the-code".to_string(),
            state: None,
        };
        let url = outcome.redirect_url().unwrap();
        assert!(url.contains("code=the-code"));
        assert!(!url.contains("state="));
    }

    #[test]
    fn test_redirect_url_preserves_existing_query() {
        let outcome = AuthorizeOutcome::CodeIssued {
            redirect_uri: "https://app.example/cb?app=1".to_string(),
            code: "c".to_string(),
            state: None,
        };
        let url = outcome.redirect_url().unwrap();
        assert!(url.contains("app=1"));
        assert!(url.contains("code=c"));
    }

    #[test]
    fn test_state_is_percent_encoded_not_interpreted() {
        let outcome = AuthorizeOutcome::CodeIssued {
            redirect_uri: "https://app.example/cb".to_string(),
            code: "c".to_string(),
            state: Some("a b&c=d".to_string()),
        };
        let url = outcome.redirect_url().unwrap();
        assert!(url.contains("state=a+b%26c%3Dd"));
    }

    fn serde_urlencoded(query: &str) -> AuthorizationRequest {
        // Route through Url so tests exercise the same decoding the
        // framework applies.
        let url = Url::parse(&format!("https://host/authorize?{query}")).unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let json = serde_json::to_value(
            pairs
                .into_iter()
                .collect::<std::collections::HashMap<_, _>>(),
        )
        .unwrap();
        serde_json::from_value(json).unwrap()
    }
}

//! PKCE (Proof Key for Code Exchange, RFC 7636).
//!
//! The server stores the `code_challenge` presented at authorization time
//! and verifies the `code_verifier` presented at token exchange. S256 is
//! the expected method; "plain" is kept behind a deployment switch
//! ([`crate::config::AuthConfig::allow_plain_pkce`]) and disabled by
//! default.
//!
//! Comparison is constant time and verification fails closed: malformed
//! verifiers and unsupported methods yield a mismatch, never a bypass.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Errors that can occur while parsing PKCE parameters.
#[derive(Debug, thiserror::Error)]
pub enum PkceError {
    /// Verifier length is outside the valid range (43-128 characters).
    #[error("Invalid verifier length: must be 43-128 characters, got {0}")]
    InvalidVerifierLength(usize),

    /// Verifier contains characters outside `[A-Za-z0-9-._~]`.
    #[error("Invalid verifier characters: must be unreserved URI characters")]
    InvalidVerifierCharacters,

    /// Challenge is not valid base64url (S256 challenges only).
    #[error("Invalid challenge format: must be valid base64url")]
    InvalidChallengeFormat,

    /// The challenge method is not "S256" or "plain".
    #[error("Unsupported challenge method: {0}")]
    UnsupportedMethod(String),
}

/// PKCE challenge method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeChallengeMethod {
    /// SHA-256 hash of the verifier, base64url-encoded. The expected method.
    S256,
    /// Direct comparison of verifier and challenge. Discouraged; only
    /// honored when the deployment explicitly enables it.
    Plain,
}

impl CodeChallengeMethod {
    /// Parses a challenge method from its wire representation.
    ///
    /// # Errors
    ///
    /// Returns `PkceError::UnsupportedMethod` for anything other than
    /// "S256" or "plain". Whether "plain" is *accepted* is a policy
    /// decision made by the caller, not by this parser.
    pub fn parse(method: &str) -> Result<Self, PkceError> {
        match method {
            "S256" => Ok(Self::S256),
            "plain" => Ok(Self::Plain),
            other => Err(PkceError::UnsupportedMethod(other.to_string())),
        }
    }

    /// Returns the wire representation of the method.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S256 => "S256",
            Self::Plain => "plain",
        }
    }
}

impl std::fmt::Display for CodeChallengeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for CodeChallengeMethod {
    fn default() -> Self {
        Self::S256
    }
}

/// Validates a code verifier against RFC 7636 §4.1.
///
/// # Errors
///
/// Returns an error if the length is not 43-128 characters or the verifier
/// contains characters outside the unreserved set `[A-Za-z0-9-._~]`.
pub fn validate_verifier(verifier: &str) -> Result<(), PkceError> {
    let len = verifier.len();
    if !(43..=128).contains(&len) {
        return Err(PkceError::InvalidVerifierLength(len));
    }
    if !verifier
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '_' || c == '~')
    {
        return Err(PkceError::InvalidVerifierCharacters);
    }
    Ok(())
}

/// Validates the syntactic shape of an S256 code challenge.
///
/// # Errors
///
/// Returns `PkceError::InvalidChallengeFormat` if the challenge is not
/// valid base64url without padding.
pub fn validate_challenge(challenge: &str) -> Result<(), PkceError> {
    if URL_SAFE_NO_PAD.decode(challenge).is_err() {
        return Err(PkceError::InvalidChallengeFormat);
    }
    Ok(())
}

/// Computes the S256 challenge for a verifier:
/// `BASE64URL(SHA256(ASCII(code_verifier)))`.
#[must_use]
pub fn s256_challenge(verifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

/// Verifies a code verifier against a stored challenge.
///
/// Fails closed: an unknown method, a malformed verifier, or any
/// comparison mismatch all return `false`. The comparison itself is
/// constant time.
#[must_use]
pub fn verify(challenge: &str, method: &str, verifier: &str) -> bool {
    let Ok(method) = CodeChallengeMethod::parse(method) else {
        return false;
    };
    if validate_verifier(verifier).is_err() {
        return false;
    }

    let computed = match method {
        CodeChallengeMethod::S256 => s256_challenge(verifier),
        CodeChallengeMethod::Plain => verifier.to_string(),
    };

    computed.as_bytes().ct_eq(challenge.as_bytes()).into()
}

/// Generates a random code verifier (43 characters, 256 bits of entropy).
///
/// Primarily for clients and tests; the server itself never generates
/// verifiers.
#[must_use]
pub fn generate_verifier() -> String {
    crate::secret::generate_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test vector from RFC 7636 Appendix B.
    const RFC_VERIFIER: &str = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
    const RFC_CHALLENGE: &str = "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM";

    #[test]
    fn test_rfc7636_appendix_b_vector() {
        assert_eq!(s256_challenge(RFC_VERIFIER), RFC_CHALLENGE);
        assert!(verify(RFC_CHALLENGE, "S256", RFC_VERIFIER));
    }

    #[test]
    fn test_verify_wrong_verifier() {
        let other = generate_verifier();
        assert!(!verify(RFC_CHALLENGE, "S256", &other));
    }

    #[test]
    fn test_verify_plain_method() {
        let verifier = generate_verifier();
        assert!(verify(&verifier, "plain", &verifier));
        assert!(!verify("something-else-entirely-padded-to-43-chars.", "plain", &verifier));
    }

    #[test]
    fn test_verify_fails_closed_on_unknown_method() {
        assert!(!verify(RFC_CHALLENGE, "S512", RFC_VERIFIER));
        assert!(!verify(RFC_CHALLENGE, "", RFC_VERIFIER));
    }

    #[test]
    fn test_verify_fails_closed_on_malformed_verifier() {
        // Too short
        assert!(!verify(RFC_CHALLENGE, "S256", "short"));
        // Invalid characters
        let bad = "!".repeat(50);
        assert!(!verify(RFC_CHALLENGE, "S256", &bad));
        // Too long
        let long = "a".repeat(129);
        assert!(!verify(&s256_challenge(&long), "S256", &long));
    }

    #[test]
    fn test_validate_verifier_bounds() {
        assert!(validate_verifier(&"a".repeat(43)).is_ok());
        assert!(validate_verifier(&"a".repeat(128)).is_ok());
        assert!(matches!(
            validate_verifier(&"a".repeat(42)),
            Err(PkceError::InvalidVerifierLength(42))
        ));
        assert!(matches!(
            validate_verifier(&"a".repeat(129)),
            Err(PkceError::InvalidVerifierLength(129))
        ));
    }

    #[test]
    fn test_validate_verifier_characters() {
        let valid = "abcDEF0123456789-._~".repeat(3);
        assert!(validate_verifier(&valid).is_ok());

        let invalid = format!("{}*", "a".repeat(49));
        assert!(matches!(
            validate_verifier(&invalid),
            Err(PkceError::InvalidVerifierCharacters)
        ));
    }

    #[test]
    fn test_validate_challenge() {
        assert!(validate_challenge(RFC_CHALLENGE).is_ok());
        assert!(matches!(
            validate_challenge("not valid base64url!!!"),
            Err(PkceError::InvalidChallengeFormat)
        ));
    }

    #[test]
    fn test_method_parse() {
        assert_eq!(
            CodeChallengeMethod::parse("S256").unwrap(),
            CodeChallengeMethod::S256
        );
        assert_eq!(
            CodeChallengeMethod::parse("plain").unwrap(),
            CodeChallengeMethod::Plain
        );
        assert!(matches!(
            CodeChallengeMethod::parse("s256"),
            Err(PkceError::UnsupportedMethod(_))
        ));
    }

    #[test]
    fn test_method_display_and_default() {
        assert_eq!(CodeChallengeMethod::S256.to_string(), "S256");
        assert_eq!(CodeChallengeMethod::Plain.to_string(), "plain");
        assert_eq!(CodeChallengeMethod::default(), CodeChallengeMethod::S256);
    }

    #[test]
    fn test_generated_verifier_is_valid() {
        let verifier = generate_verifier();
        assert!(validate_verifier(&verifier).is_ok());
        assert!(verify(&s256_challenge(&verifier), "S256", &verifier));
    }
}

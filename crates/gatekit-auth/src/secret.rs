//! Unguessable secret generation.
//!
//! Every credential minted by the server (client secrets, authorization
//! codes, access tokens) comes from this module. Values are drawn from the
//! thread-local CSPRNG and base64url-encoded without padding so they are
//! safe in URLs, form bodies, and `Authorization` headers.
//!
//! Collision probability at 256 bits is negligible; callers must not add
//! application-level uniqueness retries as a substitute for entropy.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;

/// Default entropy for generated secrets: 32 bytes (256 bits).
pub const DEFAULT_SECRET_BYTES: usize = 32;

/// Generates a cryptographically random secret of `byte_len` bytes,
/// encoded as base64url without padding.
///
/// Stateless and pure apart from RNG consumption.
#[must_use]
pub fn generate(byte_len: usize) -> String {
    let mut bytes = vec![0u8; byte_len];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(&bytes)
}

/// Generates a secret with the default 256 bits of entropy.
///
/// The result is 43 characters of base64url.
#[must_use]
pub fn generate_default() -> String {
    generate(DEFAULT_SECRET_BYTES)
}

//! OAuth 2.1 authorization server core.
//!
//! This crate implements the authorization-code grant with mandatory
//! PKCE: dynamic client registration, authorization and code issuance,
//! single-use code exchange, and bearer access token validation and
//! revocation.
//!
//! # Architecture
//!
//! - [`registry`] - client registration, lookup, authentication
//! - [`oauth`] - authorization flow orchestration and wire types
//! - [`token`] - code exchange and access token lifecycle
//! - [`pkce`] - RFC 7636 proof key verification
//! - [`storage`] - persistence traits implemented by backends
//! - [`identity`] - seam to the external identity collaborator
//! - [`http`] - Axum handlers and the bearer token extractor
//!
//! Stores and the identity source are injected as `Arc<dyn Trait>`;
//! the crate holds no global state. Federated login itself lives behind
//! [`identity::IdentitySource`] and is not implemented here.

pub mod config;
pub mod error;
pub mod http;
pub mod identity;
pub mod oauth;
pub mod pkce;
pub mod registry;
pub mod secret;
pub mod storage;
pub mod token;
pub mod types;

pub use config::AuthConfig;
pub use error::{AuthError, ErrorCategory};
pub use identity::{IdentitySource, RequestContext};
pub use oauth::{AuthorizationRequest, AuthorizationService, AuthorizeOutcome};
pub use registry::ClientRegistry;
pub use token::TokenService;
pub use types::{AccessToken, AuthorizationCode, Client, RegisteredClient, UserId};

/// Result type for authorization server operations.
pub type AuthResult<T> = Result<T, AuthError>;

//! Authorization endpoint types and flow orchestration.
//!
//! - [`authorize`] - authorization request wire type and outcomes
//! - [`service`] - the authorization flow orchestrator
//! - [`token`] - token endpoint wire types

pub mod authorize;
pub mod service;
pub mod token;

pub use authorize::{AuthorizationRequest, AuthorizeOutcome};
pub use service::AuthorizationService;
pub use token::{TokenErrorBody, TokenRequest, TokenResponse};

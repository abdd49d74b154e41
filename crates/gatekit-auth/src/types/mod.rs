//! Domain records for the authorization server.
//!
//! - [`Client`] - a registered OAuth client
//! - [`AuthorizationCode`] - a single-use grant bound to client, user,
//!   redirect URI, and PKCE challenge
//! - [`AccessToken`] - a bearer credential bound to client and user
//!
//! Users are owned by the external identity layer; the core only carries
//! their UUID as a foreign key.

pub mod client;
pub mod code;
pub mod token;

pub use client::{Client, RegisteredClient};
pub use code::AuthorizationCode;
pub use token::AccessToken;

/// Stable identifier of a resource owner, assigned by the external
/// identity layer. The core never creates, updates, or deletes users.
pub type UserId = uuid::Uuid;

//! Storage traits for authorization server data.
//!
//! This module defines the persistence interfaces for:
//!
//! - OAuth client registrations ([`ClientStore`])
//! - Authorization codes ([`CodeStore`])
//! - Access tokens ([`TokenStore`])
//!
//! All durable state lives behind these traits; nothing in the core keeps
//! cross-request mutable state in process memory. Store handles are
//! constructed by the process entry point and injected explicitly.
//!
//! # Implementations
//!
//! - `gatekit-auth-memory` - in-memory backend for tests and development.
//!   A relational backend implements the same traits; `CodeStore::consume`
//!   maps naturally onto a conditional `UPDATE ... RETURNING`.

pub mod client;
pub mod code;
pub mod token;

pub use client::ClientStore;
pub use code::CodeStore;
pub use token::TokenStore;

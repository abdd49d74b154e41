//! Access token issuance, exchange, validation, and revocation.

pub mod service;

pub use service::TokenService;

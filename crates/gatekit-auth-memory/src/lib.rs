//! In-memory storage backend.
//!
//! Backs the authorization server with `tokio::sync::RwLock`-guarded
//! maps. Suitable for tests and single-process deployments; a relational
//! backend implements the same traits with conditional updates instead
//! of lock-guarded mutation.

mod client;
mod code;
mod token;

pub use client::MemoryClientStore;
pub use code::MemoryCodeStore;
pub use token::MemoryTokenStore;

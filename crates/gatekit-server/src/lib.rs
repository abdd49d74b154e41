//! Gatekit server: wires the authorization engine to an in-memory
//! backend, a cookie-session identity source, and an Axum router.

pub mod config;
pub mod observability;
pub mod routes;
pub mod session;
pub mod state;

pub use config::{ServerConfig, load_config};
pub use state::AppState;

//! Tracing subscriber setup.
//!
//! The subscriber is installed once, before configuration is read, with
//! the filter behind a reload layer; once the config file has been
//! parsed, [`apply_logging_level`] re-points the filter at the configured
//! directive without reinstalling anything. Log output never includes
//! secrets, codes, or tokens; handlers only record identifiers and
//! counts.

use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

static FILTER_HANDLE: OnceLock<reload::Handle<EnvFilter, tracing_subscriber::Registry>> =
    OnceLock::new();

/// Installs the global subscriber at the default `info` level.
pub fn init_tracing() {
    init_tracing_with_level("info");
}

/// Installs the global subscriber. A `RUST_LOG` environment variable
/// takes precedence over `level`. Calling this twice is harmless; the
/// second install is ignored.
pub fn init_tracing_with_level(level: &str) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(from_env) => from_env,
        Err(_) => EnvFilter::new(level),
    };

    let (filter, handle) = reload::Layer::new(filter);
    let _ = FILTER_HANDLE.set(handle);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init();
}

/// Swaps in a new filter directive at runtime. Does nothing before
/// [`init_tracing`] has run.
pub fn apply_logging_level(level: &str) {
    if let Some(handle) = FILTER_HANDLE.get() {
        let _ = handle.modify(|filter| *filter = EnvFilter::new(level));
    }
}

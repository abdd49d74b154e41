//! Server configuration.
//!
//! Loaded from an optional TOML file plus `GATEKIT_`-prefixed environment
//! variables; the environment wins. All fields have working defaults so a
//! bare `gatekit-server` starts on localhost.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [logging]
//! level = "info"
//!
//! [auth]
//! issuer = "https://auth.example.com"
//! login_url = "https://auth.example.com/login"
//!
//! [[providers]]
//! key = "github"
//! name = "GitHub"
//! client_id = "..."
//! client_secret = "..."
//! ```

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use gatekit_auth::AuthConfig;
use gatekit_auth::identity::ProviderConfig;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP listener settings.
    pub server: HttpConfig,

    /// Logging settings.
    pub logging: LoggingConfig,

    /// Authorization engine settings.
    pub auth: AuthConfig,

    /// Upstream identity providers offered at login.
    pub providers: Vec<ProviderConfig>,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address.
    pub host: String,

    /// Bind port.
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl HttpConfig {
    /// Socket address string for the listener.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level directive (`error`, `warn`, `info`, `debug`, `trace`,
    /// or a full env-filter expression).
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Loads configuration from the given TOML file (optional) and the
/// environment.
///
/// Environment variables use the `GATEKIT_` prefix with `__` as the
/// section separator, e.g. `GATEKIT_SERVER__PORT=9090`.
///
/// # Errors
///
/// Returns an error if the file is malformed or a value fails to
/// deserialize.
pub fn load_config(path: Option<&str>) -> Result<ServerConfig, config::ConfigError> {
    let path = path.unwrap_or("gatekit.toml");
    let config: ServerConfig = Config::builder()
        .add_source(File::new(path, FileFormat::Toml).required(false))
        .add_source(Environment::with_prefix("GATEKIT").separator("__"))
        .build()?
        .try_deserialize()?;

    config
        .auth
        .validate()
        .map_err(|e| config::ConfigError::Message(e.to_string()))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.server.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.logging.level, "info");
        assert!(config.providers.is_empty());
        assert!(config.auth.require_pkce);
    }

    #[test]
    fn test_toml_deserialization() {
        let toml = r#"
            [server]
            host = "0.0.0.0"
            port = 9090

            [auth]
            issuer = "https://auth.example.com"
            login_url = "https://auth.example.com/login"

            [[providers]]
            key = "github"
            name = "GitHub"
            client_id = "upstream-id"
            client_secret = "upstream-secret"
        "#;
        let config: ServerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.bind_addr(), "0.0.0.0:9090");
        assert_eq!(config.auth.issuer, "https://auth.example.com");
        assert_eq!(config.providers.len(), 1);
        assert_eq!(config.providers[0].key, "github");
        assert!(config.providers[0].enabled);
    }
}

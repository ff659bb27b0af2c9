//! Connection configuration
//!
//! Defaults match the command-line defaults: a local server on port 8529, the
//! `root` user with an empty password and a database called `example_db`.

use crate::errors::{GraphSessionError, GraphSessionResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_DATABASE: &str = "example_db";
pub const DEFAULT_USER: &str = "root";
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8529";

/// Basic-auth credentials
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new(DEFAULT_USER, "")
    }
}

// never print the password
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// HTTP transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportOptions {
    /// Skip TLS certificate verification
    pub accept_invalid_certs: bool,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl TransportOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            accept_invalid_certs: true,
            timeout_secs: 30,
        }
    }
}

/// Everything needed to reach the server and pick the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Server endpoint, e.g. `http://localhost:8529`
    pub endpoint: String,
    /// Database to create and write into
    pub database: String,
    pub credentials: Credentials,
    pub transport: TransportOptions,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            credentials: Credentials::default(),
            transport: TransportOptions::default(),
        }
    }
}

impl ConnectionConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> GraphSessionResult<()> {
        if self.database.trim().is_empty() {
            return Err(GraphSessionError::Config(
                "database name cannot be empty".to_string(),
            ));
        }
        let url = reqwest::Url::parse(&self.endpoint).map_err(|e| {
            GraphSessionError::Config(format!("invalid endpoint '{}': {e}", self.endpoint))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(GraphSessionError::Config(format!(
                "endpoint '{}' must use http or https",
                self.endpoint
            )));
        }
        if self.transport.timeout_secs == 0 {
            return Err(GraphSessionError::Config(
                "timeout must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Endpoint without a trailing slash
    pub fn base_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConnectionConfig::default();
        assert_eq!(config.endpoint, "http://localhost:8529");
        assert_eq!(config.database, "example_db");
        assert_eq!(config.credentials.username, "root");
        assert_eq!(config.credentials.password, "");
        assert!(config.transport.accept_invalid_certs);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut config = ConnectionConfig::default();
        config.database = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = ConnectionConfig::default();
        config.endpoint = "localhost:8529".to_string();
        assert!(config.validate().is_err());

        let mut config = ConnectionConfig::default();
        config.endpoint = "tcp://localhost:8529".to_string();
        assert!(config.validate().is_err());

        let mut config = ConnectionConfig::default();
        config.endpoint = "https://arango.internal:8529/".to_string();
        assert!(config.validate().is_ok());
        assert_eq!(config.base_url(), "https://arango.internal:8529");
    }

    #[test]
    fn test_password_is_redacted() {
        let credentials = Credentials::new("root", "hunter2");
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("root"));
    }
}

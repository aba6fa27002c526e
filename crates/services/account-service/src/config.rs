//! Account service configuration.

use std::env;

use common::{DatabaseConfig, DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_OPERATION_TIMEOUT_MS};

/// Account service configuration.
#[derive(Debug, Clone, Default)]
pub struct AccountServiceConfig {
    /// Store connection settings
    pub database: DatabaseConfig,
}

impl AccountServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = DatabaseConfig::default();

        Self {
            database: DatabaseConfig {
                url: env::var("ACCOUNT_SERVICE_DATABASE_URL")
                    .or_else(|_| env::var("DATABASE_URL"))
                    .unwrap_or(defaults.url),
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or(defaults.max_connections),
                min_connections: parse_var("DATABASE_MIN_CONNECTIONS")
                    .unwrap_or(defaults.min_connections),
                connect_timeout_ms: parse_var("DATABASE_CONNECT_TIMEOUT_MS")
                    .unwrap_or(DEFAULT_CONNECT_TIMEOUT_MS),
                operation_timeout_ms: parse_var("DATABASE_OPERATION_TIMEOUT_MS")
                    .unwrap_or(DEFAULT_OPERATION_TIMEOUT_MS),
            },
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

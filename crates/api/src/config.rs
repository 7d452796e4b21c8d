use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,
    #[error("{name} is not a valid number: {value}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server host to bind to.
    pub host: String,
    /// Server port to bind to.
    pub port: u16,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Maximum database connections in the pool.
    pub db_max_connections: u32,
    /// Minimum database connections in the pool.
    pub db_min_connections: u32,
    /// Event bus channel capacity.
    pub event_bus_capacity: usize,
    /// Log level (e.g., "info", "debug", "trace").
    pub log_level: String,
}

impl AppConfig {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parsed("PORT", "4170")?,
            database_url: env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?,
            db_max_connections: parsed("DB_MAX_CONNECTIONS", "20")?,
            db_min_connections: parsed("DB_MIN_CONNECTIONS", "5")?,
            event_bus_capacity: parsed("EVENT_BUS_CAPACITY", "1024")?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Build the socket address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parsed<T: std::str::FromStr>(name: &'static str, default: &str) -> Result<T, ConfigError> {
    let value = env::var(name).unwrap_or_else(|_| default.to_string());
    value
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { name, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_variables_fall_back_to_defaults() {
        assert_eq!(parsed::<u16>("TREEHOUSE_UNSET_PORT", "4170").unwrap(), 4170);
    }

    #[test]
    fn bad_numbers_are_reported_by_name() {
        env::set_var("TREEHOUSE_TEST_BAD_NUMBER", "lots");
        let err = parsed::<u32>("TREEHOUSE_TEST_BAD_NUMBER", "1").unwrap_err();
        assert!(err.to_string().contains("TREEHOUSE_TEST_BAD_NUMBER"));
        env::remove_var("TREEHOUSE_TEST_BAD_NUMBER");
    }
}

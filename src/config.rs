use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::db::PoolSettings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Application configuration loaded from environment variables.
///
/// Both binaries read the same configuration; the API server only looks at the
/// database and `WEB_*` settings, the frontend only at `FRONTEND_*`, `API_*`
/// and `SPREADSHEET_*`.
#[derive(Debug, Clone)]
pub struct Config {
    // Database
    pub database_path: PathBuf,
    pub db_pool_min: u32,
    pub db_pool_max: u32,
    pub db_acquire_timeout: Duration,

    // API server
    pub web_host: String,
    pub web_port: u16,

    // Frontend
    pub frontend_host: String,
    pub frontend_port: u16,
    pub api_base_url: String,
    pub api_timeout: Duration,

    // Spreadsheet widget
    pub spreadsheet_script_url: Option<String>,
    pub spreadsheet_license_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Database
            database_path: PathBuf::from(env_or_default("DATABASE_PATH", "./data/board.sqlite")),
            db_pool_min: parse_env_u32("DB_POOL_MIN", 1)?,
            db_pool_max: parse_env_u32("DB_POOL_MAX", 10)?,
            db_acquire_timeout: Duration::from_secs(parse_env_u64("DB_ACQUIRE_TIMEOUT_SECS", 30)?),

            // API server
            web_host: env_or_default("WEB_HOST", "0.0.0.0"),
            web_port: parse_env_u16("WEB_PORT", 3000)?,

            // Frontend
            frontend_host: env_or_default("FRONTEND_HOST", "0.0.0.0"),
            frontend_port: parse_env_u16("FRONTEND_PORT", 8080)?,
            api_base_url: env_or_default("API_BASE_URL", "http://localhost:3000/api"),
            api_timeout: Duration::from_secs(parse_env_u64("API_TIMEOUT_SECS", 10)?),

            // Spreadsheet widget
            spreadsheet_script_url: optional_env("SPREADSHEET_SCRIPT_URL"),
            spreadsheet_license_key: optional_env("SPREADSHEET_LICENSE_KEY"),
        })
    }

    /// Configuration with defaults only, for tests.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            database_path: PathBuf::from("./data/test.sqlite"),
            db_pool_min: 1,
            db_pool_max: 4,
            db_acquire_timeout: Duration::from_secs(5),
            web_host: "127.0.0.1".to_string(),
            web_port: 0,
            frontend_host: "127.0.0.1".to_string(),
            frontend_port: 0,
            api_base_url: "http://127.0.0.1:3000/api".to_string(),
            api_timeout: Duration::from_secs(5),
            spreadsheet_script_url: None,
            spreadsheet_license_key: None,
        }
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.db_pool_max == 0 {
            return Err(ConfigError::InvalidValue {
                name: "DB_POOL_MAX".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.db_pool_min > self.db_pool_max {
            return Err(ConfigError::InvalidValue {
                name: "DB_POOL_MIN".to_string(),
                message: format!("must not exceed DB_POOL_MAX ({})", self.db_pool_max),
            });
        }
        if let Err(e) = url::Url::parse(&self.api_base_url) {
            return Err(ConfigError::InvalidValue {
                name: "API_BASE_URL".to_string(),
                message: e.to_string(),
            });
        }
        Ok(())
    }

    /// Connection pool bounds for [`crate::db::Database::new`].
    #[must_use]
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            min_connections: self.db_pool_min,
            max_connections: self.db_pool_max,
            acquire_timeout: self.db_acquire_timeout,
        }
    }
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u32(name: &str, default: u32) -> Result<u32, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for name in [
            "DATABASE_PATH",
            "DB_POOL_MIN",
            "DB_POOL_MAX",
            "DB_ACQUIRE_TIMEOUT_SECS",
            "WEB_PORT",
            "API_BASE_URL",
            "SPREADSHEET_SCRIPT_URL",
        ] {
            std::env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env().unwrap();
        assert_eq!(config.database_path, PathBuf::from("./data/board.sqlite"));
        assert_eq!(config.db_pool_min, 1);
        assert_eq!(config.db_pool_max, 10);
        assert_eq!(config.web_port, 3000);
        assert_eq!(config.api_base_url, "http://localhost:3000/api");
        assert!(config.spreadsheet_script_url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_parse_error_names_variable() {
        clear_env();
        std::env::set_var("WEB_PORT", "not-a-port");
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("WEB_PORT"));
        clear_env();
    }

    #[test]
    fn test_validate_pool_bounds() {
        let mut config = Config::for_testing();
        config.db_pool_max = 0;
        assert!(config.validate().is_err());

        config.db_pool_max = 2;
        config.db_pool_min = 3;
        assert!(config.validate().is_err());

        config.db_pool_min = 2;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_api_base_url() {
        let mut config = Config::for_testing();
        config.api_base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pool_settings() {
        let settings = Config::for_testing().pool_settings();
        assert_eq!(settings.min_connections, 1);
        assert_eq!(settings.max_connections, 4);
    }
}

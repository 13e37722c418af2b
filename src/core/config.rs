use std::path::PathBuf;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | WORK_DIR | /var/lib/bazaar | Working directory (database, logs) |
/// | HTTP_PORT | 3100 | HTTP API port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | REQUEST_TIMEOUT_MS | 30000 | Request timeout in milliseconds |
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for database files and logs
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Request timeout (milliseconds)
    pub request_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/bazaar".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3100),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
        }
    }

    /// Override selected values, commonly used in tests
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// Database directory under the working directory
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// Log directory under the working directory
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// Default log level for this environment, overridable via `RUST_LOG`
    pub fn default_log_level(&self) -> &'static str {
        if self.is_development() { "debug" } else { "info" }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directories_hang_off_the_work_dir() {
        let config = Config::with_overrides("/srv/bazaar", 4000);
        assert_eq!(config.database_dir(), PathBuf::from("/srv/bazaar/database"));
        assert_eq!(config.log_dir(), PathBuf::from("/srv/bazaar/logs"));
        assert_eq!(config.http_port, 4000);
    }

    #[test]
    fn log_level_follows_the_environment() {
        let mut config = Config::with_overrides("/srv/bazaar", 4000);

        config.environment = "development".into();
        assert!(config.is_development());
        assert!(!config.is_production());
        assert_eq!(config.default_log_level(), "debug");

        config.environment = "production".into();
        assert!(config.is_production());
        assert_eq!(config.default_log_level(), "info");

        config.environment = "staging".into();
        assert!(!config.is_development());
        assert!(!config.is_production());
        assert_eq!(config.default_log_level(), "info");
    }
}

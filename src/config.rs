use std::fmt;

use config::{Config, Environment, File, Map};
use serde::{Deserialize, Serialize};

use crate::error::{LoaderError, Result};
use crate::validation::InputValidator;

/// Rows per multi-row `INSERT` when nothing else is configured
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Prefix of the environment variables holding database credentials
pub const DATABASE_ENV_PREFIX: &str = "POSTGRES";

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log output settings
    pub logging: LoggingConfig,
    /// Bulk load settings
    pub loader: LoaderConfig,
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Optional log file; a daily-rolling JSON log is written next to it
    pub file_path: Option<String>,
    /// Console format, "text" or "json"
    pub format: String,
}

/// Bulk load settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Rows per multi-row `INSERT` statement
    pub batch_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
            loader: LoaderConfig {
                batch_size: DEFAULT_BATCH_SIZE,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence
    ///
    /// Defaults, then `config/default` and `config/local` (any format the
    /// `config` crate understands), then `RAW_LOADER__SECTION__KEY`
    /// environment variables.
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("RAW_LOADER")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .map_err(|e| LoaderError::Config(format!("Failed to load configuration: {e}")))?;

        let app_config: Self = settings
            .try_deserialize()
            .map_err(|e| LoaderError::Config(format!("Failed to deserialize configuration: {e}")))?;

        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(LoaderError::Config(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level, valid_levels
            )));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(LoaderError::Config(format!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format, valid_formats
            )));
        }

        InputValidator::validate_batch_size(self.loader.batch_size)?;

        Ok(())
    }
}

/// PostgreSQL connection settings, read once from `POSTGRES_*` variables.
#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Server host name or address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database name (`POSTGRES_DB`)
    #[serde(rename = "db")]
    pub database: String,
    /// Login role
    pub user: String,
    /// Login password
    pub password: String,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl DatabaseConfig {
    /// Read `POSTGRES_HOST`, `POSTGRES_PORT`, `POSTGRES_DB`, `POSTGRES_USER`
    /// and `POSTGRES_PASSWORD` from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_environment(Environment::with_prefix(DATABASE_ENV_PREFIX))
    }

    /// Same as [`DatabaseConfig::from_env`] but reading from an explicit map
    /// of variable names to values instead of the process environment.
    pub fn from_map(vars: Map<String, String>) -> Result<Self> {
        Self::from_environment(Environment::with_prefix(DATABASE_ENV_PREFIX).source(Some(vars)))
    }

    fn from_environment(environment: Environment) -> Result<Self> {
        let db_config: Self = Config::builder()
            .add_source(environment)
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| LoaderError::Config(format!("Failed to read database settings: {e}")))?;

        db_config.validate()?;
        Ok(db_config)
    }

    /// Validate connection settings
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(LoaderError::Config("POSTGRES_HOST cannot be empty".to_string()));
        }
        if self.port == 0 {
            return Err(LoaderError::Config("POSTGRES_PORT must be greater than 0".to_string()));
        }
        if self.database.trim().is_empty() {
            return Err(LoaderError::Config("POSTGRES_DB cannot be empty".to_string()));
        }
        if self.user.trim().is_empty() {
            return Err(LoaderError::Config("POSTGRES_USER cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Render a libpq keyword/value connection string.
    #[must_use]
    pub fn conninfo(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password={}",
            quote_conninfo_value(&self.host),
            self.port,
            quote_conninfo_value(&self.database),
            quote_conninfo_value(&self.user),
            quote_conninfo_value(&self.password),
        )
    }
}

/// Quote a conninfo value when libpq would otherwise split or misread it.
fn quote_conninfo_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '\'' || c == '\\' || c == '=');
    if !needs_quotes {
        return value.to_string();
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if c == '\'' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

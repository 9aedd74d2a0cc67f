//! Configuration loader
//!
//! Sources are merged with figment, later ones overriding earlier ones:
//!
//! 1. `AppConfig::default()`
//! 2. A TOML file: the explicit path, else `durastate.toml` in the working
//!    directory, else `<config dir>/durastate/durastate.toml`
//! 3. Environment variables prefixed `DURASTATE_`, nested with `__`
//!    (e.g. `DURASTATE_BACKEND__PROVIDER=postgres`)

use std::env;
use std::path::{Path, PathBuf};

use durastate_domain::error::{Error, Result};
use durastate_providers::utils::{validate_qualified_identifier, validate_table_identifier};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};

use crate::config::{AppConfig, BackendConfig, CassandraConfig, DynamoDbConfig, PostgresConfig};
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME,
};
use crate::error_ext::{ErrorContext, invalid_config};
use crate::logging::{log_config_loaded, parse_log_level};

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load and validate configuration from all sources
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error when an explicit file is missing, a
    /// source fails to parse, or the merged values fail validation.
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(config_path) = &self.config_path {
            if !config_path.exists() {
                log_config_loaded(config_path, false);
                return Err(Error::configuration(format!(
                    "configuration file not found: {}",
                    config_path.display()
                )));
            }
            figment = figment.merge(Toml::file(config_path));
            log_config_loaded(config_path, true);
        } else if let Some(default_path) = Self::find_default_config_path() {
            figment = figment.merge(Toml::file(&default_path));
            log_config_loaded(&default_path, true);
        }

        figment = figment.merge(
            Env::prefixed(&format!("{}_", self.env_prefix)).split(CONFIG_ENV_SEPARATOR),
        );

        let app_config: AppConfig = figment
            .extract()
            .config_context("failed to extract configuration")?;

        validate_app_config(&app_config)?;
        Ok(app_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).config_context("failed to serialize config to TOML")?;
        std::fs::write(path.as_ref(), toml_string).config_context("failed to write config file")?;
        Ok(())
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    fn find_default_config_path() -> Option<PathBuf> {
        let candidates = [
            env::current_dir().ok().map(|d| d.join(DEFAULT_CONFIG_FILENAME)),
            dirs::config_dir().map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME)),
        ];
        candidates.into_iter().flatten().find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate application configuration
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    parse_log_level(&config.logging.level)?;
    validate_backend_config(&config.backend)
}

/// Validate the selected backend's settings
pub fn validate_backend_config(config: &BackendConfig) -> Result<()> {
    match config {
        BackendConfig::Memory => Ok(()),
        BackendConfig::Postgres(postgres) => validate_postgres_config(postgres),
        BackendConfig::Cassandra(cassandra) => validate_cassandra_config(cassandra),
        BackendConfig::DynamoDb(dynamodb) => validate_dynamodb_config(dynamodb),
    }
}

fn validate_postgres_config(config: &PostgresConfig) -> Result<()> {
    require_non_empty("backend.host", &config.host)?;
    require_non_empty("backend.database", &config.database)?;
    require_non_empty("backend.user", &config.user)?;
    validate_qualified_identifier(&config.qualified_table())
        .map_err(|e| invalid_config("backend.table", e))?;
    if config.max_connections == 0 {
        return Err(Error::configuration(
            "backend.max_connections must be greater than 0",
        ));
    }
    if config.min_connections > config.max_connections {
        return Err(Error::configuration(format!(
            "backend.min_connections ({}) cannot exceed max_connections ({})",
            config.min_connections, config.max_connections
        )));
    }
    Ok(())
}

fn validate_cassandra_config(config: &CassandraConfig) -> Result<()> {
    if config.contact_points.is_empty() {
        return Err(Error::configuration(
            "backend.contact_points cannot be empty",
        ));
    }
    for point in &config.contact_points {
        require_non_empty("backend.contact_points", point)?;
    }
    validate_table_identifier(&config.keyspace)
        .map_err(|e| invalid_config("backend.keyspace", e))?;
    validate_table_identifier(&config.table).map_err(|e| invalid_config("backend.table", e))?;
    if config.username.is_some() != config.password.is_some() {
        return Err(Error::configuration(
            "backend.username and backend.password must be set together",
        ));
    }
    Ok(())
}

fn validate_dynamodb_config(config: &DynamoDbConfig) -> Result<()> {
    require_non_empty("backend.table", &config.table)?;
    require_non_empty("backend.region", &config.region)?;
    if let Some(credentials) = &config.credentials {
        require_non_empty("backend.credentials.access_key_id", &credentials.access_key_id)?;
        require_non_empty(
            "backend.credentials.secret_access_key",
            &credentials.secret_access_key,
        )?;
    }
    Ok(())
}

fn require_non_empty(key: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::configuration(format!("{key} cannot be empty")));
    }
    Ok(())
}

/// Configuration builder for programmatic configuration
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: AppConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set logging configuration
    pub fn with_logging(mut self, logging: crate::config::LoggingConfig) -> Self {
        self.config.logging = logging;
        self
    }

    /// Select the backend
    pub fn with_backend(mut self, backend: BackendConfig) -> Self {
        self.config.backend = backend;
        self
    }

    /// Build the configuration
    pub fn build(self) -> AppConfig {
        self.config
    }

    /// Build and validate the configuration
    pub fn try_build(self) -> Result<AppConfig> {
        validate_app_config(&self.config)?;
        Ok(self.config)
    }
}

use config::{Config, Environment, File, Map};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::defaults::OwnerDefaults;
use crate::error::{ArtifactError, Result};
use crate::models::Address;
use crate::schema::line;

/// Application configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub case: CaseConfig,
    #[serde(default)]
    pub owner: OwnerConfig,
    pub logging: LoggingConfig,
}

/// Where to look for LINE databases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Root of the extracted device image
    pub root: Option<String>,
    /// Package directory the databases must live under
    pub package_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseConfig {
    pub database_path: String,
}

/// Device owner used when a record does not name one of its parties
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerConfig {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
    pub format: String, // "json" or "text"
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig {
                root: None,
                package_name: line::PACKAGE_NAME.to_string(),
            },
            case: CaseConfig {
                database_path: "case/line-artifacts.db".to_string(),
            },
            owner: OwnerConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, reading `file` after the standard locations
    pub fn load_from(file: Option<&Path>) -> Result<Self> {
        Self::load_with_env(file, None)
    }

    /// Load configuration with `env` standing in for the process environment.
    ///
    /// Keys use the same `LINE_ARTIFACTS_` naming as real variables. `None`
    /// reads the process environment.
    pub fn load_with_env(file: Option<&Path>, env: Option<Map<String, String>>) -> Result<Self> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("source.package_name", defaults.source.package_name)?
            .set_default("case.database_path", defaults.case.database_path)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", defaults.logging.format)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(File::with_name("line-artifacts").required(false));

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }

        // e.g. LINE_ARTIFACTS_CASE__DATABASE_PATH
        let config = builder
            .add_source(
                Environment::with_prefix("LINE_ARTIFACTS")
                    .prefix_separator("_")
                    .separator("__")
                    .source(env),
            )
            .build()?;

        let app_config: Self = config.try_deserialize()?;
        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ArtifactError::InvalidConfig(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level, valid_levels
            )));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(ArtifactError::InvalidConfig(format!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format, valid_formats
            )));
        }

        if self.source.package_name.trim().is_empty() {
            return Err(ArtifactError::InvalidConfig("package_name must not be empty".to_string()));
        }

        if self.case.database_path.trim().is_empty() {
            return Err(ArtifactError::InvalidConfig("case database_path must not be empty".to_string()));
        }

        if self.owner.name.is_some() && self.owner.id.is_none() {
            return Err(ArtifactError::InvalidConfig("owner name requires an owner id".to_string()));
        }

        Ok(())
    }

    /// Defaults provider for the configured device owner
    #[must_use]
    pub fn owner_defaults(&self) -> OwnerDefaults {
        match &self.owner.id {
            Some(id) => OwnerDefaults::with_owner(Address::new(id.clone(), self.owner.name.clone().unwrap_or_default())),
            None => OwnerDefaults::default(),
        }
    }

    /// Get log level from environment or config
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }
}

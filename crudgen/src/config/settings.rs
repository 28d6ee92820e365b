//! Configuration settings for crudgen

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use super::defaults;
use crate::error::{CodegenError, Result};

/// Main configuration struct for code generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// Project name; drives the output folders and the generated namespaces
    #[serde(default)]
    pub project_name: String,

    /// Database whose tables are generated
    #[serde(default)]
    pub database_name: String,

    /// Root directory under which the project folder is created
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,

    /// Tables to include (comma-separated, or "*" for all)
    #[serde(default = "default_include_tables")]
    pub include_tables: String,

    /// Tables to exclude (comma-separated)
    #[serde(default = "default_exclude_tables")]
    pub exclude_tables: String,

    /// Read metadata from a TOML schema snapshot instead of a live database
    #[serde(default)]
    pub snapshot_file: Option<PathBuf>,

    /// Live database connection, used when no snapshot is configured
    #[serde(default)]
    pub connection: ConnectionSettings,

    /// Dry run mode - preview without writing files
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    /// Can be overridden by RUST_LOG env var
    #[serde(default)]
    pub log_level: Option<String>,
}

/// Connection parameters handed to the live metadata provider
#[derive(Clone, Serialize, Deserialize)]
pub struct ConnectionSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub user: String,

    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

// Default value functions for serde
fn default_output_root() -> PathBuf {
    PathBuf::from(defaults::OUTPUT_ROOT)
}
fn default_include_tables() -> String {
    defaults::INCLUDE_TABLES.to_string()
}
fn default_exclude_tables() -> String {
    defaults::EXCLUDE_TABLES.to_string()
}
fn default_dry_run() -> bool {
    defaults::DRY_RUN
}
fn default_host() -> String {
    defaults::HOST.to_string()
}
fn default_port() -> u16 {
    defaults::PORT
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            user: String::new(),
            password: String::new(),
        }
    }
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            database_name: String::new(),
            output_root: default_output_root(),
            include_tables: default_include_tables(),
            exclude_tables: default_exclude_tables(),
            snapshot_file: None,
            connection: ConnectionSettings::default(),
            dry_run: default_dry_run(),
            log_level: None,
        }
    }
}

impl CodegenConfig {
    /// Create a default config for the given project and database
    pub fn new(project_name: impl Into<String>, database_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            database_name: database_name.into(),
            ..Default::default()
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CodegenConfig = toml::from_str(&content).map_err(|e| {
            CodegenError::ConfigError(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(config)
    }

    /// Load configuration using config-rs (file + environment variables)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        } else {
            builder = builder.add_source(File::with_name(defaults::CONFIG_FILE).required(false));
        }

        // CRUDGEN_PROJECT_NAME, CRUDGEN_CONNECTION__USER, ...
        builder = builder.add_source(
            Environment::with_prefix(defaults::ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

        let config: CodegenConfig = builder.build()?.try_deserialize()?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.project_name.trim().is_empty() {
            return Err(CodegenError::ValidationError(
                "project_name is required".into(),
            ));
        }

        if self.database_name.trim().is_empty() {
            return Err(CodegenError::ValidationError(
                "database_name is required".into(),
            ));
        }

        match &self.snapshot_file {
            Some(snapshot) if !snapshot.exists() => {
                return Err(CodegenError::ValidationError(format!(
                    "Snapshot file not found: {}",
                    snapshot.display()
                )));
            }
            Some(_) => {}
            None => {
                if self.connection.user.trim().is_empty() {
                    return Err(CodegenError::ValidationError(
                        "connection.user is required when no snapshot_file is set".into(),
                    ));
                }
            }
        }

        Ok(())
    }
}

//! crudgen: Generate C# CRUD classes from a database schema
//!
//! For every table of a database, crudgen reads the table's columns and the
//! parameters of its stored routines and writes two C# classes:
//!
//! - `{P}/{P}_Data/cls{Entity}Data.cs`: static data-access methods calling
//!   `SP_GetAll{Table}`, `SP_AddNew{Entity}`, `SP_Update{Entity}` and
//!   `SP_Delete{Entity}` through ADO.NET
//! - `{P}/{P}_Business/cls{Entity}.cs`: an entity with one property per column,
//!   two constructors and a mode-driven `Save()`
//!
//! The entity name is the table name minus its last character (`Products` ->
//! `Product`).
//!
//! # Usage
//!
//! ```rust,ignore
//! let report = crudgen::GeneratorBuilder::new("Shop", "Shop")
//!     .snapshot_file("schema.toml")
//!     .output_root("generated")
//!     .generate()
//!     .await?;
//! println!("{} tables", report.tables_processed());
//! ```
//!
//! Metadata comes from a live MySQL server (feature `mysql`) or from a TOML
//! schema snapshot; see [`metadata::SchemaSnapshot`].
//!
//! # CLI Usage
//!
//! ```bash
//! crudgen --project Shop --database Shop --user root generate
//! crudgen --project Shop --database Shop --snapshot schema.toml inspect --json
//! ```

pub mod codegen;
pub mod config;
pub mod error;
pub mod metadata;
pub mod sink;

use std::path::Path;

use tracing::{debug, info};

use codegen::{GenerationOrchestrator, GenerationReport, OutputLayout, TableFilter};
use metadata::{MetadataProvider, SnapshotProvider};
use sink::{FileSystemSink, LocalFileSink, MemorySink};

pub use config::CodegenConfig;
pub use error::{CodegenError, Result};

/// Generate classes for every table of `config.database_name`
pub async fn generate(
    config: &CodegenConfig,
    provider: &dyn MetadataProvider,
    sink: &dyn FileSystemSink,
) -> Result<GenerationReport> {
    info!(
        "Generating project {} from database {} into {:?}",
        config.project_name, config.database_name, config.output_root
    );
    let filter = TableFilter::new(&config.include_tables, &config.exclude_tables);
    debug!(
        "Table filter: include={}, exclude={}",
        config.include_tables, config.exclude_tables
    );

    let layout = OutputLayout::new(&config.output_root, &config.project_name);
    let report = GenerationOrchestrator::new(provider, sink, layout)
        .with_filter(filter)
        .run(&config.database_name)
        .await?;

    info!("Code generation complete");
    Ok(report)
}

/// Build the metadata provider a configuration asks for: the snapshot file if
/// one is set, the live database otherwise.
pub fn provider_from_config(config: &CodegenConfig) -> Result<Box<dyn MetadataProvider>> {
    if let Some(path) = &config.snapshot_file {
        debug!("Reading metadata from snapshot {}", path.display());
        return Ok(Box::new(SnapshotProvider::from_file(path)?));
    }

    live_provider(config)
}

#[cfg(feature = "mysql")]
fn live_provider(config: &CodegenConfig) -> Result<Box<dyn MetadataProvider>> {
    debug!(
        "Reading metadata from MySQL at {}:{}",
        config.connection.host, config.connection.port
    );
    Ok(Box::new(metadata::MySqlMetadataProvider::new(
        config.connection.clone(),
        config.database_name.clone(),
    )))
}

#[cfg(not(feature = "mysql"))]
fn live_provider(_config: &CodegenConfig) -> Result<Box<dyn MetadataProvider>> {
    Err(CodegenError::ConfigError(
        "no snapshot_file set and crudgen was built without the mysql feature".into(),
    ))
}

/// Validate a configuration and run generation with the provider and sink it
/// describes. Dry runs write to memory only.
pub async fn generate_from_config(config: &CodegenConfig) -> Result<GenerationReport> {
    config.validate()?;
    let provider = provider_from_config(config)?;

    if config.dry_run {
        let sink = MemorySink::new();
        let report = generate(config, provider.as_ref(), &sink).await?;
        debug!("Dry run produced {} files", sink.files().len());
        Ok(report)
    } else {
        generate(config, provider.as_ref(), &LocalFileSink).await
    }
}

/// Builder pattern for programmatic configuration
pub struct GeneratorBuilder {
    config: CodegenConfig,
}

impl GeneratorBuilder {
    /// Create a new builder for the given project and database
    pub fn new(project_name: &str, database_name: &str) -> Self {
        Self {
            config: CodegenConfig::new(project_name, database_name),
        }
    }

    /// Set the directory the project folder is created in
    pub fn output_root(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.output_root = dir.as_ref().to_path_buf();
        self
    }

    /// Read metadata from a TOML snapshot instead of a live database
    pub fn snapshot_file(mut self, path: impl AsRef<Path>) -> Self {
        self.config.snapshot_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the live database connection
    pub fn connection(mut self, host: &str, port: u16, user: &str, password: &str) -> Self {
        self.config.connection = config::ConnectionSettings {
            host: host.to_string(),
            port,
            user: user.to_string(),
            password: password.to_string(),
        };
        self
    }

    /// Set tables to include
    pub fn include_tables(mut self, tables: &[&str]) -> Self {
        self.config.include_tables = tables.join(",");
        self
    }

    /// Set tables to exclude
    pub fn exclude_tables(mut self, tables: &[&str]) -> Self {
        self.config.exclude_tables = tables.join(",");
        self
    }

    /// Enable dry run mode (preview without writing files)
    pub fn dry_run(mut self) -> Self {
        self.config.dry_run = true;
        self
    }

    pub fn config(&self) -> &CodegenConfig {
        &self.config
    }

    /// Generate the code
    pub async fn generate(self) -> Result<GenerationReport> {
        generate_from_config(&self.config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_builder() {
        let builder = GeneratorBuilder::new("Shop", "ShopDb")
            .output_root("out")
            .include_tables(&["Products", "Orders"])
            .exclude_tables(&["sysdiagrams", "Logs"])
            .connection("db", 3307, "root", "secret")
            .dry_run();

        let config = builder.config();
        assert_eq!(config.project_name, "Shop");
        assert_eq!(config.database_name, "ShopDb");
        assert_eq!(config.output_root, PathBuf::from("out"));
        assert_eq!(config.include_tables, "Products,Orders");
        assert_eq!(config.exclude_tables, "sysdiagrams,Logs");
        assert_eq!(config.connection.port, 3307);
        assert!(config.dry_run);
    }

    #[test]
    fn test_provider_from_missing_snapshot_fails() {
        let mut config = CodegenConfig::new("Shop", "Shop");
        config.snapshot_file = Some(PathBuf::from("does/not/exist.toml"));
        assert!(provider_from_config(&config).is_err());
    }

    #[tokio::test]
    async fn test_generate_from_config_validates() {
        let config = CodegenConfig::default();
        let err = generate_from_config(&config).await.unwrap_err();
        assert!(matches!(err, CodegenError::ValidationError(_)));
    }
}

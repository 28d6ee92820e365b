//! Schema snapshot provider - serves metadata from a TOML description
//!
//! ```toml
//! database = "Shop"
//!
//! [[tables]]
//! name = "Products"
//! columns = [
//!     { name = "ProductID", data_type = "int" },
//!     { name = "Name", data_type = "nvarchar" },
//! ]
//!
//! [[routines]]
//! name = "SP_AddNewProduct"
//! parameters = [
//!     { name = "@Name", data_type = "nvarchar", direction = "IN" },
//!     { name = "@ProductID", data_type = "int", direction = "OUT" },
//! ]
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use super::model::{ColumnMetadata, MetadataResult, ParameterMetadata, TableMetadata};
use super::provider::MetadataProvider;
use crate::error::{CodegenError, Result};

/// A stored routine and its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineMetadata {
    pub name: String,

    #[serde(default)]
    pub parameters: Vec<ParameterMetadata>,
}

/// Serialized form of a database schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    /// Database the snapshot was taken from; any database matches when unset
    #[serde(default)]
    pub database: Option<String>,

    #[serde(default)]
    pub tables: Vec<TableMetadata>,

    #[serde(default)]
    pub routines: Vec<RoutineMetadata>,
}

impl SchemaSnapshot {
    /// Parse a snapshot from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CodegenError::SnapshotError(e.to_string()))
    }

    /// Load a snapshot from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            CodegenError::SnapshotError(format!("{}: {}", path.display(), e))
        })
    }

    pub fn table(&self, name: &str) -> Option<&TableMetadata> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn routine(&self, name: &str) -> Option<&RoutineMetadata> {
        self.routines.iter().find(|r| r.name == name)
    }
}

/// Metadata provider backed by a [`SchemaSnapshot`]
#[derive(Debug, Clone, Default)]
pub struct SnapshotProvider {
    snapshot: SchemaSnapshot,
}

impl SnapshotProvider {
    pub fn new(snapshot: SchemaSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        SchemaSnapshot::from_file(path).map(Self::new)
    }
}

#[async_trait]
impl MetadataProvider for SnapshotProvider {
    async fn list_tables(&self, database: &str) -> MetadataResult<String> {
        let result = match &self.snapshot.database {
            Some(expected) if expected != database => Err(format!(
                "snapshot describes database '{}', not '{}'",
                expected, database
            )),
            _ => {
                let mut names: Vec<String> =
                    self.snapshot.tables.iter().map(|t| t.name.clone()).collect();
                names.sort();
                Ok(names)
            }
        };
        MetadataResult::from_fetch(&format!("tables of {}", database), result)
    }

    async fn list_columns(&self, table: &str) -> MetadataResult<ColumnMetadata> {
        let columns = self
            .snapshot
            .table(table)
            .map(|t| t.columns.clone())
            .unwrap_or_default();
        debug!("Snapshot: {} columns for {}", columns.len(), table);
        MetadataResult::ok(columns)
    }

    async fn list_parameters(&self, routine: &str) -> MetadataResult<ParameterMetadata> {
        let parameters = self
            .snapshot
            .routine(routine)
            .map(|r| r.parameters.clone())
            .unwrap_or_default();
        debug!("Snapshot: {} parameters for {}", parameters.len(), routine);
        MetadataResult::ok(parameters)
    }
}

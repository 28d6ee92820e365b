//! The metadata provider seam

use async_trait::async_trait;

use super::model::{ColumnMetadata, MetadataResult, ParameterMetadata};

/// Source of schema metadata for generation.
///
/// Implementations never return errors: an access failure is logged and reported
/// as [`FetchOutcome::Failed`](super::FetchOutcome::Failed) with no rows.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// List the table names of a database, ordered by name.
    async fn list_tables(&self, database: &str) -> MetadataResult<String>;

    /// List a table's columns in ordinal order.
    async fn list_columns(&self, table: &str) -> MetadataResult<ColumnMetadata>;

    /// List a stored routine's parameters in ordinal order.
    async fn list_parameters(&self, routine: &str) -> MetadataResult<ParameterMetadata>;
}

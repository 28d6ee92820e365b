//! Error types for crudgen

use thiserror::Error;

/// Result type alias for crudgen operations
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors that can occur during code generation
///
/// Metadata access failures are deliberately absent: providers degrade them to
/// an empty [`MetadataResult`](crate::metadata::MetadataResult) instead.
#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid schema snapshot: {0}")]
    SnapshotError(String),

    #[cfg(feature = "mysql")]
    #[error("MySQL error: {0}")]
    MySql(#[from] mysql_async::Error),
}

impl From<config::ConfigError> for CodegenError {
    fn from(err: config::ConfigError) -> Self {
        CodegenError::ConfigError(err.to_string())
    }
}

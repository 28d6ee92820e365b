//! Live metadata provider reading MySQL `INFORMATION_SCHEMA`

use async_trait::async_trait;
use mysql_async::prelude::*;
use mysql_async::{Conn, OptsBuilder};
use tracing::{debug, warn};

use super::model::{ColumnMetadata, MetadataResult, ParameterDirection, ParameterMetadata};
use super::provider::MetadataProvider;
use crate::config::ConnectionSettings;
use crate::error::Result;

const TABLES_QUERY: &str = "SELECT TABLE_NAME \
     FROM INFORMATION_SCHEMA.TABLES \
     WHERE TABLE_SCHEMA = ? AND TABLE_TYPE = 'BASE TABLE' \
     ORDER BY TABLE_NAME";

const COLUMNS_QUERY: &str = "SELECT COLUMN_NAME, DATA_TYPE, IS_NULLABLE \
     FROM INFORMATION_SCHEMA.COLUMNS \
     WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ? \
     ORDER BY ORDINAL_POSITION";

const PARAMETERS_QUERY: &str = "SELECT PARAMETER_NAME, DATA_TYPE, PARAMETER_MODE \
     FROM INFORMATION_SCHEMA.PARAMETERS \
     WHERE SPECIFIC_SCHEMA = ? AND SPECIFIC_NAME = ? AND ORDINAL_POSITION > 0 \
     ORDER BY ORDINAL_POSITION";

/// Metadata provider for a MySQL database.
///
/// Every listing opens its own connection and disconnects before returning;
/// no connection outlives a single query.
pub struct MySqlMetadataProvider {
    settings: ConnectionSettings,
    database: String,
}

impl MySqlMetadataProvider {
    pub fn new(settings: ConnectionSettings, database: impl Into<String>) -> Self {
        Self {
            settings,
            database: database.into(),
        }
    }

    fn opts(&self, database: &str) -> OptsBuilder {
        let password = if self.settings.password.is_empty() {
            None
        } else {
            Some(self.settings.password.clone())
        };
        OptsBuilder::default()
            .ip_or_hostname(self.settings.host.clone())
            .tcp_port(self.settings.port)
            .user(Some(self.settings.user.clone()))
            .pass(password)
            .db_name(Some(database.to_string()))
    }

    async fn fetch_tables(&self, database: &str) -> Result<Vec<String>> {
        let mut conn = Conn::new(self.opts(database)).await?;
        let rows: Vec<(String,)> = conn.exec(TABLES_QUERY, (database,)).await?;
        conn.disconnect().await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    async fn fetch_columns(&self, table: &str) -> Result<Vec<ColumnMetadata>> {
        let mut conn = Conn::new(self.opts(&self.database)).await?;
        let rows: Vec<(String, String, String)> = conn
            .exec(COLUMNS_QUERY, (self.database.as_str(), table))
            .await?;
        conn.disconnect().await?;

        Ok(rows
            .into_iter()
            .map(|(name, data_type, is_nullable)| {
                ColumnMetadata::new(name, data_type, is_nullable.eq_ignore_ascii_case("YES"))
            })
            .collect())
    }

    async fn fetch_parameters(&self, routine: &str) -> Result<Vec<ParameterMetadata>> {
        let mut conn = Conn::new(self.opts(&self.database)).await?;
        let rows: Vec<(Option<String>, String, Option<String>)> = conn
            .exec(PARAMETERS_QUERY, (self.database.as_str(), routine))
            .await?;
        conn.disconnect().await?;

        let mut parameters = Vec::with_capacity(rows.len());
        for (name, data_type, mode) in rows {
            let Some(name) = name else { continue };
            let direction = match mode.as_deref().map(str::parse::<ParameterDirection>) {
                Some(Ok(direction)) => direction,
                other => {
                    warn!(
                        "Parameter {} of {} has unrecognized mode {:?}, treating as IN",
                        name, routine, other
                    );
                    ParameterDirection::In
                }
            };
            parameters.push(ParameterMetadata::new(name, data_type, direction));
        }
        Ok(parameters)
    }
}

#[async_trait]
impl MetadataProvider for MySqlMetadataProvider {
    async fn list_tables(&self, database: &str) -> MetadataResult<String> {
        debug!("Listing tables of {}", database);
        MetadataResult::from_fetch(
            &format!("tables of {}", database),
            self.fetch_tables(database).await,
        )
    }

    async fn list_columns(&self, table: &str) -> MetadataResult<ColumnMetadata> {
        debug!("Listing columns of {}", table);
        MetadataResult::from_fetch(
            &format!("columns of {}", table),
            self.fetch_columns(table).await,
        )
    }

    async fn list_parameters(&self, routine: &str) -> MetadataResult<ParameterMetadata> {
        debug!("Listing parameters of {}", routine);
        MetadataResult::from_fetch(
            &format!("parameters of {}", routine),
            self.fetch_parameters(routine).await,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_server_degrades_to_empty() {
        let settings = ConnectionSettings {
            host: "127.0.0.1".to_string(),
            // Port 1 is reserved and never hosts MySQL
            port: 1,
            user: "root".to_string(),
            password: String::new(),
        };
        let provider = MySqlMetadataProvider::new(settings, "Shop");

        let tables = provider.list_tables("Shop").await;
        assert!(tables.is_failed());
        assert!(tables.is_empty());

        let params = provider.list_parameters("SP_AddNewProduct").await;
        assert!(params.is_failed());
    }
}

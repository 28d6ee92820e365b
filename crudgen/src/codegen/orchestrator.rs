//! Generation driver - walks the tables of a database and writes both classes
//! of every table through a [`FileSystemSink`]

use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::metadata::MetadataProvider;
use crate::sink::FileSystemSink;

use super::business_layer::BusinessLayerSynthesizer;
use super::data_layer::DataLayerSynthesizer;
use super::naming::EntityDescriptor;

/// Destination paths of the generated files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub root: PathBuf,
    pub project: String,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>, project: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            project: project.into(),
        }
    }

    /// `root/{P}/{P}_Data`
    pub fn data_dir(&self) -> PathBuf {
        self.root
            .join(&self.project)
            .join(format!("{}_Data", self.project))
    }

    /// `root/{P}/{P}_Business`
    pub fn business_dir(&self) -> PathBuf {
        self.root
            .join(&self.project)
            .join(format!("{}_Business", self.project))
    }

    pub fn data_file(&self, entity: &EntityDescriptor) -> PathBuf {
        self.data_dir()
            .join(format!("{}.cs", entity.data_class_name()))
    }

    pub fn business_file(&self, entity: &EntityDescriptor) -> PathBuf {
        self.business_dir()
            .join(format!("{}.cs", entity.business_class_name()))
    }
}

/// Include/exclude filter over table names
#[derive(Debug, Clone, Default)]
pub struct TableFilter {
    include_all: bool,
    include: HashSet<String>,
    exclude: HashSet<String>,
}

impl TableFilter {
    /// Build from comma-separated lists; `*` or an empty include list means all
    pub fn new(include: &str, exclude: &str) -> Self {
        let include_all = include.trim() == "*" || include.trim().is_empty();
        let include = if include_all {
            HashSet::new()
        } else {
            split_names(include)
        };
        Self {
            include_all,
            include,
            exclude: split_names(exclude),
        }
    }

    /// Filter accepting every table
    pub fn all() -> Self {
        Self::new("*", "")
    }

    pub fn matches(&self, table: &str) -> bool {
        let included = self.include_all || self.include.contains(table);
        included && !self.exclude.contains(table)
    }
}

fn split_names(list: &str) -> HashSet<String> {
    list.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Files written for one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedTable {
    pub table_name: String,
    pub entity_name: String,
    pub data_file: PathBuf,
    pub business_file: PathBuf,
    /// Metadata fetches that failed and were treated as empty
    pub failed_fetches: Vec<String>,
}

/// Summary of a generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub database: String,
    pub tables: Vec<GeneratedTable>,
    /// Whether listing the database's tables failed
    pub table_listing_failed: bool,
}

impl GenerationReport {
    pub fn tables_processed(&self) -> usize {
        self.tables.len()
    }

    /// The listing succeeded but returned nothing to generate
    pub fn found_no_tables(&self) -> bool {
        self.tables.is_empty() && !self.table_listing_failed
    }

    /// All failed fetches across the run
    pub fn failed_fetches(&self) -> Vec<&str> {
        self.tables
            .iter()
            .flat_map(|t| t.failed_fetches.iter().map(String::as_str))
            .collect()
    }
}

/// Drives generation for every table of a database, one table at a time
pub struct GenerationOrchestrator<'a> {
    provider: &'a dyn MetadataProvider,
    sink: &'a dyn FileSystemSink,
    layout: OutputLayout,
    filter: TableFilter,
}

impl<'a> GenerationOrchestrator<'a> {
    pub fn new(
        provider: &'a dyn MetadataProvider,
        sink: &'a dyn FileSystemSink,
        layout: OutputLayout,
    ) -> Self {
        Self {
            provider,
            sink,
            layout,
            filter: TableFilter::all(),
        }
    }

    pub fn with_filter(mut self, filter: TableFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Generate both classes for every table of `database`.
    ///
    /// The first sink error aborts the run; tables already written stay on disk.
    pub async fn run(&self, database: &str) -> Result<GenerationReport> {
        let listing = self.provider.list_tables(database).await;
        info!("Found {} tables in {}", listing.len(), database);

        let mut report = GenerationReport {
            database: database.to_string(),
            tables: Vec::new(),
            table_listing_failed: listing.is_failed(),
        };

        for table in listing.iter() {
            if !self.filter.matches(table) {
                debug!("Skipping excluded table {}", table);
                continue;
            }
            report.tables.push(self.generate_table(table).await?);
        }

        info!(
            "Generated {} of {} tables",
            report.tables_processed(),
            listing.len()
        );
        Ok(report)
    }

    /// Write the data and business classes of one table
    pub async fn generate_table(&self, table_name: &str) -> Result<GeneratedTable> {
        let entity = EntityDescriptor::new(table_name, &self.layout.project);
        if entity.entity_name.is_empty() {
            warn!("Table name {:?} yields an empty entity name", table_name);
        }
        info!("Generating {} -> {}", table_name, entity.entity_name);

        let data_dir = self.layout.data_dir();
        let business_dir = self.layout.business_dir();
        let data_file = self.layout.data_file(&entity);
        let business_file = self.layout.business_file(&entity);

        self.sink.ensure_directory(&data_dir)?;
        self.sink.ensure_directory(&business_dir)?;
        self.sink.ensure_file_exists(&data_file)?;
        self.sink.ensure_file_exists(&business_file)?;

        let data_class = DataLayerSynthesizer::new(self.provider, &entity)
            .assemble()
            .await;
        self.sink.append_text(&data_file, &data_class.render())?;
        debug!("Wrote {}", data_file.display());

        let business_class = BusinessLayerSynthesizer::load(self.provider, &entity)
            .await
            .assemble()
            .await;
        self.sink
            .append_text(&business_file, &business_class.render())?;
        debug!("Wrote {}", business_file.display());

        let mut failed_fetches = data_class.failed_fetches;
        failed_fetches.extend(business_class.failed_fetches);
        if !failed_fetches.is_empty() {
            warn!(
                "{} generated with missing metadata: {}",
                table_name,
                failed_fetches.join(", ")
            );
        }

        Ok(GeneratedTable {
            table_name: table_name.to_string(),
            entity_name: entity.entity_name,
            data_file,
            business_file,
            failed_fetches,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{SchemaSnapshot, SnapshotProvider, TableMetadata};
    use crate::sink::MemorySink;
    use std::path::Path;

    fn snapshot(tables: &[&str]) -> SnapshotProvider {
        SnapshotProvider::new(SchemaSnapshot {
            database: Some("Shop".to_string()),
            tables: tables
                .iter()
                .map(|name| TableMetadata {
                    name: name.to_string(),
                    columns: Vec::new(),
                })
                .collect(),
            routines: Vec::new(),
        })
    }

    #[test]
    fn test_output_layout() {
        let layout = OutputLayout::new("/out", "Shop");
        let entity = EntityDescriptor::new("Products", "Shop");
        assert_eq!(layout.data_dir(), Path::new("/out/Shop/Shop_Data"));
        assert_eq!(layout.business_dir(), Path::new("/out/Shop/Shop_Business"));
        assert_eq!(
            layout.data_file(&entity),
            Path::new("/out/Shop/Shop_Data/clsProductData.cs")
        );
        assert_eq!(
            layout.business_file(&entity),
            Path::new("/out/Shop/Shop_Business/clsProduct.cs")
        );
    }

    #[test]
    fn test_table_filter() {
        let filter = TableFilter::new("*", "sysdiagrams");
        assert!(filter.matches("Products"));
        assert!(!filter.matches("sysdiagrams"));

        let filter = TableFilter::new("Products, Orders", "Orders");
        assert!(filter.matches("Products"));
        assert!(!filter.matches("Orders"));
        assert!(!filter.matches("Customers"));

        assert!(TableFilter::new("", "").matches("anything"));
    }

    #[tokio::test]
    async fn test_run_writes_both_files_per_table() {
        let provider = snapshot(&["Products", "Orders"]);
        let sink = MemorySink::new();
        let orchestrator =
            GenerationOrchestrator::new(&provider, &sink, OutputLayout::new("out", "Shop"));

        let report = orchestrator.run("Shop").await.unwrap();
        assert_eq!(report.tables_processed(), 2);
        // list_tables is sorted by name
        assert_eq!(report.tables[0].entity_name, "Order");
        assert_eq!(report.tables[1].entity_name, "Product");
        assert_eq!(sink.files().len(), 4);
        assert_eq!(sink.append_count(), 4);
        assert_eq!(sink.directories().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_database_writes_nothing() {
        let provider = snapshot(&[]);
        let sink = MemorySink::new();
        let orchestrator =
            GenerationOrchestrator::new(&provider, &sink, OutputLayout::new("out", "Shop"));

        let report = orchestrator.run("Shop").await.unwrap();
        assert_eq!(report.tables_processed(), 0);
        assert!(!report.table_listing_failed);
        assert!(report.found_no_tables());
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_failed_listing_is_reported() {
        let provider = snapshot(&["Products"]);
        let sink = MemorySink::new();
        let orchestrator =
            GenerationOrchestrator::new(&provider, &sink, OutputLayout::new("out", "Shop"));

        let report = orchestrator.run("Warehouse").await.unwrap();
        assert!(report.table_listing_failed);
        assert_eq!(report.tables_processed(), 0);
        assert!(!report.found_no_tables());
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_filter_skips_tables() {
        let provider = snapshot(&["Products", "sysdiagrams"]);
        let sink = MemorySink::new();
        let orchestrator =
            GenerationOrchestrator::new(&provider, &sink, OutputLayout::new("out", "Shop"))
                .with_filter(TableFilter::new("*", "sysdiagrams"));

        let report = orchestrator.run("Shop").await.unwrap();
        assert_eq!(report.tables_processed(), 1);
        assert_eq!(report.tables[0].table_name, "Products");
    }
}

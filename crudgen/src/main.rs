//! CLI entry point for crudgen

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crudgen::codegen::{EntityDescriptor, OutputLayout, RoutineKind, TableFilter};
use crudgen::config::CodegenConfig;
use crudgen::metadata::{ColumnMetadata, MetadataProvider, RoutineMetadata};

#[derive(Parser)]
#[command(name = "crudgen")]
#[command(about = "Generate C# data-access and business CRUD classes from a database schema")]
#[command(version)]
struct Cli {
    /// Path to configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Project name (overrides config)
    #[arg(short, long)]
    project: Option<String>,

    /// Database name (overrides config)
    #[arg(short, long)]
    database: Option<String>,

    /// Read metadata from a TOML schema snapshot instead of a live database
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Root directory of the generated project (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Database host
    #[arg(long)]
    host: Option<String>,

    /// Database port
    #[arg(long)]
    port: Option<u16>,

    /// Database user
    #[arg(short, long)]
    user: Option<String>,

    /// Database password
    #[arg(long)]
    password: Option<String>,

    /// Dry run - show what would be generated without writing files
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate both classes for every table
    Generate,
    /// Inspect schema (show tables, columns and routine parameters)
    Inspect {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct InspectedTable {
    name: String,
    entity_name: String,
    columns: Vec<ColumnMetadata>,
    routines: Vec<RoutineMetadata>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (before logging, so we can use config.log_level)
    let mut config = CodegenConfig::load(cli.config.as_deref())?;

    // Initialize logging
    // Priority: RUST_LOG env var > config.log_level > default (debug for dev, info for release)
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    let log_level = config.log_level.as_deref().unwrap_or(default_level);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    // Apply CLI overrides
    if let Some(project) = cli.project {
        config.project_name = project;
    }
    if let Some(database) = cli.database {
        config.database_name = database;
    }
    if let Some(snapshot) = cli.snapshot {
        config.snapshot_file = Some(snapshot);
    }
    if let Some(output) = cli.output {
        config.output_root = output;
    }
    if let Some(host) = cli.host {
        config.connection.host = host;
    }
    if let Some(port) = cli.port {
        config.connection.port = port;
    }
    if let Some(user) = cli.user {
        config.connection.user = user;
    }
    if let Some(password) = cli.password {
        config.connection.password = password;
    }
    if cli.dry_run {
        config.dry_run = true;
    }

    // Validate configuration
    config.validate()?;

    if let Some(Commands::Inspect { json }) = cli.command {
        return inspect_schema(&config, json).await;
    }

    info!(
        "Generating code for project {} from database {}",
        config.project_name, config.database_name
    );

    let report = crudgen::generate_from_config(&config).await?;

    if config.dry_run {
        println!("Dry run mode - would generate:");
    }
    for table in &report.tables {
        println!("  Data:     {}", table.data_file.display());
        println!("  Business: {}", table.business_file.display());
    }
    if report.table_listing_failed {
        eprintln!("warning: could not list tables of {}", report.database);
    } else if report.found_no_tables() {
        eprintln!("warning: no tables found in database {}", report.database);
    }
    let failed = report.failed_fetches();
    if !failed.is_empty() {
        eprintln!(
            "warning: metadata missing for {} (generated as empty)",
            failed.join(", ")
        );
    }

    info!(
        "Code generation completed successfully ({} tables)",
        report.tables_processed()
    );
    Ok(())
}

async fn inspect_schema(config: &CodegenConfig, json: bool) -> Result<()> {
    let provider = crudgen::provider_from_config(config)?;
    let tables = collect_tables(provider.as_ref(), config).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&tables)?);
        return Ok(());
    }

    let layout = OutputLayout::new(&config.output_root, &config.project_name);
    println!("Found {} tables:\n", tables.len());
    for table in &tables {
        let entity = EntityDescriptor::new(&table.name, &config.project_name);
        println!("Table: {} (entity {})", table.name, table.entity_name);
        println!("  Columns:");
        for col in &table.columns {
            let nullable = if col.nullable { "NULL" } else { "NOT NULL" };
            println!("    - {} {} {}", col.name, col.data_type, nullable);
        }
        println!("  Routines:");
        for routine in &table.routines {
            let params: Vec<String> = routine
                .parameters
                .iter()
                .map(|p| format!("{} {} {}", p.direction, p.name, p.data_type))
                .collect();
            println!("    - {}({})", routine.name, params.join(", "));
        }
        println!("  Files:");
        println!("    - {}", layout.data_file(&entity).display());
        println!("    - {}", layout.business_file(&entity).display());
        println!();
    }

    Ok(())
}

async fn collect_tables(
    provider: &dyn MetadataProvider,
    config: &CodegenConfig,
) -> Vec<InspectedTable> {
    let filter = TableFilter::new(&config.include_tables, &config.exclude_tables);
    let listing = provider.list_tables(&config.database_name).await;

    let mut tables = Vec::new();
    for name in listing.iter().filter(|name| filter.matches(name)) {
        let entity = EntityDescriptor::new(name, &config.project_name);
        let columns = provider.list_columns(name).await.rows;

        let mut routines = Vec::new();
        for kind in [
            RoutineKind::GetAll,
            RoutineKind::AddNew,
            RoutineKind::Update,
            RoutineKind::Delete,
        ] {
            let routine = entity.routine_name(kind);
            let parameters = provider.list_parameters(&routine).await.rows;
            routines.push(RoutineMetadata {
                name: routine,
                parameters,
            });
        }

        tables.push(InspectedTable {
            name: name.clone(),
            entity_name: entity.entity_name,
            columns,
            routines,
        });
    }
    tables
}

//! Live MySQL tests for the `INFORMATION_SCHEMA` metadata provider
//!
//! Each test starts its own MySQL testcontainer, creates a `Products` table with
//! its four stored procedures and generates against it. They need Docker, so
//! they are ignored by default:
//!
//! ```bash
//! cargo test -p crudgen-tests -- --ignored
//! ```

use crudgen::codegen::{GenerationOrchestrator, OutputLayout};
use crudgen::config::ConnectionSettings;
use crudgen::metadata::{FetchOutcome, MetadataProvider, MySqlMetadataProvider, ParameterDirection};
use crudgen::sink::MemorySink;
use mysql_async::prelude::*;
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::mysql::Mysql;

const DATABASE: &str = "test";

const SCHEMA: &[&str] = &[
    "CREATE TABLE Products (
        ProductID INT AUTO_INCREMENT PRIMARY KEY,
        Name VARCHAR(100) NOT NULL,
        Price DECIMAL(10, 2) NOT NULL,
        Notes TEXT NULL
    )",
    "CREATE PROCEDURE SP_GetAllProducts()
     BEGIN
        SELECT * FROM Products;
     END",
    "CREATE PROCEDURE SP_AddNewProduct(IN Name VARCHAR(100), IN Price DECIMAL(10, 2), OUT ProductID INT)
     BEGIN
        INSERT INTO Products (Name, Price) VALUES (Name, Price);
        SET ProductID = LAST_INSERT_ID();
     END",
    "CREATE PROCEDURE SP_UpdateProduct(IN ProductID INT, IN Name VARCHAR(100), IN Price DECIMAL(10, 2))
     BEGIN
        UPDATE Products p SET p.Name = Name, p.Price = Price WHERE p.ProductID = ProductID;
     END",
    "CREATE PROCEDURE SP_DeleteProduct(IN ProductID INT)
     BEGIN
        DELETE FROM Products WHERE Products.ProductID = ProductID;
        SELECT ROW_COUNT();
     END",
];

/// Start MySQL, load the schema and return the container with its settings
async fn start_mysql() -> anyhow::Result<(ContainerAsync<Mysql>, ConnectionSettings)> {
    let container = Mysql::default().start().await?;
    let port = container.get_host_port_ipv4(3306).await?;
    let settings = ConnectionSettings {
        host: "127.0.0.1".to_string(),
        port,
        user: "root".to_string(),
        password: String::new(),
    };

    let url = format!("mysql://root@127.0.0.1:{}/{}", port, DATABASE);
    let mut conn = mysql_async::Conn::new(mysql_async::Opts::from_url(&url)?).await?;
    for stmt in SCHEMA {
        conn.query_drop(*stmt).await?;
    }
    conn.disconnect().await?;

    Ok((container, settings))
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_list_tables_and_columns() -> anyhow::Result<()> {
    let (_container, settings) = start_mysql().await?;
    let provider = MySqlMetadataProvider::new(settings, DATABASE);

    let tables = provider.list_tables(DATABASE).await;
    assert_eq!(tables.outcome, FetchOutcome::Ok);
    assert_eq!(tables.rows, vec!["Products".to_string()]);

    let columns = provider.list_columns("Products").await;
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["ProductID", "Name", "Price", "Notes"]);
    assert_eq!(columns.rows[2].data_type, "decimal");
    assert!(!columns.rows[1].nullable);
    assert!(columns.rows[3].nullable);
    Ok(())
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_list_parameters() -> anyhow::Result<()> {
    let (_container, settings) = start_mysql().await?;
    let provider = MySqlMetadataProvider::new(settings, DATABASE);

    let params = provider.list_parameters("SP_AddNewProduct").await;
    assert_eq!(params.outcome, FetchOutcome::Ok);
    assert_eq!(params.len(), 3);
    assert_eq!(params.rows[0].name, "Name");
    assert_eq!(params.rows[0].direction, ParameterDirection::In);
    assert_eq!(params.rows[2].name, "ProductID");
    assert_eq!(params.rows[2].direction, ParameterDirection::Out);

    let none = provider.list_parameters("SP_GetAllProducts").await;
    assert_eq!(none.outcome, FetchOutcome::Ok);
    assert!(none.is_empty());
    Ok(())
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_generate_from_live_database() -> anyhow::Result<()> {
    let (_container, settings) = start_mysql().await?;
    let provider = MySqlMetadataProvider::new(settings, DATABASE);
    let sink = MemorySink::new();
    let orchestrator =
        GenerationOrchestrator::new(&provider, &sink, OutputLayout::new("out", "Shop"));

    let report = orchestrator.run(DATABASE).await?;
    assert_eq!(report.tables_processed(), 1);
    assert!(report.failed_fetches().is_empty());

    let table = &report.tables[0];
    let data = sink.contents(&table.data_file).unwrap_or_default();
    assert!(data.contains("public static int AddNewProduct(string Name, decimal Price)"));
    assert!(data.contains("public static bool DeleteProduct(int ProductID)"));

    let business = sink.contents(&table.business_file).unwrap_or_default();
    assert!(business.contains("public string? Notes { get; set; }"));
    assert!(business.contains("this.Notes = null;"));
    Ok(())
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_wrong_database_degrades_to_failed() -> anyhow::Result<()> {
    let (_container, settings) = start_mysql().await?;
    let provider = MySqlMetadataProvider::new(settings, "no_such_db");

    let columns = provider.list_columns("Products").await;
    assert!(columns.is_failed());
    assert!(columns.is_empty());
    Ok(())
}

//! Default configuration values - single source of truth

/// Default include tables pattern (all tables)
pub const INCLUDE_TABLES: &str = "*";

/// Default exclude tables pattern (the SQL Server diagram table)
pub const EXCLUDE_TABLES: &str = "sysdiagrams";

/// Default root under which `{project}/{project}_Data` and
/// `{project}/{project}_Business` are created
pub const OUTPUT_ROOT: &str = ".";

/// Default database host
pub const HOST: &str = "127.0.0.1";

/// Default MySQL port
pub const PORT: u16 = 3306;

/// Whether to run in dry-run mode by default
pub const DRY_RUN: bool = false;

/// Default config file name looked up by `CodegenConfig::load`
pub const CONFIG_FILE: &str = "crudgen";

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "CRUDGEN";

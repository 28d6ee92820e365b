//! Metadata structures returned by metadata providers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use tracing::error;

/// Metadata for a database table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Table name
    pub name: String,

    /// Columns in ordinal order
    #[serde(default)]
    pub columns: Vec<ColumnMetadata>,
}

/// Metadata for a column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Column name
    pub name: String,

    /// Source data type as reported by the store (e.g., "int", "nvarchar")
    pub data_type: String,

    /// Whether the column is nullable
    #[serde(default)]
    pub nullable: bool,
}

impl ColumnMetadata {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable,
        }
    }
}

/// Direction of a stored-routine parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ParameterDirection {
    In,
    Out,
    InOut,
}

impl ParameterDirection {
    /// Whether the parameter carries a value back to the caller
    pub fn is_output(&self) -> bool {
        matches!(self, Self::Out | Self::InOut)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Out => "OUT",
            Self::InOut => "INOUT",
        }
    }
}

impl fmt::Display for ParameterDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();
        match normalized.as_str() {
            "IN" => Ok(Self::In),
            "OUT" | "OUTPUT" => Ok(Self::Out),
            "INOUT" => Ok(Self::InOut),
            _ => Err(format!("unknown parameter direction: {}", s)),
        }
    }
}

impl TryFrom<String> for ParameterDirection {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ParameterDirection> for String {
    fn from(direction: ParameterDirection) -> Self {
        direction.as_str().to_string()
    }
}

/// Metadata for a stored-routine parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterMetadata {
    /// Parameter name without its leading `@` sigil
    #[serde(deserialize_with = "deserialize_parameter_name")]
    pub name: String,

    /// Source data type
    pub data_type: String,

    pub direction: ParameterDirection,
}

impl ParameterMetadata {
    pub fn new(
        name: impl AsRef<str>,
        data_type: impl Into<String>,
        direction: ParameterDirection,
    ) -> Self {
        Self {
            name: strip_sigil(name.as_ref()).to_string(),
            data_type: data_type.into(),
            direction,
        }
    }
}

fn strip_sigil(name: &str) -> &str {
    name.strip_prefix('@').unwrap_or(name)
}

fn deserialize_parameter_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(strip_sigil(&raw).to_string())
}

/// Outcome of a single metadata fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Ok,
    Failed(String),
}

/// Rows returned by a metadata fetch together with how the fetch went.
///
/// A failed fetch always carries no rows, so generation treats it exactly like
/// an empty listing while the failure stays observable.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataResult<T> {
    pub rows: Vec<T>,
    pub outcome: FetchOutcome,
}

impl<T> MetadataResult<T> {
    pub fn ok(rows: Vec<T>) -> Self {
        Self {
            rows,
            outcome: FetchOutcome::Ok,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            rows: Vec::new(),
            outcome: FetchOutcome::Failed(reason.into()),
        }
    }

    /// Convert a fallible fetch, logging and degrading errors to an empty result
    pub fn from_fetch<E: fmt::Display>(what: &str, result: Result<Vec<T>, E>) -> Self {
        match result {
            Ok(rows) => Self::ok(rows),
            Err(err) => {
                error!("Failed to fetch {}: {}", what, err);
                Self::failed(err.to_string())
            }
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, FetchOutcome::Failed(_))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rows.iter()
    }
}

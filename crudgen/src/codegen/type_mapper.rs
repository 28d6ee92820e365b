//! SQL to C# type mapping

use crate::metadata::ColumnMetadata;

/// Represents a C# type for code generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetType {
    Int,
    Long,
    Short,
    Byte,
    Bool,
    Double,
    Float,
    Decimal,
    String,
    DateTime,
    TimeSpan,
    Guid,
    /// Fallback for source types without a mapping
    Object,
}

impl TargetType {
    /// Every target type, in declaration order
    pub const ALL: [TargetType; 13] = [
        TargetType::Int,
        TargetType::Long,
        TargetType::Short,
        TargetType::Byte,
        TargetType::Bool,
        TargetType::Double,
        TargetType::Float,
        TargetType::Decimal,
        TargetType::String,
        TargetType::DateTime,
        TargetType::TimeSpan,
        TargetType::Guid,
        TargetType::Object,
    ];

    /// Get the type name as written in generated code
    pub fn type_name(&self) -> &'static str {
        match self {
            TargetType::Int => "int",
            TargetType::Long => "long",
            TargetType::Short => "short",
            TargetType::Byte => "byte",
            TargetType::Bool => "bool",
            TargetType::Double => "double",
            TargetType::Float => "float",
            TargetType::Decimal => "decimal",
            TargetType::String => "string",
            TargetType::DateTime => "DateTime",
            TargetType::TimeSpan => "TimeSpan",
            TargetType::Guid => "Guid",
            TargetType::Object => "object",
        }
    }

    /// Get the literal a freshly constructed entity assigns to a property of this type
    pub fn default_literal(&self) -> &'static str {
        match self {
            TargetType::Int | TargetType::Short | TargetType::Byte => "0",
            TargetType::Long => "0L",
            TargetType::Bool => "false",
            TargetType::Double => "0.0",
            TargetType::Float => "0.0f",
            TargetType::Decimal => "0.0m",
            TargetType::String => "\"\"",
            TargetType::DateTime => "DateTime.MinValue",
            TargetType::TimeSpan => "TimeSpan.Zero",
            TargetType::Guid => "Guid.Empty",
            TargetType::Object => "null",
        }
    }

    /// Look a target type up by its generated name
    pub fn from_type_name(name: &str) -> Option<TargetType> {
        Self::ALL.into_iter().find(|t| t.type_name() == name)
    }
}

/// Maps source column/parameter types to C# types.
///
/// The table is fixed and total: unknown source types become `object`, so a
/// surprising column never aborts generation.
pub struct TypeMapper;

impl TypeMapper {
    /// Map a source type name (e.g., "nvarchar", "VARCHAR(255)") to a target type
    pub fn map_type(source_type: &str) -> TargetType {
        let normalized = Self::normalize(source_type);

        match normalized.as_str() {
            "int" | "mediumint" => TargetType::Int,
            "bigint" => TargetType::Long,
            "smallint" => TargetType::Short,
            "tinyint" => TargetType::Byte,
            "bit" | "bool" | "boolean" => TargetType::Bool,
            "float" | "double" => TargetType::Double,
            "real" => TargetType::Float,
            "decimal" | "numeric" | "money" | "smallmoney" => TargetType::Decimal,
            "char" | "varchar" | "text" | "nchar" | "nvarchar" | "ntext" | "tinytext"
            | "mediumtext" | "longtext" => TargetType::String,
            "date" | "datetime" | "datetime2" | "smalldatetime" | "timestamp" => {
                TargetType::DateTime
            }
            "time" => TargetType::TimeSpan,
            "uniqueidentifier" => TargetType::Guid,
            _ => TargetType::Object,
        }
    }

    /// Default literal for a target type name; `null` for names outside the table
    pub fn default_literal(target_type: &str) -> &'static str {
        TargetType::from_type_name(target_type)
            .unwrap_or(TargetType::Object)
            .default_literal()
    }

    /// Property/parameter type of a column, `?`-qualified when nullable
    pub fn column_type(column: &ColumnMetadata) -> String {
        let base = Self::map_type(&column.data_type).type_name();
        if column.nullable {
            format!("{}?", base)
        } else {
            base.to_string()
        }
    }

    /// Initializer the public constructor assigns to a column's property
    pub fn column_initializer(column: &ColumnMetadata) -> &'static str {
        if column.nullable {
            "null"
        } else {
            Self::map_type(&column.data_type).default_literal()
        }
    }

    /// Lowercase, trimmed, without a `(length)` suffix
    fn normalize(source_type: &str) -> String {
        let trimmed = source_type.trim();
        let base = match trimmed.find('(') {
            Some(idx) => &trimmed[..idx],
            None => trimmed,
        };
        base.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_types() {
        assert_eq!(TypeMapper::map_type("int"), TargetType::Int);
        assert_eq!(TypeMapper::map_type("bigint"), TargetType::Long);
        assert_eq!(TypeMapper::map_type("smallint"), TargetType::Short);
        assert_eq!(TypeMapper::map_type("tinyint"), TargetType::Byte);
    }

    #[test]
    fn test_decimal_and_float_types() {
        assert_eq!(TypeMapper::map_type("decimal"), TargetType::Decimal);
        assert_eq!(TypeMapper::map_type("money"), TargetType::Decimal);
        assert_eq!(TypeMapper::map_type("float"), TargetType::Double);
        assert_eq!(TypeMapper::map_type("real"), TargetType::Float);
    }

    #[test]
    fn test_string_and_temporal_types() {
        assert_eq!(TypeMapper::map_type("nvarchar"), TargetType::String);
        assert_eq!(TypeMapper::map_type("VARCHAR(255)"), TargetType::String);
        assert_eq!(TypeMapper::map_type("datetime2"), TargetType::DateTime);
        assert_eq!(TypeMapper::map_type("time"), TargetType::TimeSpan);
        assert_eq!(TypeMapper::map_type("uniqueidentifier"), TargetType::Guid);
    }

    #[test]
    fn test_unknown_type_falls_back_to_object() {
        assert_eq!(TypeMapper::map_type("geography"), TargetType::Object);
        assert_eq!(TypeMapper::map_type(""), TargetType::Object);
        assert_eq!(TypeMapper::default_literal("object"), "null");
        assert_eq!(TypeMapper::default_literal("Widget"), "null");
    }

    #[test]
    fn test_default_literals() {
        assert_eq!(TypeMapper::default_literal("int"), "0");
        assert_eq!(TypeMapper::default_literal("long"), "0L");
        assert_eq!(TypeMapper::default_literal("decimal"), "0.0m");
        assert_eq!(TypeMapper::default_literal("string"), "\"\"");
        assert_eq!(TypeMapper::default_literal("DateTime"), "DateTime.MinValue");
        assert_eq!(TypeMapper::default_literal("Guid"), "Guid.Empty");
    }

    #[test]
    fn test_mapping_is_total_and_deterministic() {
        let sources = [
            "int", "bigint", "smallint", "tinyint", "bit", "float", "real", "decimal",
            "numeric", "money", "smallmoney", "char", "varchar", "text", "nchar", "nvarchar",
            "ntext", "date", "datetime", "datetime2", "smalldatetime", "time",
            "uniqueidentifier", "xml",
        ];
        for source in sources {
            let first = TypeMapper::map_type(source);
            let literal = TypeMapper::default_literal(first.type_name());
            assert_eq!(first, TypeMapper::map_type(source));
            assert_eq!(literal, first.default_literal());
            assert!(!literal.is_empty());
        }
    }

    #[test]
    fn test_nullable_column() {
        let column = ColumnMetadata::new("Quantity", "int", true);
        assert_eq!(TypeMapper::column_type(&column), "int?");
        assert_eq!(TypeMapper::column_initializer(&column), "null");

        let column = ColumnMetadata::new("Quantity", "int", false);
        assert_eq!(TypeMapper::column_type(&column), "int");
        assert_eq!(TypeMapper::column_initializer(&column), "0");
    }
}

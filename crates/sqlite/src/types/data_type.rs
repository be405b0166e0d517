//! Model and store data types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Data types of model properties and store columns
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    // Boolean
    Bool,
    // Integer types
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    // Float types
    F32,
    F64,
    // Decimal
    Decimal,
    // String
    Text,
    // Date/Time types
    Date,
    Time,
    Timestamp,
    TimestampTz,
    Interval,
    // Special types
    Uuid,
    Bytea,
    // Model enumeration backed by an integral type
    Enum(EnumType),
    // Null handling
    Nullable(Box<DataType>),
}

impl DataType {
    pub fn base_type(&self) -> &DataType {
        match self {
            DataType::Nullable(inner) => inner.base_type(),
            _ => self,
        }
    }

    pub fn nullable(self) -> DataType {
        match self {
            DataType::Nullable(_) => self,
            other => DataType::Nullable(Box::new(other)),
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, DataType::Nullable(_))
    }

    /// Check if this type is an integer (signed or unsigned)
    pub fn is_integer(&self) -> bool {
        matches!(
            self.base_type(),
            DataType::I8
                | DataType::I16
                | DataType::I32
                | DataType::I64
                | DataType::U8
                | DataType::U16
                | DataType::U32
                | DataType::U64
        )
    }

    /// The enumeration behind this type, looking through nullability
    pub fn as_enum(&self) -> Option<&EnumType> {
        match self.base_type() {
            DataType::Enum(enum_type) => Some(enum_type),
            _ => None,
        }
    }

    /// Column type name used in SQLite `CAST` expressions
    pub fn store_type_name(&self) -> &'static str {
        match self.base_type() {
            DataType::Bool
            | DataType::I8
            | DataType::I16
            | DataType::I32
            | DataType::I64
            | DataType::U8
            | DataType::U16
            | DataType::U32
            | DataType::U64
            | DataType::Enum(_) => "INTEGER",
            DataType::F32 | DataType::F64 => "REAL",
            DataType::Bytea => "BLOB",
            DataType::Decimal
            | DataType::Text
            | DataType::Date
            | DataType::Time
            | DataType::Timestamp
            | DataType::TimestampTz
            | DataType::Interval
            | DataType::Uuid => "TEXT",
            DataType::Nullable(inner) => inner.store_type_name(),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Bool => write!(f, "BOOLEAN"),
            DataType::I8 => write!(f, "TINYINT"),
            DataType::I16 => write!(f, "SMALLINT"),
            DataType::I32 => write!(f, "INT"),
            DataType::I64 => write!(f, "BIGINT"),
            DataType::U8 => write!(f, "TINYINT UNSIGNED"),
            DataType::U16 => write!(f, "SMALLINT UNSIGNED"),
            DataType::U32 => write!(f, "INT UNSIGNED"),
            DataType::U64 => write!(f, "BIGINT UNSIGNED"),
            DataType::F32 => write!(f, "REAL"),
            DataType::F64 => write!(f, "DOUBLE PRECISION"),
            DataType::Decimal => write!(f, "DECIMAL"),
            DataType::Text => write!(f, "TEXT"),
            DataType::Date => write!(f, "DATE"),
            DataType::Time => write!(f, "TIME"),
            DataType::Timestamp => write!(f, "TIMESTAMP"),
            DataType::TimestampTz => write!(f, "TIMESTAMP WITH TIME ZONE"),
            DataType::Interval => write!(f, "INTERVAL"),
            DataType::Uuid => write!(f, "UUID"),
            DataType::Bytea => write!(f, "BYTEA"),
            DataType::Enum(enum_type) => write!(f, "ENUM {}({})", enum_type.name, enum_type.underlying),
            DataType::Nullable(inner) => write!(f, "{}?", inner),
        }
    }
}

/// A model enumeration: a named set of variants over an integral type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumType {
    pub name: String,
    pub underlying: Box<DataType>,
    pub variants: Vec<(String, i64)>,
}

impl EnumType {
    pub fn new<S: Into<String>>(name: S, underlying: DataType) -> Self {
        Self {
            name: name.into(),
            underlying: Box::new(underlying),
            variants: Vec::new(),
        }
    }

    /// Builder-style variant declaration
    pub fn variant<S: Into<String>>(mut self, name: S, value: i64) -> Self {
        self.variants.push((name.into(), value));
        self
    }

    pub fn variant_name(&self, value: i64) -> Option<&str> {
        self.variants
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(name, _)| name.as_str())
    }

    pub fn variant_value(&self, name: &str) -> Option<i64> {
        self.variants
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }
}

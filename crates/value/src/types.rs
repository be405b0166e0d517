//! Value types for Proven ORM
//!
//! Raw column values as read from the store, and the model-typed values the
//! materializer produces from them.

use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A row of values as handed over by a data reader
pub type Row = Vec<Value>;

/// Interval type for time durations
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub months: i32,
    pub days: i32,
    pub microseconds: i64,
}

/// A value of a model enumeration, identified by the enum's name and the
/// underlying integral representation of the variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumValue {
    pub type_name: String,
    pub value: i64,
}

impl EnumValue {
    pub fn new<S: Into<String>>(type_name: S, value: i64) -> Self {
        Self {
            type_name: type_name.into(),
            value,
        }
    }
}

/// Universal value type for raw and materialized column data
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    // Null sentinel
    Null,
    // Boolean
    Bool(bool),
    // Integer types
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    // Float types
    F32(f32),
    F64(f64),
    // Decimal
    Decimal(Decimal),
    // String
    Str(String),
    // Date/Time types
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<FixedOffset>),
    Interval(Interval),
    // Special types
    Uuid(Uuid),
    Bytea(Vec<u8>),
    // Model enumerations
    Enum(EnumValue),
}

impl Value {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a null value
    pub fn null() -> Self {
        Value::Null
    }

    /// Create an I64 value (SQLite's native integer width)
    pub fn integer(i: i64) -> Self {
        Value::I64(i)
    }

    /// Create a string value
    pub fn string<S: Into<String>>(s: S) -> Self {
        Value::Str(s.into())
    }

    /// Create a boolean value
    pub fn boolean(b: bool) -> Self {
        Value::Bool(b)
    }

    /// Create an enum value
    pub fn enumeration<S: Into<String>>(type_name: S, value: i64) -> Self {
        Value::Enum(EnumValue::new(type_name, value))
    }

    // ========================================================================
    // Type Checks
    // ========================================================================

    /// Check if value is the null sentinel
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Widen any integer (or enum) value to i128
    pub fn to_i128(&self) -> Result<i128> {
        match self {
            Value::I8(v) => Ok(*v as i128),
            Value::I16(v) => Ok(*v as i128),
            Value::I32(v) => Ok(*v as i128),
            Value::I64(v) => Ok(*v as i128),
            Value::U8(v) => Ok(*v as i128),
            Value::U16(v) => Ok(*v as i128),
            Value::U32(v) => Ok(*v as i128),
            Value::U64(v) => Ok(*v as i128),
            Value::Bool(b) => Ok(*b as i128),
            Value::Enum(e) => Ok(e.value as i128),
            _ => Err(Error::TypeMismatch {
                expected: "integer".into(),
                found: self.type_name().into(),
            }),
        }
    }

    /// Borrow the string payload, if any
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    // ========================================================================
    // Type Name
    // ========================================================================

    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Decimal(_) => "decimal",
            Value::Str(_) => "string",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::Timestamp(_) => "timestamp",
            Value::TimestampTz(_) => "timestamptz",
            Value::Interval(_) => "interval",
            Value::Uuid(_) => "uuid",
            Value::Bytea(_) => "bytea",
            Value::Enum(_) => "enum",
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::I32(i)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::I64(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::F64(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(ts: NaiveDateTime) -> Self {
        Value::Timestamp(ts)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({:?})", b),
            Value::I8(i) => write!(f, "I8({:?})", i),
            Value::I16(i) => write!(f, "I16({:?})", i),
            Value::I32(i) => write!(f, "I32({:?})", i),
            Value::I64(i) => write!(f, "I64({:?})", i),
            Value::U8(u) => write!(f, "U8({:?})", u),
            Value::U16(u) => write!(f, "U16({:?})", u),
            Value::U32(u) => write!(f, "U32({:?})", u),
            Value::U64(u) => write!(f, "U64({:?})", u),
            Value::F32(fl) => write!(f, "F32({:?})", fl),
            Value::F64(fl) => write!(f, "F64({:?})", fl),
            Value::Decimal(d) => write!(f, "Decimal({:?})", d),
            Value::Str(s) => write!(f, "Str({:?})", s),
            Value::Date(d) => write!(f, "Date({:?})", d),
            Value::Time(t) => write!(f, "Time({:?})", t),
            Value::Timestamp(ts) => write!(f, "Timestamp({:?})", ts),
            Value::TimestampTz(ts) => write!(f, "TimestampTz({:?})", ts),
            Value::Interval(i) => write!(f, "Interval({:?})", i),
            Value::Uuid(u) => write!(f, "Uuid({:?})", u),
            Value::Bytea(b) => write!(f, "Bytea({} bytes)", b.len()),
            Value::Enum(e) => write!(f, "Enum({}::{})", e.type_name, e.value),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::I8(i) => write!(f, "{}", i),
            Value::I16(i) => write!(f, "{}", i),
            Value::I32(i) => write!(f, "{}", i),
            Value::I64(i) => write!(f, "{}", i),
            Value::U8(u) => write!(f, "{}", u),
            Value::U16(u) => write!(f, "{}", u),
            Value::U32(u) => write!(f, "{}", u),
            Value::U64(u) => write!(f, "{}", u),
            Value::F32(fl) => write!(f, "{}", fl),
            Value::F64(fl) => write!(f, "{}", fl),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Str(s) => write!(f, "{}", s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Time(t) => write!(f, "{}", t.format("%H:%M:%S")),
            Value::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S")),
            Value::TimestampTz(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S%:z")),
            Value::Interval(_) => write!(f, "{:?}", self),
            Value::Uuid(u) => write!(f, "{}", u),
            Value::Bytea(b) => write!(f, "<{} bytes>", b.len()),
            Value::Enum(e) => write!(f, "{}", e.value),
        }
    }
}

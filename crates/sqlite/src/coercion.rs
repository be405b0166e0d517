//! Coercion of raw store values to declared types
//!
//! SQLite hands back values in its storage classes (INTEGER, REAL, TEXT,
//! BLOB). Converters and enum properties declare narrower types; the helpers
//! here bridge the two with bounds-checked conversions.

use crate::error::{Error, Result};
use crate::types::{DataType, EnumType};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use proven_orm_value::Value;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::str::FromStr;
use uuid::Uuid;

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Coerce a value to the given type. Null stays null.
pub fn coerce_value(value: Value, target: &DataType) -> Result<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }

    match target.base_type() {
        DataType::Enum(enum_type) => to_enum(value, enum_type),
        target if target.is_integer() => coerce_integer(value, target),
        DataType::Bool => match value {
            Value::Bool(b) => Ok(Value::Bool(b)),
            other => Ok(Value::Bool(other.to_i128()? != 0)),
        },
        DataType::F32 | DataType::F64 => coerce_float(value, target),
        DataType::Decimal => coerce_decimal(value),
        DataType::Text => match value {
            Value::Str(s) => Ok(Value::Str(s)),
            other => Ok(Value::Str(other.to_string())),
        },
        DataType::Date => match value {
            Value::Date(d) => Ok(Value::Date(d)),
            Value::Timestamp(ts) => Ok(Value::Date(ts.date())),
            Value::Str(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .or_else(|_| parse_timestamp(&s).map(|ts| ts.date()))
                .map(Value::Date)
                .map_err(|_| invalid("DATE", &s)),
            other => Err(mismatch(target, &other)),
        },
        DataType::Time => match value {
            Value::Time(t) => Ok(Value::Time(t)),
            Value::Str(s) => NaiveTime::parse_from_str(&s, "%H:%M:%S%.f")
                .map(Value::Time)
                .map_err(|_| invalid("TIME", &s)),
            other => Err(mismatch(target, &other)),
        },
        DataType::Timestamp => match value {
            Value::Timestamp(ts) => Ok(Value::Timestamp(ts)),
            Value::Date(d) => Ok(Value::Timestamp(d.and_time(NaiveTime::MIN))),
            Value::Str(s) => parse_timestamp(&s)
                .map(Value::Timestamp)
                .map_err(|_| invalid("TIMESTAMP", &s)),
            other => Err(mismatch(target, &other)),
        },
        DataType::TimestampTz => match value {
            Value::TimestampTz(ts) => Ok(Value::TimestampTz(ts)),
            Value::Str(s) => DateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S%.f%:z")
                .or_else(|_| DateTime::parse_from_rfc3339(&s))
                .map(Value::TimestampTz)
                .map_err(|_| invalid("TIMESTAMP WITH TIME ZONE", &s)),
            other => Err(mismatch(target, &other)),
        },
        DataType::Uuid => match value {
            Value::Uuid(u) => Ok(Value::Uuid(u)),
            Value::Str(s) => Uuid::from_str(&s)
                .map(Value::Uuid)
                .map_err(|_| invalid("UUID", &s)),
            Value::Bytea(bytes) => Uuid::from_slice(&bytes)
                .map(Value::Uuid)
                .map_err(|e| Error::InvalidValue(e.to_string())),
            other => Err(mismatch(target, &other)),
        },
        DataType::Bytea => match value {
            Value::Bytea(b) => Ok(Value::Bytea(b)),
            Value::Str(s) => Ok(Value::Bytea(s.into_bytes())),
            other => Err(mismatch(target, &other)),
        },
        DataType::Interval => match value {
            Value::Interval(i) => Ok(Value::Interval(i)),
            other => Err(mismatch(target, &other)),
        },
        target => Err(mismatch(target, &value)),
    }
}

/// Unwrap to the enum's underlying integral type, then wrap as the enum
pub fn to_enum(value: Value, enum_type: &EnumType) -> Result<Value> {
    if !enum_type.underlying.is_integer() {
        return Err(Error::TypeMismatch {
            expected: "enum with an integral underlying type".into(),
            found: enum_type.underlying.to_string(),
        });
    }

    let numeric = match value {
        Value::Enum(e) if e.type_name == enum_type.name => return Ok(Value::Enum(e)),
        other => coerce_integer(other, &enum_type.underlying)?,
    };
    let discriminant = i64::try_from(numeric.to_i128()?).map_err(|_| Error::TypeMismatch {
        expected: enum_type.name.clone(),
        found: format!("value {}", numeric),
    })?;
    Ok(Value::enumeration(enum_type.name.clone(), discriminant))
}

/// Coerce to a signed or unsigned integer type with bounds checking
fn coerce_integer(value: Value, target: &DataType) -> Result<Value> {
    // Whole-number REALs are accepted, SQLite may return them for INTEGER columns.
    let wide = match &value {
        Value::F32(f) if f.fract() == 0.0 => *f as i128,
        Value::F64(f) if f.fract() == 0.0 => *f as i128,
        Value::Decimal(d) if d.fract().is_zero() => d
            .to_i128()
            .ok_or_else(|| Error::InvalidValue(format!("decimal {} out of range", d)))?,
        Value::Str(s) => s.trim().parse::<i128>().map_err(|_| invalid("integer", s))?,
        other => other.to_i128()?,
    };

    let out_of_range = || Error::TypeMismatch {
        expected: target.to_string(),
        found: format!("value {}", wide),
    };
    match target.base_type() {
        DataType::I8 => i8::try_from(wide).map(Value::I8).map_err(|_| out_of_range()),
        DataType::I16 => i16::try_from(wide).map(Value::I16).map_err(|_| out_of_range()),
        DataType::I32 => i32::try_from(wide).map(Value::I32).map_err(|_| out_of_range()),
        DataType::I64 => i64::try_from(wide).map(Value::I64).map_err(|_| out_of_range()),
        DataType::U8 => u8::try_from(wide).map(Value::U8).map_err(|_| out_of_range()),
        DataType::U16 => u16::try_from(wide).map(Value::U16).map_err(|_| out_of_range()),
        DataType::U32 => u32::try_from(wide).map(Value::U32).map_err(|_| out_of_range()),
        DataType::U64 => u64::try_from(wide).map(Value::U64).map_err(|_| out_of_range()),
        other => Err(Error::TypeMismatch {
            expected: "integer type".into(),
            found: other.to_string(),
        }),
    }
}

fn coerce_float(value: Value, target: &DataType) -> Result<Value> {
    let f = match &value {
        Value::F32(f) => *f as f64,
        Value::F64(f) => *f,
        Value::Decimal(d) => d
            .to_f64()
            .ok_or_else(|| Error::InvalidValue(format!("decimal {} out of range", d)))?,
        Value::Str(s) => s.trim().parse::<f64>().map_err(|_| invalid("float", s))?,
        other => other.to_i128()? as f64,
    };
    Ok(match target.base_type() {
        DataType::F32 => Value::F32(f as f32),
        _ => Value::F64(f),
    })
}

fn coerce_decimal(value: Value) -> Result<Value> {
    match value {
        Value::Decimal(d) => Ok(Value::Decimal(d)),
        Value::F32(f) => Decimal::try_from(f as f64)
            .map(Value::Decimal)
            .map_err(|e| Error::InvalidValue(e.to_string())),
        Value::F64(f) => Decimal::try_from(f)
            .map(Value::Decimal)
            .map_err(|e| Error::InvalidValue(e.to_string())),
        Value::Str(s) => Decimal::from_str(s.trim())
            .map(Value::Decimal)
            .map_err(|_| invalid("DECIMAL", &s)),
        other => Ok(Value::Decimal(Decimal::from_i128_with_scale(
            other.to_i128()?,
            0,
        ))),
    }
}

fn parse_timestamp(s: &str) -> std::result::Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMATS[0])
        .or_else(|_| NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMATS[1]))
}

fn mismatch(target: &DataType, value: &Value) -> Error {
    Error::TypeMismatch {
        expected: target.to_string(),
        found: value.type_name().into(),
    }
}

fn invalid(expected: &str, s: &str) -> Error {
    Error::InvalidValue(format!("Cannot parse '{}' as {}", s, expected))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status() -> EnumType {
        EnumType::new("Status", DataType::U8).variant("Active", 1)
    }

    #[test]
    fn test_integer_narrowing_is_bounds_checked() {
        assert_eq!(
            coerce_value(Value::I64(120), &DataType::I8).unwrap(),
            Value::I8(120)
        );
        assert!(matches!(
            coerce_value(Value::I64(300), &DataType::I8),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_null_is_preserved() {
        assert_eq!(coerce_value(Value::Null, &DataType::I32).unwrap(), Value::Null);
    }

    #[test]
    fn test_sqlite_text_timestamp_is_parsed() {
        let value = coerce_value(Value::string("2021-03-04 05:06:07"), &DataType::Timestamp).unwrap();
        assert_eq!(value.to_string(), "2021-03-04 05:06:07");
    }

    #[test]
    fn test_to_enum_goes_through_underlying_type() {
        assert_eq!(
            to_enum(Value::I64(1), &status()).unwrap(),
            Value::enumeration("Status", 1)
        );
        // -1 does not fit the u8 underlying type
        assert!(to_enum(Value::I64(-1), &status()).is_err());
    }

    #[test]
    fn test_to_enum_rejects_non_integral_underlying_type() {
        let broken = EnumType::new("Broken", DataType::Text);
        assert!(to_enum(Value::I64(1), &broken).is_err());
    }
}

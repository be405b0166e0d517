//! Proven ORM Value - value type shared by the SQL and materialization layers
//!
//! This crate provides the Value union used for:
//! - Raw column values read from the store (with `Value::Null` as the null sentinel)
//! - Model-typed values produced by materialization, including enumerations
//! - Literal constants embedded in generated SQL

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{EnumValue, Interval, Row, Value};

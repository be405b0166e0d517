//! SQLite provider for the Proven ORM
//!
//! This crate provides:
//! - Translation of host date/time method calls and members to `strftime` SQL
//! - SQL generation for simple single-table SELECTs
//! - Shape-keyed compiled value buffer factories for row materialization

pub mod coercion;
pub mod compiler;
pub mod config;
pub mod error;
pub mod materialization;
pub mod sql;
pub mod translation;
pub mod types;

pub use compiler::QueryCompiler;
pub use config::{DialectConfig, MaterializationConfig, SqliteConfig};
pub use error::{Error, Result};
pub use materialization::{
    Converter, Projector, Shape, TypeMaterializationInfo, ValueBufferFactory,
    ValueBufferFactoryCache, ValueConverter,
};
pub use types::{
    BinaryOperator, DataType, EnumType, Expression, HostType, MemberInfo, MethodInfo, Query, Value,
};

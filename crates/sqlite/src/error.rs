//! Error types for SQL translation and materialization

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Type errors
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    // Materialization errors
    #[error("Value converter '{converter}' failed: {message}")]
    Conversion { converter: String, message: String },

    #[error("Row does not match shape: {0}")]
    InvalidShape(String),

    // Translation errors
    #[error("Expression could not be translated to SQL: {0}")]
    Untranslatable(String),

    #[error(transparent)]
    Value(#[from] proven_orm_value::Error),
}

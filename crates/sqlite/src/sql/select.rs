//! Translated SELECT statement

use super::SqlExpression;

/// Projection of a translated SELECT
#[derive(Clone, Debug, PartialEq)]
pub enum SqlProjection {
    Count,
    Columns(Vec<SqlExpression>),
}

/// A single-table SELECT ready for SQL generation
#[derive(Clone, Debug, PartialEq)]
pub struct SelectExpression {
    pub table: String,
    pub alias: String,
    pub projection: SqlProjection,
    pub predicate: Option<SqlExpression>,
}

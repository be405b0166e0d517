//! Host-side query over a single table

use super::Expression;

/// What a query returns
#[derive(Clone, Debug, PartialEq)]
pub enum QueryProjection {
    /// `COUNT(*)` of the matching rows
    Count,
    /// The given expressions, one column each
    Columns(Vec<Expression>),
}

/// A query over one table, optionally filtered
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    pub table: String,
    pub alias: String,
    pub predicate: Option<Expression>,
    pub projection: QueryProjection,
}

impl Query {
    /// Query the given table. The alias defaults to the lowercased first
    /// letter of the table name (`Orders` is aliased as `o`).
    pub fn from(table: impl Into<String>) -> Self {
        let table = table.into();
        let alias = table
            .chars()
            .next()
            .map(|c| c.to_lowercase().to_string())
            .unwrap_or_else(|| "t".to_string());
        Self {
            table,
            alias,
            predicate: None,
            projection: QueryProjection::Columns(Vec::new()),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    /// Add a filter; successive filters are combined with AND.
    pub fn filter(mut self, predicate: Expression) -> Self {
        self.predicate = Some(match self.predicate.take() {
            Some(existing) => {
                Expression::binary(super::BinaryOperator::And, existing, predicate)
            }
            None => predicate,
        });
        self
    }

    pub fn select(mut self, columns: Vec<Expression>) -> Self {
        self.projection = QueryProjection::Columns(columns);
        self
    }

    pub fn count(mut self) -> Self {
        self.projection = QueryProjection::Count;
        self
    }
}

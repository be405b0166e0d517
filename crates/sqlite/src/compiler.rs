//! Entry point tying translation, SQL generation and materialization together

use crate::config::SqliteConfig;
use crate::error::Result;
use crate::materialization::{Shape, ValueBufferFactoryCache};
use crate::sql::SqlGenerator;
use crate::translation::SqlTranslatingVisitor;
use crate::types::Query;
use proven_orm_value::Row;

/// Compiles queries to SQLite SQL and materializes their result rows
#[derive(Debug)]
pub struct QueryCompiler {
    config: SqliteConfig,
    factories: ValueBufferFactoryCache,
}

impl QueryCompiler {
    pub fn new(config: SqliteConfig) -> Self {
        let factories = ValueBufferFactoryCache::with_config(config.materialization.clone());
        Self { config, factories }
    }

    pub fn config(&self) -> &SqliteConfig {
        &self.config
    }

    /// Render a query as SQL text
    pub fn to_sql(&self, query: &Query) -> Result<String> {
        let select = SqlTranslatingVisitor::translate_query(query, &self.config.dialect)?;
        let sql = SqlGenerator::generate_select(&select);
        tracing::debug!(table = %query.table, sql = %sql, "Generated SQL");
        Ok(sql)
    }

    /// Materialize raw rows of the given shape
    pub fn materialize(&self, shape: &Shape, rows: &[Row]) -> Result<Vec<Row>> {
        let factory = self.factories.create(shape);
        rows.iter().map(|row| factory.create(row)).collect()
    }

    /// The factory cache backing [`QueryCompiler::materialize`]
    pub fn factories(&self) -> &ValueBufferFactoryCache {
        &self.factories
    }
}

impl Default for QueryCompiler {
    fn default() -> Self {
        Self::new(SqliteConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materialization::TypeMaterializationInfo;
    use crate::types::{BinaryOperator, DataType, Expression, HostType, Value};

    #[test]
    fn test_count_query() {
        let compiler = QueryCompiler::new(SqliteConfig::for_testing());
        let query = Query::from("Orders")
            .filter(Expression::property("Quantity", HostType::Int32).equal(Expression::constant(3)))
            .count();
        assert_eq!(
            compiler.to_sql(&query).unwrap(),
            "SELECT COUNT(*)\nFROM \"Orders\" AS \"o\"\nWHERE \"o\".\"Quantity\" = 3"
        );
    }

    #[test]
    fn test_nested_division_keeps_its_grouping() {
        let compiler = QueryCompiler::default();
        let halved = Expression::binary(
            BinaryOperator::Divide,
            Expression::property("B", HostType::Int32),
            Expression::constant(2),
        );
        let product = Expression::binary(
            BinaryOperator::Multiply,
            Expression::property("A", HostType::Int32),
            halved,
        );
        let sql = compiler.to_sql(&Query::from("Orders").select(vec![product])).unwrap();
        assert!(sql.starts_with(r#"SELECT "o"."A" * ("o"."B" / 2)"#), "{sql}");
    }

    #[test]
    fn test_timestamp_constant_keeps_milliseconds() {
        let compiler = QueryCompiler::default();
        let instant = chrono::NaiveDate::from_ymd_opt(2020, 1, 2)
            .unwrap()
            .and_hms_milli_opt(3, 4, 5, 500)
            .unwrap();
        let query = Query::from("Orders")
            .filter(Expression::property("D", HostType::DateTime).equal(Expression::constant(instant)))
            .count();
        let sql = compiler.to_sql(&query).unwrap();
        assert!(sql.ends_with(r#"WHERE "o"."D" = '2020-01-02 03:04:05.500'"#), "{sql}");
    }

    #[test]
    fn test_materialize_reuses_factory() {
        let compiler = QueryCompiler::default();
        let shape = Shape::new(vec![TypeMaterializationInfo::new(DataType::I64)]);
        let rows = vec![vec![Value::I64(1)], vec![Value::I64(2)]];

        assert_eq!(compiler.materialize(&shape, &rows).unwrap(), rows);
        compiler.materialize(&shape, &rows).unwrap();
        assert_eq!(compiler.factories().len(), 1);
    }
}

//! Common test utilities for SQLite provider integration tests
#![allow(dead_code)]

use proven_orm_sqlite::translation::date_add::DatePart;
use proven_orm_sqlite::translation::date_diff::diff_method;
use proven_orm_sqlite::translation::member;
use proven_orm_sqlite::{Expression, HostType, Query, QueryCompiler, SqliteConfig};

/// `DateTime.Now` as rendered with the default dialect
pub const NOW: &str = "strftime('%Y-%m-%d %H:%M:%S','now','localtime')";

/// Create a compiler configured for tests
pub fn setup_test() -> QueryCompiler {
    QueryCompiler::new(SqliteConfig::for_testing())
}

/// A non-nullable `DateTime` column
pub fn date_column(name: &str) -> Expression {
    Expression::property(name, HostType::DateTime)
}

/// A nullable `DateTime` column
pub fn nullable_date_column(name: &str) -> Expression {
    Expression::property(name, HostType::DateTime.nullable())
}

/// `DateTime.Now`, converted to match `end` when it is nullable
pub fn now_for(end: &Expression) -> Expression {
    let now = Expression::static_member(member::now());
    let end_type = end.host_type();
    if end_type.is_nullable() {
        now.convert(end_type)
    } else {
        now
    }
}

/// `DbFunctions.DateDiff<part>(DateTime.Now, end) == threshold`
pub fn diff_from_now(part: DatePart, end: Expression, threshold: i32) -> Expression {
    let start = now_for(&end);
    Expression::static_call(diff_method(part, end.host_type()), vec![start, end])
        .equal(Expression::constant(threshold))
}

/// Render `SELECT COUNT(*)` over `table` filtered by `predicate`
pub fn count_where(table: &str, predicate: Expression) -> String {
    setup_test()
        .to_sql(&Query::from(table).filter(predicate).count())
        .unwrap()
}

/// The expected SQL for a count query with the given WHERE clause
pub fn expected_count(table: &str, alias: &str, condition: &str) -> String {
    format!(
        "SELECT COUNT(*)\nFROM \"{}\" AS \"{}\"\nWHERE {}",
        table, alias, condition
    )
}

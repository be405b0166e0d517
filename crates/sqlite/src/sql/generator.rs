//! SQLite text generation

use super::{SelectExpression, SqlBinaryOperator, SqlExpression, SqlProjection};
use proven_orm_value::Value;
use std::fmt::Write;

// `%.f` keeps fractional seconds and prints nothing when they are zero.
const TIME_FORMAT: &str = "%H:%M:%S%.f";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const TIMESTAMP_TZ_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f%:z";

/// Renders SQL expression trees as SQLite text
#[derive(Default)]
pub struct SqlGenerator {
    sql: String,
}

impl SqlGenerator {
    /// Render a full SELECT statement. Clauses are separated by newlines.
    pub fn generate_select(select: &SelectExpression) -> String {
        let mut generator = Self::default();
        generator.sql.push_str("SELECT ");
        match &select.projection {
            SqlProjection::Count => generator.sql.push_str("COUNT(*)"),
            SqlProjection::Columns(columns) if columns.is_empty() => generator.sql.push('1'),
            SqlProjection::Columns(columns) => {
                for (i, column) in columns.iter().enumerate() {
                    if i > 0 {
                        generator.sql.push_str(", ");
                    }
                    generator.visit(column);
                }
            }
        }

        generator.sql.push_str("\nFROM ");
        generator.push_identifier(&select.table);
        generator.sql.push_str(" AS ");
        generator.push_identifier(&select.alias);

        if let Some(predicate) = &select.predicate {
            generator.sql.push_str("\nWHERE ");
            generator.visit(predicate);
        }

        generator.sql
    }

    /// Render a single expression
    pub fn generate_expression(expression: &SqlExpression) -> String {
        let mut generator = Self::default();
        generator.visit(expression);
        generator.sql
    }

    fn visit(&mut self, expression: &SqlExpression) {
        match expression {
            SqlExpression::Column { table, name } => {
                self.push_identifier(table);
                self.sql.push('.');
                self.push_identifier(name);
            }
            SqlExpression::Constant(value) => self.push_literal(value),
            SqlExpression::Fragment(sql) => self.sql.push_str(sql),
            SqlExpression::Function { name, arguments } => {
                self.sql.push_str(name);
                self.sql.push('(');
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        self.sql.push_str(", ");
                    }
                    self.visit(argument);
                }
                self.sql.push(')');
            }
            SqlExpression::Cast { operand, data_type } => {
                self.sql.push_str("CAST(");
                self.visit(operand);
                self.sql.push_str(" AS ");
                self.sql.push_str(data_type.store_type_name());
                self.sql.push(')');
            }
            SqlExpression::Binary { op, left, right } => {
                self.visit_operand(*op, left, false);
                self.sql.push(' ');
                self.sql.push_str(op.symbol());
                self.sql.push(' ');
                self.visit_operand(*op, right, true);
            }
        }
    }

    /// Parenthesize an operand that binds looser than its parent, or that
    /// sits on the right at equal precedence. Only a right operand with the
    /// parent's own associative operator regroups safely.
    fn visit_operand(&mut self, parent: SqlBinaryOperator, operand: &SqlExpression, right: bool) {
        let needs_parentheses = match operand {
            SqlExpression::Binary { op, .. } => {
                op.precedence() < parent.precedence()
                    || (right
                        && op.precedence() == parent.precedence()
                        && !(*op == parent && parent.is_associative()))
            }
            _ => false,
        };

        if needs_parentheses {
            self.sql.push('(');
            self.visit(operand);
            self.sql.push(')');
        } else {
            self.visit(operand);
        }
    }

    fn push_identifier(&mut self, identifier: &str) {
        self.sql.push('"');
        self.sql.push_str(&identifier.replace('"', "\"\""));
        self.sql.push('"');
    }

    fn push_string(&mut self, s: &str) {
        self.sql.push('\'');
        self.sql.push_str(&s.replace('\'', "''"));
        self.sql.push('\'');
    }

    fn push_literal(&mut self, value: &Value) {
        match value {
            Value::Null => self.sql.push_str("NULL"),
            Value::Bool(b) => self.sql.push(if *b { '1' } else { '0' }),
            // SQLite has no NaN or infinity literal
            Value::F32(f) if !f.is_finite() => self.sql.push_str("NULL"),
            Value::F64(f) if !f.is_finite() => self.sql.push_str("NULL"),
            Value::F32(f) => {
                let _ = write!(self.sql, "{:?}", f);
            }
            Value::F64(f) => {
                let _ = write!(self.sql, "{:?}", f);
            }
            Value::Bytea(bytes) => {
                self.sql.push_str("X'");
                for byte in bytes {
                    let _ = write!(self.sql, "{:02X}", byte);
                }
                self.sql.push('\'');
            }
            Value::Uuid(uuid) => self.push_string(&uuid.to_string().to_uppercase()),
            Value::Str(s) => self.push_string(s),
            Value::Time(t) => self.push_string(&t.format(TIME_FORMAT).to_string()),
            Value::Timestamp(ts) => self.push_string(&ts.format(TIMESTAMP_FORMAT).to_string()),
            Value::TimestampTz(ts) => {
                self.push_string(&ts.format(TIMESTAMP_TZ_FORMAT).to_string())
            }
            Value::Decimal(_) | Value::Date(_) | Value::Interval(_) => {
                self.push_string(&value.to_string())
            }
            Value::I8(_)
            | Value::I16(_)
            | Value::I32(_)
            | Value::I64(_)
            | Value::U8(_)
            | Value::U16(_)
            | Value::U32(_)
            | Value::U64(_)
            | Value::Enum(_) => {
                let _ = write!(self.sql, "{}", value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;
    use chrono::{FixedOffset, NaiveDate};

    fn col(name: &str) -> SqlExpression {
        SqlExpression::column("o", name)
    }

    #[test]
    fn test_lower_precedence_operand_is_parenthesized() {
        let expr = col("A").subtract(col("B")).divide(SqlExpression::constant(60i64));
        assert_eq!(
            SqlGenerator::generate_expression(&expr),
            r#"("o"."A" - "o"."B") / 60"#
        );
    }

    #[test]
    fn test_right_operand_of_subtraction_is_parenthesized() {
        let expr = col("A").subtract(col("B").subtract(col("C")));
        assert_eq!(
            SqlGenerator::generate_expression(&expr),
            r#""o"."A" - ("o"."B" - "o"."C")"#
        );
        let expr = col("A").subtract(col("B")).subtract(col("C"));
        assert_eq!(
            SqlGenerator::generate_expression(&expr),
            r#""o"."A" - "o"."B" - "o"."C""#
        );
    }

    #[test]
    fn test_right_operand_of_multiplication_keeps_grouping() {
        let expr = col("A").multiply(col("B").divide(SqlExpression::constant(2i64)));
        assert_eq!(
            SqlGenerator::generate_expression(&expr),
            r#""o"."A" * ("o"."B" / 2)"#
        );

        let modulo = SqlExpression::binary(
            SqlBinaryOperator::Modulo,
            col("B"),
            SqlExpression::constant(2i64),
        );
        assert_eq!(
            SqlGenerator::generate_expression(&col("A").multiply(modulo)),
            r#""o"."A" * ("o"."B" % 2)"#
        );

        // Same associative operator regroups freely
        let expr = col("A").multiply(col("B").multiply(col("C")));
        assert_eq!(
            SqlGenerator::generate_expression(&expr),
            r#""o"."A" * "o"."B" * "o"."C""#
        );
        let expr = col("A").add(col("B").subtract(col("C")));
        assert_eq!(
            SqlGenerator::generate_expression(&expr),
            r#""o"."A" + ("o"."B" - "o"."C")"#
        );
    }

    #[test]
    fn test_temporal_literals_keep_fractional_seconds() {
        let render = |v: Value| SqlGenerator::generate_expression(&SqlExpression::Constant(v));
        let date = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        let precise = date.and_hms_milli_opt(3, 4, 5, 500).unwrap();
        assert_eq!(
            render(Value::Timestamp(precise)),
            "'2020-01-02 03:04:05.500'"
        );
        assert_eq!(
            render(Value::Timestamp(date.and_hms_opt(3, 4, 5).unwrap())),
            "'2020-01-02 03:04:05'"
        );
        assert_eq!(render(Value::Time(precise.time())), "'03:04:05.500'");
        let offset = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(
            render(Value::TimestampTz(precise.and_local_timezone(offset).unwrap())),
            "'2020-01-02 03:04:05.500+01:00'"
        );
    }

    #[test]
    fn test_non_finite_floats_render_as_null() {
        let render = |v: Value| SqlGenerator::generate_expression(&SqlExpression::Constant(v));
        assert_eq!(render(Value::F64(f64::NAN)), "NULL");
        assert_eq!(render(Value::F64(f64::INFINITY)), "NULL");
        assert_eq!(render(Value::F32(f32::NEG_INFINITY)), "NULL");
        assert_eq!(render(Value::F64(2.5)), "2.5");
    }

    #[test]
    fn test_literals() {
        let render = |v: Value| SqlGenerator::generate_expression(&SqlExpression::Constant(v));
        assert_eq!(render(Value::string("it's")), "'it''s'");
        assert_eq!(render(Value::Bool(true)), "1");
        assert_eq!(render(Value::F64(1.0)), "1.0");
        assert_eq!(render(Value::Bytea(vec![0xab, 0x01])), "X'AB01'");
        assert_eq!(render(Value::Null), "NULL");
    }

    #[test]
    fn test_cast_and_identifier_quoting() {
        let expr = SqlExpression::column("o", "we\"ird").cast(DataType::Text);
        assert_eq!(
            SqlGenerator::generate_expression(&expr),
            r#"CAST("o"."we""ird" AS TEXT)"#
        );
    }

    #[test]
    fn test_select_layout() {
        let select = SelectExpression {
            table: "Orders".into(),
            alias: "o".into(),
            projection: SqlProjection::Columns(vec![col("Id"), col("OrderDate")]),
            predicate: None,
        };
        assert_eq!(
            SqlGenerator::generate_select(&select),
            "SELECT \"o\".\"Id\", \"o\".\"OrderDate\"\nFROM \"Orders\" AS \"o\""
        );
    }
}

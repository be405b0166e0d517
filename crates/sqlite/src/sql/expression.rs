//! SQL expression algebra
//!
//! Trees built here are immutable once constructed and are handed to the
//! caller by value. The generator renders them as SQLite text.

use crate::types::{BinaryOperator, DataType};
use proven_orm_value::Value;

/// Binary operators of SQLite, in the subset the provider emits
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SqlBinaryOperator {
    Concat,
    Multiply,
    Divide,
    Modulo,
    Add,
    Subtract,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Equal,
    NotEqual,
    And,
    Or,
}

impl SqlBinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            SqlBinaryOperator::Concat => "||",
            SqlBinaryOperator::Multiply => "*",
            SqlBinaryOperator::Divide => "/",
            SqlBinaryOperator::Modulo => "%",
            SqlBinaryOperator::Add => "+",
            SqlBinaryOperator::Subtract => "-",
            SqlBinaryOperator::LessThan => "<",
            SqlBinaryOperator::LessThanOrEqual => "<=",
            SqlBinaryOperator::GreaterThan => ">",
            SqlBinaryOperator::GreaterThanOrEqual => ">=",
            SqlBinaryOperator::Equal => "=",
            SqlBinaryOperator::NotEqual => "<>",
            SqlBinaryOperator::And => "AND",
            SqlBinaryOperator::Or => "OR",
        }
    }

    /// Binding strength; higher binds tighter (SQLite operator table).
    pub fn precedence(&self) -> u8 {
        match self {
            SqlBinaryOperator::Concat => 7,
            SqlBinaryOperator::Multiply | SqlBinaryOperator::Divide | SqlBinaryOperator::Modulo => 6,
            SqlBinaryOperator::Add | SqlBinaryOperator::Subtract => 5,
            SqlBinaryOperator::LessThan
            | SqlBinaryOperator::LessThanOrEqual
            | SqlBinaryOperator::GreaterThan
            | SqlBinaryOperator::GreaterThanOrEqual => 4,
            SqlBinaryOperator::Equal | SqlBinaryOperator::NotEqual => 3,
            SqlBinaryOperator::And => 2,
            SqlBinaryOperator::Or => 1,
        }
    }

    /// `a op (b op c) == (a op b) op c`
    pub fn is_associative(&self) -> bool {
        matches!(
            self,
            SqlBinaryOperator::Concat
                | SqlBinaryOperator::Multiply
                | SqlBinaryOperator::Add
                | SqlBinaryOperator::And
                | SqlBinaryOperator::Or
        )
    }
}

impl From<BinaryOperator> for SqlBinaryOperator {
    fn from(op: BinaryOperator) -> Self {
        match op {
            BinaryOperator::Add => SqlBinaryOperator::Add,
            BinaryOperator::Subtract => SqlBinaryOperator::Subtract,
            BinaryOperator::Multiply => SqlBinaryOperator::Multiply,
            BinaryOperator::Divide => SqlBinaryOperator::Divide,
            BinaryOperator::Modulo => SqlBinaryOperator::Modulo,
            BinaryOperator::Equal => SqlBinaryOperator::Equal,
            BinaryOperator::NotEqual => SqlBinaryOperator::NotEqual,
            BinaryOperator::LessThan => SqlBinaryOperator::LessThan,
            BinaryOperator::LessThanOrEqual => SqlBinaryOperator::LessThanOrEqual,
            BinaryOperator::GreaterThan => SqlBinaryOperator::GreaterThan,
            BinaryOperator::GreaterThanOrEqual => SqlBinaryOperator::GreaterThanOrEqual,
            BinaryOperator::And => SqlBinaryOperator::And,
            BinaryOperator::Or => SqlBinaryOperator::Or,
        }
    }
}

/// A SQL expression node
#[derive(Clone, Debug, PartialEq)]
pub enum SqlExpression {
    /// `"table"."column"`
    Column { table: String, name: String },
    /// A literal, rendered with SQLite literal syntax.
    Constant(Value),
    /// Raw SQL text emitted verbatim.
    Fragment(String),
    /// `name(arg, ...)`
    Function {
        name: String,
        arguments: Vec<SqlExpression>,
    },
    /// `CAST(operand AS <store type>)`
    Cast {
        operand: Box<SqlExpression>,
        data_type: DataType,
    },
    /// `left op right`
    Binary {
        op: SqlBinaryOperator,
        left: Box<SqlExpression>,
        right: Box<SqlExpression>,
    },
}

impl SqlExpression {
    pub fn column(table: impl Into<String>, name: impl Into<String>) -> Self {
        SqlExpression::Column {
            table: table.into(),
            name: name.into(),
        }
    }

    pub fn constant(value: impl Into<Value>) -> Self {
        SqlExpression::Constant(value.into())
    }

    pub fn fragment(sql: impl Into<String>) -> Self {
        SqlExpression::Fragment(sql.into())
    }

    pub fn function(name: impl Into<String>, arguments: Vec<SqlExpression>) -> Self {
        SqlExpression::Function {
            name: name.into(),
            arguments,
        }
    }

    pub fn cast(self, data_type: DataType) -> Self {
        SqlExpression::Cast {
            operand: Box::new(self),
            data_type,
        }
    }

    pub fn binary(op: SqlBinaryOperator, left: SqlExpression, right: SqlExpression) -> Self {
        SqlExpression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn subtract(self, right: SqlExpression) -> Self {
        SqlExpression::binary(SqlBinaryOperator::Subtract, self, right)
    }

    pub fn add(self, right: SqlExpression) -> Self {
        SqlExpression::binary(SqlBinaryOperator::Add, self, right)
    }

    pub fn multiply(self, right: SqlExpression) -> Self {
        SqlExpression::binary(SqlBinaryOperator::Multiply, self, right)
    }

    pub fn divide(self, right: SqlExpression) -> Self {
        SqlExpression::binary(SqlBinaryOperator::Divide, self, right)
    }

    pub fn concat(self, right: SqlExpression) -> Self {
        SqlExpression::binary(SqlBinaryOperator::Concat, self, right)
    }
}

//! Host-side query expressions
//!
//! The query pipeline hands the provider expressions written against model
//! types: property accesses on the query root, constants, conversions,
//! operators, and calls to host methods and members (for example
//! `DateTime.AddDays` or `DateTime.Now`). The SQL translating visitor turns
//! these into [`SqlExpression`](crate::sql::SqlExpression) trees.

use super::DataType;
use proven_orm_value::Value;
use std::fmt::{self, Display};

/// Host types that appear in method and member signatures
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HostType {
    Bool,
    Int32,
    Int64,
    Double,
    Decimal,
    String,
    /// Date and time without offset
    DateTime,
    /// Date and time carrying a UTC offset
    DateTimeOffset,
    TimeSpan,
    /// Static holder of provider database functions (`DateDiffDay`, ...)
    DbFunctions,
    Nullable(Box<HostType>),
}

impl HostType {
    pub fn nullable(self) -> HostType {
        match self {
            HostType::Nullable(_) => self,
            other => HostType::Nullable(Box::new(other)),
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, HostType::Nullable(_))
    }

    pub fn base_type(&self) -> &HostType {
        match self {
            HostType::Nullable(inner) => inner.base_type(),
            _ => self,
        }
    }

    /// Whether values of this type are points in time
    pub fn is_date_time(&self) -> bool {
        matches!(
            self.base_type(),
            HostType::DateTime | HostType::DateTimeOffset
        )
    }

    /// The store data type a value of this host type is converted to
    pub fn data_type(&self) -> DataType {
        match self {
            HostType::Bool => DataType::Bool,
            HostType::Int32 => DataType::I32,
            HostType::Int64 => DataType::I64,
            HostType::Double => DataType::F64,
            HostType::Decimal => DataType::Decimal,
            HostType::String => DataType::Text,
            HostType::DateTime => DataType::Timestamp,
            HostType::DateTimeOffset => DataType::TimestampTz,
            HostType::TimeSpan => DataType::Interval,
            HostType::DbFunctions => DataType::Text,
            HostType::Nullable(inner) => inner.data_type().nullable(),
        }
    }

    /// Best-effort host type of a constant
    pub fn of_value(value: &Value) -> HostType {
        match value {
            Value::Null => HostType::Nullable(Box::new(HostType::String)),
            Value::Bool(_) => HostType::Bool,
            Value::I8(_) | Value::I16(_) | Value::I32(_) | Value::U8(_) | Value::U16(_) => {
                HostType::Int32
            }
            Value::I64(_) | Value::U32(_) | Value::U64(_) | Value::Enum(_) => HostType::Int64,
            Value::F32(_) | Value::F64(_) => HostType::Double,
            Value::Decimal(_) => HostType::Decimal,
            Value::Date(_) | Value::Timestamp(_) => HostType::DateTime,
            Value::TimestampTz(_) => HostType::DateTimeOffset,
            Value::Interval(_) => HostType::TimeSpan,
            Value::Str(_) | Value::Time(_) | Value::Uuid(_) | Value::Bytea(_) => HostType::String,
        }
    }
}

impl Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostType::Bool => write!(f, "bool"),
            HostType::Int32 => write!(f, "int"),
            HostType::Int64 => write!(f, "long"),
            HostType::Double => write!(f, "double"),
            HostType::Decimal => write!(f, "decimal"),
            HostType::String => write!(f, "string"),
            HostType::DateTime => write!(f, "DateTime"),
            HostType::DateTimeOffset => write!(f, "DateTimeOffset"),
            HostType::TimeSpan => write!(f, "TimeSpan"),
            HostType::DbFunctions => write!(f, "DbFunctions"),
            HostType::Nullable(inner) => write!(f, "{}?", inner),
        }
    }
}

/// A resolved host method: declaring type, name, parameter types and the
/// declared return type. Two `MethodInfo`s are the same method iff all four
/// agree.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodInfo {
    pub declaring_type: HostType,
    pub name: String,
    pub parameters: Vec<HostType>,
    pub return_type: HostType,
}

impl MethodInfo {
    pub fn new(
        declaring_type: HostType,
        name: impl Into<String>,
        parameters: impl Into<Vec<HostType>>,
        return_type: HostType,
    ) -> Self {
        Self {
            declaring_type,
            name: name.into(),
            parameters: parameters.into(),
            return_type,
        }
    }
}

impl Display for MethodInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}(", self.declaring_type, self.name)?;
        for (i, param) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ")")
    }
}

/// A resolved host property or field
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MemberInfo {
    pub declaring_type: HostType,
    pub name: String,
    pub member_type: HostType,
}

impl MemberInfo {
    pub fn new(declaring_type: HostType, name: impl Into<String>, member_type: HostType) -> Self {
        Self {
            declaring_type,
            name: name.into(),
            member_type,
        }
    }
}

/// Binary operators of the host expression language
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    And,
    Or,
}

impl BinaryOperator {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Equal
                | BinaryOperator::NotEqual
                | BinaryOperator::LessThan
                | BinaryOperator::LessThanOrEqual
                | BinaryOperator::GreaterThan
                | BinaryOperator::GreaterThanOrEqual
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }
}

/// A host expression tree over a single query root
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    /// A literal value.
    Constant(Value),
    /// A property of the query root, e.g. `o.OrderDate`.
    Property { name: String, host_type: HostType },
    /// A conversion of the operand to another host type.
    Convert {
        operand: Box<Expression>,
        target: HostType,
    },
    /// A binary operation.
    Binary {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// A property or field access; `instance` is absent for static members.
    Member {
        instance: Option<Box<Expression>>,
        member: MemberInfo,
    },
    /// A method call; `instance` is absent for static methods.
    MethodCall {
        instance: Option<Box<Expression>>,
        method: MethodInfo,
        arguments: Vec<Expression>,
    },
}

impl Expression {
    pub fn constant(value: impl Into<Value>) -> Self {
        Expression::Constant(value.into())
    }

    pub fn property(name: impl Into<String>, host_type: HostType) -> Self {
        Expression::Property {
            name: name.into(),
            host_type,
        }
    }

    pub fn convert(self, target: HostType) -> Self {
        Expression::Convert {
            operand: Box::new(self),
            target,
        }
    }

    pub fn binary(op: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn equal(self, other: Expression) -> Self {
        Expression::binary(BinaryOperator::Equal, self, other)
    }

    pub fn static_member(member: MemberInfo) -> Self {
        Expression::Member {
            instance: None,
            member,
        }
    }

    pub fn member(self, member: MemberInfo) -> Self {
        Expression::Member {
            instance: Some(Box::new(self)),
            member,
        }
    }

    pub fn static_call(method: MethodInfo, arguments: Vec<Expression>) -> Self {
        Expression::MethodCall {
            instance: None,
            method,
            arguments,
        }
    }

    pub fn call(self, method: MethodInfo, arguments: Vec<Expression>) -> Self {
        Expression::MethodCall {
            instance: Some(Box::new(self)),
            method,
            arguments,
        }
    }

    /// Static host type of the expression
    pub fn host_type(&self) -> HostType {
        match self {
            Expression::Constant(value) => HostType::of_value(value),
            Expression::Property { host_type, .. } => host_type.clone(),
            Expression::Convert { target, .. } => target.clone(),
            Expression::Binary { op, left, .. } => {
                if op.is_comparison() || op.is_logical() {
                    HostType::Bool
                } else {
                    left.host_type()
                }
            }
            Expression::Member { member, .. } => member.member_type.clone(),
            Expression::MethodCall { method, .. } => method.return_type.clone(),
        }
    }
}

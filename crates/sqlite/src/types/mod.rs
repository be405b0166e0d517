pub mod data_type;
pub mod expression;
pub mod query;

pub use data_type::{DataType, EnumType};
pub use expression::{BinaryOperator, Expression, HostType, MemberInfo, MethodInfo};
pub use proven_orm_value::Value;
pub use query::Query;

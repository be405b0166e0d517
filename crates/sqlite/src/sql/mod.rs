//! SQL expression trees and their SQLite rendering

mod expression;
mod generator;
mod select;

pub use expression::{SqlBinaryOperator, SqlExpression};
pub use generator::SqlGenerator;
pub use select::{SelectExpression, SqlProjection};

//! Host expression to SQL expression translation

use crate::config::DialectConfig;
use crate::error::{Error, Result};
use crate::sql::{SelectExpression, SqlExpression, SqlProjection};
use crate::types::Expression;
use crate::types::query::{Query, QueryProjection};

/// Translates host expressions over one query root into SQL expressions
pub struct SqlTranslatingVisitor<'a> {
    alias: &'a str,
    dialect: &'a DialectConfig,
}

impl<'a> SqlTranslatingVisitor<'a> {
    pub fn new(alias: &'a str, dialect: &'a DialectConfig) -> Self {
        Self { alias, dialect }
    }

    /// Translate a whole query into a SELECT expression
    pub fn translate_query(query: &Query, dialect: &DialectConfig) -> Result<SelectExpression> {
        let visitor = SqlTranslatingVisitor::new(&query.alias, dialect);

        let projection = match &query.projection {
            QueryProjection::Count => SqlProjection::Count,
            QueryProjection::Columns(columns) => SqlProjection::Columns(
                columns
                    .iter()
                    .map(|column| visitor.translate(column))
                    .collect::<Result<Vec<_>>>()?,
            ),
        };
        let predicate = query
            .predicate
            .as_ref()
            .map(|predicate| visitor.translate(predicate))
            .transpose()?;

        Ok(SelectExpression {
            table: query.table.clone(),
            alias: query.alias.clone(),
            projection,
            predicate,
        })
    }

    /// Translate one expression
    pub fn translate(&self, expression: &Expression) -> Result<SqlExpression> {
        match expression {
            Expression::Constant(value) => Ok(SqlExpression::Constant(value.clone())),

            Expression::Property { name, .. } => Ok(SqlExpression::column(self.alias, name.as_str())),

            Expression::Convert { operand, target } => {
                let translated = self.translate(operand)?;
                // Nullability-only conversions have no SQL counterpart.
                if operand.host_type().base_type() == target.base_type() {
                    Ok(translated)
                } else {
                    Ok(translated.cast(target.data_type()))
                }
            }

            Expression::Binary { op, left, right } => Ok(SqlExpression::binary(
                (*op).into(),
                self.translate(left)?,
                self.translate(right)?,
            )),

            Expression::Member { instance, member } => {
                let instance = instance
                    .as_deref()
                    .map(|instance| self.translate(instance))
                    .transpose()?;
                super::translate_member(instance.as_ref(), member, self.dialect).ok_or_else(|| {
                    Error::Untranslatable(format!("{}.{}", member.declaring_type, member.name))
                })
            }

            Expression::MethodCall {
                instance,
                method,
                arguments,
            } => {
                let instance = instance
                    .as_deref()
                    .map(|instance| self.translate(instance))
                    .transpose()?;
                let arguments = arguments
                    .iter()
                    .map(|argument| self.translate(argument))
                    .collect::<Result<Vec<_>>>()?;
                super::translate_method_call(instance.as_ref(), method, &arguments, self.dialect)
                    .ok_or_else(|| Error::Untranslatable(method.to_string()))
            }
        }
    }
}

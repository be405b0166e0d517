//! `DateDiffYear` .. `DateDiffSecond` database functions
//!
//! `DateDiffX(start, end)` counts `end - start` in the given unit. Day, hour
//! and minute differences divide the epoch-seconds difference; year and month
//! differences subtract calendar components; second differences subtract the
//! seconds component.

use super::date_add::DatePart;
use super::{MethodCallTranslator, STRFTIME, TranslatorRegistry};
use crate::config::DialectConfig;
use crate::sql::SqlExpression;
use crate::types::{DataType, HostType, MethodInfo};

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_MINUTE: i64 = 60;

fn method_name(part: DatePart) -> &'static str {
    match part {
        DatePart::Years => "DateDiffYear",
        DatePart::Months => "DateDiffMonth",
        DatePart::Days => "DateDiffDay",
        DatePart::Hours => "DateDiffHour",
        DatePart::Minutes => "DateDiffMinute",
        DatePart::Seconds => "DateDiffSecond",
    }
}

/// The `DbFunctions` method computing a difference in `part` between two
/// values of `parameter_type`. Nullable inputs give a nullable result.
pub fn diff_method(part: DatePart, parameter_type: HostType) -> MethodInfo {
    let return_type = if parameter_type.is_nullable() {
        HostType::Int32.nullable()
    } else {
        HostType::Int32
    };
    MethodInfo::new(
        HostType::DbFunctions,
        method_name(part),
        [parameter_type.clone(), parameter_type],
        return_type,
    )
}

/// Translator for date difference functions
pub struct DateDiffTranslator;

impl MethodCallTranslator for DateDiffTranslator {
    fn name(&self) -> &'static str {
        "date_diff"
    }

    fn translate(
        &self,
        _instance: Option<&SqlExpression>,
        method: &MethodInfo,
        arguments: &[SqlExpression],
        _dialect: &DialectConfig,
    ) -> Option<SqlExpression> {
        if method.declaring_type != HostType::DbFunctions
            || !method.parameters.iter().all(HostType::is_date_time)
        {
            return None;
        }
        let part = DatePart::ALL
            .into_iter()
            .find(|part| method_name(*part) == method.name)?;
        let [start, end] = arguments else {
            return None;
        };

        Some(match part {
            DatePart::Years => component(end, "%Y").subtract(component(start, "%Y")),
            DatePart::Months => component(end, "%Y")
                .subtract(component(start, "%Y"))
                .multiply(SqlExpression::constant(12i64))
                .add(component(end, "%m"))
                .subtract(component(start, "%m")),
            DatePart::Days => epoch_difference(start, end, SECONDS_PER_DAY),
            DatePart::Hours => epoch_difference(start, end, SECONDS_PER_HOUR),
            DatePart::Minutes => epoch_difference(start, end, SECONDS_PER_MINUTE),
            DatePart::Seconds => component(end, "%S").subtract(component(start, "%S")),
        })
    }
}

/// `CAST(strftime('<format>', value) AS INTEGER)`
fn component(value: &SqlExpression, format: &str) -> SqlExpression {
    SqlExpression::function(
        STRFTIME,
        vec![SqlExpression::constant(format), value.clone()],
    )
    .cast(DataType::I64)
}

/// `strftime('%s', value)`
fn epoch_seconds(value: &SqlExpression) -> SqlExpression {
    SqlExpression::function(
        STRFTIME,
        vec![SqlExpression::constant("%s"), value.clone()],
    )
}

/// `CAST((epoch(end) - epoch(start)) / unit AS INTEGER)`
fn epoch_difference(start: &SqlExpression, end: &SqlExpression, unit: i64) -> SqlExpression {
    epoch_seconds(end)
        .subtract(epoch_seconds(start))
        .divide(SqlExpression::constant(unit))
        .cast(DataType::I64)
}

/// Register the translator
pub fn register(registry: &mut TranslatorRegistry) {
    registry.register_method_call(Box::new(DateDiffTranslator));
}

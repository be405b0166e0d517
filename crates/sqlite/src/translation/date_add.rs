//! DateTime / DateTimeOffset `AddYears` .. `AddSeconds`
//!
//! `d.AddDays(n)` becomes `strftime('<format>', d, '<n> days')`. A trailing
//! UTC modifier is appended when the result carries an offset.

use super::{MethodCallTranslator, TranslatorRegistry, strftime};
use crate::config::DialectConfig;
use crate::sql::SqlExpression;
use crate::types::{DataType, HostType, MethodInfo};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Date parts addressable through SQLite date modifiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DatePart {
    Years,
    Months,
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl DatePart {
    pub const ALL: [DatePart; 6] = [
        DatePart::Years,
        DatePart::Months,
        DatePart::Days,
        DatePart::Hours,
        DatePart::Minutes,
        DatePart::Seconds,
    ];

    /// Modifier keyword understood by SQLite date functions
    pub fn token(&self) -> &'static str {
        match self {
            DatePart::Years => "years",
            DatePart::Months => "months",
            DatePart::Days => "days",
            DatePart::Hours => "hours",
            DatePart::Minutes => "minutes",
            DatePart::Seconds => "seconds",
        }
    }

    fn method_name(&self) -> &'static str {
        match self {
            DatePart::Years => "AddYears",
            DatePart::Months => "AddMonths",
            DatePart::Days => "AddDays",
            DatePart::Hours => "AddHours",
            DatePart::Minutes => "AddMinutes",
            DatePart::Seconds => "AddSeconds",
        }
    }

    // Calendar parts take whole numbers, clock parts take fractions.
    fn amount_type(&self) -> HostType {
        match self {
            DatePart::Years | DatePart::Months => HostType::Int32,
            _ => HostType::Double,
        }
    }
}

impl fmt::Display for DatePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// The host method that adds `part` to a value of `declaring_type`
/// (`HostType::DateTime` or `HostType::DateTimeOffset`).
pub fn add_method(declaring_type: HostType, part: DatePart) -> MethodInfo {
    MethodInfo::new(
        declaring_type.clone(),
        part.method_name(),
        [part.amount_type()],
        declaring_type,
    )
}

static DATE_PART_METHODS: LazyLock<HashMap<MethodInfo, DatePart>> = LazyLock::new(|| {
    [HostType::DateTime, HostType::DateTimeOffset]
        .into_iter()
        .flat_map(|declaring_type| {
            DatePart::ALL
                .into_iter()
                .map(move |part| (add_method(declaring_type.clone(), part), part))
        })
        .collect()
});

/// Translator for date arithmetic methods
pub struct DateAddTranslator;

impl MethodCallTranslator for DateAddTranslator {
    fn name(&self) -> &'static str {
        "date_add"
    }

    fn translate(
        &self,
        instance: Option<&SqlExpression>,
        method: &MethodInfo,
        arguments: &[SqlExpression],
        dialect: &DialectConfig,
    ) -> Option<SqlExpression> {
        let part = DATE_PART_METHODS.get(method)?;
        let receiver = instance?;
        let [amount] = arguments else {
            return None;
        };

        let mut modifiers = vec![modifier(amount, *part)];
        if method.return_type.base_type() == &HostType::DateTimeOffset {
            modifiers.push(SqlExpression::constant(dialect.utc_modifier.as_str()));
        }

        Some(strftime(dialect, receiver.clone(), modifiers))
    }
}

/// The `'<amount> <part>'` modifier. Literal amounts are folded into a single
/// string literal; anything else is concatenated at runtime.
fn modifier(amount: &SqlExpression, part: DatePart) -> SqlExpression {
    match amount {
        SqlExpression::Constant(value) => SqlExpression::constant(format!("{} {}", value, part)),
        SqlExpression::Cast { operand, .. } => operand
            .as_ref()
            .clone()
            .cast(DataType::Text)
            .concat(SqlExpression::constant(format!(" {}", part))),
        other => other
            .clone()
            .concat(SqlExpression::constant(format!(" {}", part))),
    }
}

/// Register the translator
pub fn register(registry: &mut TranslatorRegistry) {
    registry.register_method_call(Box::new(DateAddTranslator));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::SqlGenerator;

    fn translate(method: &MethodInfo, amount: SqlExpression) -> Option<String> {
        let receiver = SqlExpression::column("o", "OrderDate");
        DateAddTranslator
            .translate(Some(&receiver), method, &[amount], &DialectConfig::default())
            .map(|sql| SqlGenerator::generate_expression(&sql))
    }

    #[test]
    fn test_literal_amount_is_folded() {
        let method = add_method(HostType::DateTime, DatePart::Days);
        assert_eq!(
            translate(&method, SqlExpression::constant(3.0)).unwrap(),
            r#"strftime('%Y-%m-%d %H:%M:%S', "o"."OrderDate", '3 days')"#
        );
    }

    #[test]
    fn test_column_amount_is_concatenated() {
        let method = add_method(HostType::DateTime, DatePart::Months);
        assert_eq!(
            translate(&method, SqlExpression::column("o", "Delay")).unwrap(),
            r#"strftime('%Y-%m-%d %H:%M:%S', "o"."OrderDate", "o"."Delay" || ' months')"#
        );
    }

    #[test]
    fn test_converted_amount_is_cast_to_text() {
        let method = add_method(HostType::DateTime, DatePart::Hours);
        let amount = SqlExpression::column("o", "Delay").cast(DataType::F64);
        assert_eq!(
            translate(&method, amount).unwrap(),
            r#"strftime('%Y-%m-%d %H:%M:%S', "o"."OrderDate", CAST("o"."Delay" AS TEXT) || ' hours')"#
        );
    }

    #[test]
    fn test_offset_result_gets_utc_modifier() {
        let method = add_method(HostType::DateTimeOffset, DatePart::Years);
        assert_eq!(
            translate(&method, SqlExpression::constant(1)).unwrap(),
            r#"strftime('%Y-%m-%d %H:%M:%S', "o"."OrderDate", '1 years', 'utc')"#
        );
    }

    #[test]
    fn test_unknown_method_is_declined() {
        let method = MethodInfo::new(
            HostType::DateTime,
            "AddTicks",
            [HostType::Int64],
            HostType::DateTime,
        );
        assert_eq!(translate(&method, SqlExpression::constant(1)), None);

        // Right name, wrong parameter type
        let method = MethodInfo::new(
            HostType::DateTime,
            "AddDays",
            [HostType::Int32],
            HostType::DateTime,
        );
        assert_eq!(translate(&method, SqlExpression::constant(1)), None);
    }

    #[test]
    fn test_static_call_is_declined() {
        let method = add_method(HostType::DateTime, DatePart::Days);
        let result = DateAddTranslator.translate(
            None,
            &method,
            &[SqlExpression::constant(1.0)],
            &DialectConfig::default(),
        );
        assert_eq!(result, None);
    }
}

//! `DateTime.Now`, `DateTime.UtcNow`, `DateTime.Today` and `<date>.Date`

use super::{MemberTranslator, STRFTIME, TranslatorRegistry, strftime};
use crate::config::DialectConfig;
use crate::sql::SqlExpression;
use crate::types::{HostType, MemberInfo};

const NOW: &str = "Now";
const UTC_NOW: &str = "UtcNow";
const TODAY: &str = "Today";
const DATE: &str = "Date";

const START_OF_DAY: &str = "start of day";

/// `DateTime.Now`
pub fn now() -> MemberInfo {
    MemberInfo::new(HostType::DateTime, NOW, HostType::DateTime)
}

/// `DateTime.UtcNow`
pub fn utc_now() -> MemberInfo {
    MemberInfo::new(HostType::DateTime, UTC_NOW, HostType::DateTime)
}

/// `DateTime.Today`
pub fn today() -> MemberInfo {
    MemberInfo::new(HostType::DateTime, TODAY, HostType::DateTime)
}

/// `<value>.Date` on a `DateTime` or `DateTimeOffset`
pub fn date(declaring_type: HostType) -> MemberInfo {
    MemberInfo::new(declaring_type, DATE, HostType::DateTime)
}

/// Translator for date/time properties
pub struct DateTimeMemberTranslator;

impl MemberTranslator for DateTimeMemberTranslator {
    fn name(&self) -> &'static str {
        "date_time_member"
    }

    fn translate(
        &self,
        instance: Option<&SqlExpression>,
        member: &MemberInfo,
        dialect: &DialectConfig,
    ) -> Option<SqlExpression> {
        if !member.declaring_type.is_date_time() {
            return None;
        }

        match (instance, member.name.as_str()) {
            (None, NOW) => Some(now_fragment(dialect, dialect.now_uses_localtime, None)),
            (None, UTC_NOW) => Some(now_fragment(dialect, false, None)),
            (None, TODAY) => Some(now_fragment(
                dialect,
                dialect.now_uses_localtime,
                Some(START_OF_DAY),
            )),
            (Some(value), DATE) => Some(strftime(
                dialect,
                value.clone(),
                [SqlExpression::constant(START_OF_DAY)],
            )),
            _ => None,
        }
    }
}

/// The current time as a compact fragment:
/// `strftime('<format>','now','localtime')`
fn now_fragment(dialect: &DialectConfig, localtime: bool, modifier: Option<&str>) -> SqlExpression {
    let mut sql = format!("{}('{}','now'", STRFTIME, dialect.datetime_format);
    if localtime {
        sql.push_str(",'localtime'");
    }
    if let Some(modifier) = modifier {
        sql.push_str(",'");
        sql.push_str(modifier);
        sql.push('\'');
    }
    sql.push(')');
    SqlExpression::fragment(sql)
}

/// Register the translator
pub fn register(registry: &mut TranslatorRegistry) {
    registry.register_member(Box::new(DateTimeMemberTranslator));
}
